// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

/// Failures the driver has to decide about. Field and renderer never fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stdout is not a terminal")]
    NotATerminal,

    #[error("terminal too small: {width}x{height} (min {min_width}x{min_height})")]
    TooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },

    #[error("failed to set up logging: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_small_message_names_both_sizes() {
        let e = Error::TooSmall {
            width: 12,
            height: 5,
            min_width: 20,
            min_height: 10,
        };
        assert_eq!(e.to_string(), "terminal too small: 12x5 (min 20x10)");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::other("boom");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
