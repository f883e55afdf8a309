// Copyright (c) 2026 rezky_nightky

use std::fs::OpenOptions;
use std::path::Path;
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

pub const LOG_ENV: &str = "BUZZBUDDY_LOG";

/// Keeps the background log writer alive; flushes on drop.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Sends tracing output to `path`. Stdout belongs to the animation, so there
/// is no console layer.
pub fn init_file_logging(path: &Path) -> Result<LogGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::Logging(format!("{}: {}", path.display(), e)))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(LogGuard { _guard: guard })
}

pub fn log_startup(width: u16, height: u16) {
    tracing::info!(
        application = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        pid = std::process::id(),
        width,
        height,
        "startup completed"
    );
}

pub fn log_tick_work(work: Duration, period: Duration) {
    if work > Duration::from_secs(1) {
        tracing::warn!(work_ms = work.as_millis() as u64, "tick took too long");
    } else if work > period {
        tracing::debug!(
            work_ms = work.as_millis() as u64,
            period_ms = period.as_millis() as u64,
            "tick overran its period"
        );
    }
}
