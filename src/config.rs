// Copyright (c) 2026 rezky_nightky

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::style::Color;

use crate::charset::{build_chars, charset_from_str};
use crate::field::FieldOptions;
use crate::palette::{build_palette, fit_color, parse_color, parse_theme, Theme};
use crate::renderer::DEFAULT_CAPTION_INTERVAL;
use crate::runtime::ColorMode;
use crate::field::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::terminal::{detect_color_mode, MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH};

pub const DEFAULT_TICK_MS: u16 = 100;
pub const MIN_TICK_MS: u16 = 10;
pub const MAX_TICK_MS: u16 = 1000;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "buzzbuddy",
    version,
    disable_version_flag = true,
    about = "A chatty ASCII robot standing in the Matrix rain"
)]
pub struct Args {
    #[arg(
        short = 'd',
        long = "density",
        help_heading = "RAIN",
        help = "Fraction of columns that fall (min 0.1 max 1.0, default 0.5)"
    )]
    pub density: Option<f32>,

    #[arg(
        short = 'S',
        long = "speed",
        help_heading = "RAIN",
        help = "Base fall speed (min 1 max 10, default 1)"
    )]
    pub speed: Option<f32>,

    #[arg(
        long = "no-fade",
        help_heading = "RAIN",
        help = "Draw drops without fading trails"
    )]
    pub no_fade: bool,

    #[arg(
        long = "charset",
        help_heading = "CHARSET",
        help = "Charset preset (see --list-charsets)"
    )]
    pub charset: Option<String>,

    #[arg(
        long = "chars",
        help_heading = "CHARSET",
        help = "Custom alphabet, more than 5 and fewer than 200 characters"
    )]
    pub chars: Option<String>,

    #[arg(
        short = 't',
        long = "theme",
        default_value = "classic",
        help_heading = "APPEARANCE",
        help = "Color theme (see --list-themes)"
    )]
    pub theme: String,

    #[arg(
        short = 'c',
        long = "colors",
        value_delimiter = ',',
        help_heading = "APPEARANCE",
        help = "Explicit rain colors, comma separated (names, 0-255 or #rrggbb; at most 5)"
    )]
    pub colors: Vec<String>,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,256,24). Default: detected from NO_COLOR/COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "phrase",
        help_heading = "CAPTION",
        help = "Caption to show instead of buzzwords (repeatable, shown in turn)"
    )]
    pub phrase: Vec<String>,

    #[arg(
        long = "caption-secs",
        default_value_t = DEFAULT_CAPTION_INTERVAL.as_secs_f64(),
        help_heading = "CAPTION",
        help = "Seconds before the caption changes (min 0.5 max 3600)"
    )]
    pub caption_secs: f64,

    #[arg(
        long = "tick-ms",
        default_value_t = DEFAULT_TICK_MS,
        help_heading = "GENERAL",
        help = "Milliseconds per frame (min 10 max 1000)"
    )]
    pub tick_ms: u16,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random generator for a repeatable animation"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "once",
        help_heading = "GENERAL",
        help = "Print a single frame as plain text and exit"
    )]
    pub once: bool,

    #[arg(
        long = "width",
        help_heading = "GENERAL",
        help = "Frame width for --once or non-terminal output (min 20 max 200, default 80)"
    )]
    pub width: Option<u16>,

    #[arg(
        long = "height",
        help_heading = "GENERAL",
        help = "Frame height for --once or non-terminal output (min 10 max 100, default 24)"
    )]
    pub height: Option<u16>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write logs to this file (filter with BUZZBUDDY_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charset presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "list-themes",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_themes: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

pub fn check_u16_range(name: &str, v: u16, min: u16, max: u16) -> Result<u16, String> {
    if v < min || v > max {
        return Err(format!(
            "failed to apply {} {} (min {} max {})",
            name, v, min, max
        ));
    }
    Ok(v)
}

pub fn require_u16_range(name: &str, v: u16, min: u16, max: u16) -> u16 {
    check_u16_range(name, v, min, max).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    })
}

pub fn color_mode_from_flag(m: u16) -> Option<ColorMode> {
    match m {
        0 => Some(ColorMode::Mono),
        16 => Some(ColorMode::Color16),
        8 | 256 => Some(ColorMode::Color256),
        24 | 32 => Some(ColorMode::TrueColor),
        _ => None,
    }
}

impl Args {
    pub fn color_mode(&self) -> ColorMode {
        match self.colormode {
            None => detect_color_mode(),
            Some(m) => color_mode_from_flag(m).unwrap_or_else(|| {
                eprintln!("invalid --colormode: {} (allowed: 0,16,256,24)", m);
                std::process::exit(1);
            }),
        }
    }

    pub fn tick_period(&self) -> Duration {
        let ms = require_u16_range("--tick-ms", self.tick_ms, MIN_TICK_MS, MAX_TICK_MS);
        Duration::from_millis(ms as u64)
    }

    /// Size of a frame printed without a live terminal.
    pub fn frame_size(&self) -> (u16, u16) {
        let width = match self.width {
            Some(w) => require_u16_range("--width", w, MIN_WIDTH, MAX_WIDTH),
            None => DEFAULT_WIDTH,
        };
        let height = match self.height {
            Some(h) => require_u16_range("--height", h, MIN_HEIGHT, MAX_HEIGHT),
            None => DEFAULT_HEIGHT,
        };
        (width, height)
    }

    pub fn caption_interval(&self) -> Duration {
        Duration::from_secs_f64(require_f64_range(
            "--caption-secs",
            self.caption_secs,
            0.5,
            3600.0,
        ))
    }

    /// `None` when no positive duration was asked for.
    pub fn run_duration(&self) -> Option<Duration> {
        let s = self.duration?;
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        if s <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(require_f64_range(
            "--duration",
            s,
            0.1,
            86400.0,
        )))
    }

    /// Raw field options. Anything unusable is dropped with a warning so the
    /// field falls back to its default for that option.
    pub fn field_options(&self, mode: ColorMode) -> FieldOptions {
        FieldOptions {
            characters: self.characters(),
            colors: Some(self.rain_colors(mode)),
            density: self.density,
            speed: self.speed,
            fade: Some(!self.no_fade),
        }
    }

    fn characters(&self) -> Option<String> {
        if let Some(chars) = &self.chars {
            return Some(chars.clone());
        }
        let name = self.charset.as_deref()?;
        match charset_from_str(name) {
            Ok(cs) => Some(build_chars(cs).into_iter().collect()),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring --charset");
                None
            }
        }
    }

    fn rain_colors(&self, mode: ColorMode) -> Vec<Color> {
        let explicit: Vec<_> = self
            .colors
            .iter()
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| match parse_color(s) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring color");
                    None
                }
            })
            .collect();
        if !explicit.is_empty() {
            return explicit.into_iter().map(|c| fit_color(c, mode)).collect();
        }

        let theme = parse_theme(&self.theme).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unknown theme, using classic");
            Theme::Classic
        });
        build_palette(theme, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["buzzbuddy"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn defaults_leave_field_options_to_the_field() {
        let args = parse(&[]);
        let opts = args.field_options(ColorMode::Color256);
        assert_eq!(opts.characters, None);
        assert_eq!(opts.density, None);
        assert_eq!(opts.speed, None);
        assert_eq!(opts.fade, Some(true));
        assert_eq!(args.tick_period(), Duration::from_millis(100));
        assert_eq!(args.caption_interval(), DEFAULT_CAPTION_INTERVAL);
        assert_eq!(args.run_duration(), None);
    }

    #[test]
    fn frame_size_defaults_and_accepts_both_bounds() {
        assert_eq!(parse(&[]).frame_size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(
            parse(&["--width", "20", "--height", "10"]).frame_size(),
            (MIN_WIDTH, MIN_HEIGHT)
        );
        assert_eq!(
            parse(&["--width", "200", "--height", "100"]).frame_size(),
            (MAX_WIDTH, MAX_HEIGHT)
        );
    }

    #[test]
    fn frame_size_outside_bounds_is_rejected() {
        assert_eq!(
            check_u16_range("--width", 60000, MIN_WIDTH, MAX_WIDTH),
            Err("failed to apply --width 60000 (min 20 max 200)".to_string())
        );
        assert!(check_u16_range("--width", 19, MIN_WIDTH, MAX_WIDTH).is_err());
        assert!(check_u16_range("--height", 101, MIN_HEIGHT, MAX_HEIGHT).is_err());
        assert!(check_u16_range("--height", 9, MIN_HEIGHT, MAX_HEIGHT).is_err());
    }

    #[test]
    fn colors_are_comma_separated_and_bad_ones_skipped() {
        let args = parse(&["--colors", "red,nope,#00ff00"]);
        assert_eq!(args.colors.len(), 3);
        let colors = args.field_options(ColorMode::TrueColor).colors.unwrap();
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn all_bad_colors_fall_back_to_theme() {
        let args = parse(&["--colors", "nope", "--theme", "classic"]);
        let colors = args.field_options(ColorMode::Color16).colors.unwrap();
        assert_eq!(colors, build_palette(Theme::Classic, ColorMode::Color16));
    }

    #[test]
    fn chars_override_charset() {
        let args = parse(&["--charset", "dna", "--chars", "abcdefg"]);
        assert_eq!(args.characters().as_deref(), Some("abcdefg"));

        let args = parse(&["--charset", "nonsense"]);
        assert_eq!(args.characters(), None);
    }

    #[test]
    fn phrases_repeat_and_no_fade_flips() {
        let args = parse(&["--phrase", "one", "--phrase", "two", "--no-fade"]);
        assert_eq!(args.phrase, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(args.field_options(ColorMode::Mono).fade, Some(false));
    }

    #[test]
    fn colormode_flag_values() {
        assert_eq!(color_mode_from_flag(0), Some(ColorMode::Mono));
        assert_eq!(color_mode_from_flag(16), Some(ColorMode::Color16));
        assert_eq!(color_mode_from_flag(256), Some(ColorMode::Color256));
        assert_eq!(color_mode_from_flag(24), Some(ColorMode::TrueColor));
        assert_eq!(color_mode_from_flag(7), None);
    }

    #[test]
    fn non_positive_duration_disables_the_timer() {
        assert_eq!(parse(&["--duration", "0"]).run_duration(), None);
        assert_eq!(
            parse(&["--duration", "2.5"]).run_duration(),
            Some(Duration::from_millis(2500))
        );
    }
}
