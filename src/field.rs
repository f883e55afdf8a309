// Copyright (c) 2026 rezky_nightky

//! Matrix rain particle field.
//!
//! The field is a row of columns, each owning falling drops. Drops are never
//! destroyed: once a drop falls past the bottom of the screen it is sent back
//! above the top with a fresh glyph and color.

use std::time::Duration;

use crossterm::style::Color;
use rand::{rngs::StdRng, Rng};

use crate::charset::{default_alphabet, is_valid_alphabet};
use crate::palette::{default_colors, MAX_COLORS};

pub const MIN_DENSITY: f32 = 0.1;
pub const MAX_DENSITY: f32 = 1.0;
pub const MIN_SPEED: f32 = 1.0;
pub const MAX_SPEED: f32 = 10.0;
pub const DEFAULT_DENSITY: f32 = 0.5;
pub const DEFAULT_SPEED: f32 = 1.0;
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// Raw, unvalidated field options. Every field is optional.
#[derive(Clone, Debug, Default)]
pub struct FieldOptions {
    pub characters: Option<String>,
    pub colors: Option<Vec<Color>>,
    pub density: Option<f32>,
    pub speed: Option<f32>,
    pub fade: Option<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub characters: Vec<char>,
    pub colors: Vec<Color>,
    pub density: f32,
    pub speed: f32,
    pub fade: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            characters: default_alphabet(),
            colors: default_colors(),
            density: DEFAULT_DENSITY,
            speed: DEFAULT_SPEED,
            fade: true,
        }
    }
}

impl FieldConfig {
    /// Resolves options against the defaults. Each invalid option falls back
    /// on its own; this never fails.
    pub fn resolve(opts: &FieldOptions) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = &opts.characters {
            let chars: Vec<char> = s.chars().collect();
            if is_valid_alphabet(&chars) {
                cfg.characters = chars;
            } else {
                tracing::warn!(len = chars.len(), "characters out of range, using default");
            }
        }

        if let Some(d) = opts.density {
            if d.is_finite() && (MIN_DENSITY..=MAX_DENSITY).contains(&d) {
                cfg.density = d;
            } else {
                tracing::warn!(density = d, "density out of range, using default");
            }
        }

        if let Some(s) = opts.speed {
            if s.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&s) {
                cfg.speed = s;
            } else {
                tracing::warn!(speed = s, "speed out of range, using default");
            }
        }

        if let Some(colors) = &opts.colors {
            if !colors.is_empty() && colors.len() <= MAX_COLORS {
                cfg.colors = colors.clone();
            } else {
                tracing::warn!(count = colors.len(), "color count out of range, using default");
            }
        }

        if let Some(f) = opts.fade {
            cfg.fade = f;
        }

        cfg
    }
}

/// Hand-tuned animation constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldTuning {
    pub column_width: u16,
    pub trail_length: usize,
    pub trail_opacity_step: f32,
    pub drops_divisor: u16,
    pub random_drops: usize,
    pub speed_variance: f32,
    pub screen_buffer: f32,
    pub reset_offset: u32,
    pub initial_height_range: u32,
    pub frame_rate_ms: f32,
    pub speed_multiplier: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            column_width: 2,
            trail_length: 3,
            trail_opacity_step: 0.3,
            drops_divisor: 3,
            random_drops: 5,
            speed_variance: 2.0,
            screen_buffer: 5.0,
            reset_offset: 10,
            initial_height_range: 100,
            frame_rate_ms: 1000.0,
            speed_multiplier: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSlot {
    pub ch: char,
    pub y: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Raindrop {
    pub y: f32,
    pub ch: char,
    pub color: usize,
    pub trail: Option<Vec<TrailSlot>>,
}

impl Raindrop {
    fn sync_trail(&mut self) {
        let y = self.y;
        if let Some(trail) = &mut self.trail {
            for (k, slot) in trail.iter_mut().enumerate() {
                slot.y = y - (k as f32 + 1.0);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Column {
    pub index: u16,
    pub x: u16,
    pub active: bool,
    pub speed: f32,
    pub drops: Vec<Raindrop>,
    last_update: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldStats {
    pub total_columns: usize,
    pub total_drops: usize,
    pub active_columns: usize,
}

pub struct Field {
    pub width: u16,
    pub height: u16,
    pub config: FieldConfig,
    pub tuning: FieldTuning,
    pub columns: Vec<Column>,
    clock: Duration,
    rng: StdRng,
}

impl Field {
    pub fn new(width: u16, height: u16, opts: &FieldOptions, rng: StdRng) -> Self {
        Self::with_tuning(width, height, FieldConfig::resolve(opts), FieldTuning::default(), rng)
    }

    pub fn with_tuning(
        width: u16,
        height: u16,
        config: FieldConfig,
        tuning: FieldTuning,
        rng: StdRng,
    ) -> Self {
        let mut field = Self {
            width: 0,
            height: 0,
            config,
            tuning,
            columns: Vec::new(),
            clock: Duration::ZERO,
            rng,
        };
        field.resize(width, height);
        field
    }

    /// Rebuilds every column for a new size.
    pub fn resize(&mut self, width: u16, height: u16) {
        let (width, height) = if width == 0 || height == 0 {
            tracing::warn!(width, height, "invalid field size, using default");
            (DEFAULT_WIDTH, DEFAULT_HEIGHT)
        } else {
            (width, height)
        };
        self.width = width;
        self.height = height;
        self.reseed();
    }

    /// Rebuilds every column at the current size.
    pub fn reseed(&mut self) {
        let count = self.width / self.tuning.column_width.max(1);
        let mut columns = Vec::with_capacity(count as usize);
        for index in 0..count {
            let column = self.new_column(index);
            columns.push(column);
        }
        self.columns = columns;

        let stats = self.stats();
        tracing::debug!(
            width = self.width,
            height = self.height,
            columns = stats.total_columns,
            active = stats.active_columns,
            drops = stats.total_drops,
            "field seeded"
        );
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats {
            total_columns: self.columns.len(),
            total_drops: self.columns.iter().map(|c| c.drops.len()).sum(),
            active_columns: self.columns.iter().filter(|c| c.active).count(),
        }
    }

    /// Minimum time between two advances of a column.
    pub fn throttle(&self) -> Duration {
        let per_sec = (self.config.speed * self.tuning.speed_multiplier).max(f32::EPSILON) as f64;
        let micros = self.tuning.frame_rate_ms as f64 * 1000.0 / per_sec;
        Duration::from_micros(micros.round() as u64)
    }

    pub fn update(&mut self, elapsed: Duration) {
        self.clock += elapsed;
        let now = self.clock;
        let throttle = self.throttle();
        let limit = self.height as f32 + self.tuning.screen_buffer;

        for ci in 0..self.columns.len() {
            let col = &self.columns[ci];
            if !col.active || now.saturating_sub(col.last_update) < throttle {
                continue;
            }
            let speed = col.speed;

            for di in 0..self.columns[ci].drops.len() {
                let y = self.columns[ci].drops[di].y + speed;
                if y > limit {
                    let fresh = self.respawn_y();
                    let ch = self.random_char();
                    let color = self.random_color();
                    let d = &mut self.columns[ci].drops[di];
                    d.y = fresh;
                    d.ch = ch;
                    d.color = color;
                    tracing::trace!(column = self.columns[ci].index, y = fresh, "drop recycled");
                } else {
                    self.columns[ci].drops[di].y = y;
                }
                if self.config.fade {
                    self.columns[ci].drops[di].sync_trail();
                }
            }

            self.columns[ci].last_update = now;
        }
    }

    fn new_column(&mut self, index: u16) -> Column {
        let t = self.tuning;
        let active = self.rng.random_bool(self.config.density.clamp(0.0, 1.0) as f64);
        let variance = self.rng.random::<f32>() * t.speed_variance - t.speed_variance / 2.0;
        let speed = self.config.speed + variance;

        let count = (self.height / t.drops_divisor.max(1)) as usize
            + self.rng.random_range(0..t.random_drops.max(1));
        let mut drops = Vec::with_capacity(count);
        for _ in 0..count {
            let y = -(self.rng.random_range(1..=t.initial_height_range.max(1)) as f32);
            drops.push(self.new_drop(y));
        }

        Column {
            index,
            x: index * t.column_width,
            active,
            speed,
            drops,
            last_update: self.clock,
        }
    }

    fn new_drop(&mut self, y: f32) -> Raindrop {
        let ch = self.random_char();
        let color = self.random_color();
        let trail = if self.config.fade {
            let mut slots = Vec::with_capacity(self.tuning.trail_length);
            for k in 0..self.tuning.trail_length {
                slots.push(TrailSlot {
                    ch: self.random_char(),
                    y: y - (k as f32 + 1.0),
                    opacity: 1.0 - k as f32 * self.tuning.trail_opacity_step,
                });
            }
            Some(slots)
        } else {
            None
        };
        Raindrop {
            y,
            ch,
            color,
            trail,
        }
    }

    fn respawn_y(&mut self) -> f32 {
        -(self.rng.random_range(1..=self.tuning.reset_offset.max(1)) as f32)
    }

    fn random_char(&mut self) -> char {
        let chars = &self.config.characters;
        if chars.is_empty() {
            return '0';
        }
        chars[self.rng.random_range(0..chars.len())]
    }

    fn random_color(&mut self) -> usize {
        self.rng.random_range(0..self.config.colors.len().max(1))
    }
}
