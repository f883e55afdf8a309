// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

pub const MAX_COLORS: usize = 5;

/// Color used for a drop whose color index does not resolve.
pub const FALLBACK_GREEN: Color = Color::Green;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Classic,
    Green,
    Amber,
    Ice,
    Red,
    Purple,
}

pub fn parse_theme(s: &str) -> Result<Theme, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "classic" | "default" => Ok(Theme::Classic),
        "green" => Ok(Theme::Green),
        "amber" | "gold" => Ok(Theme::Amber),
        "ice" | "cyan" => Ok(Theme::Ice),
        "red" => Ok(Theme::Red),
        "purple" => Ok(Theme::Purple),
        _ => Err(format!("invalid theme: {} (see --list-themes)", s)),
    }
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cr = CUBE_LEVELS[r6 as usize];
    let cg = CUBE_LEVELS[g6 as usize];
    let cb = CUBE_LEVELS[b6 as usize];
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(r, g, b, cr, cg, cb);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_idx = if avg < 8 {
        16
    } else if avg > 238 {
        231
    } else {
        232 + ((avg - 8) / 10)
    };
    let (gr, gg, gb) = if gray_idx == 16 {
        (0, 0, 0)
    } else if gray_idx == 231 {
        (255, 255, 255)
    } else {
        let v = 8 + 10 * (gray_idx - 232);
        (v, v, v)
    };
    let gray_dist = dist2(r, g, b, gr, gg, gb);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    let mut best = Color::White;
    let mut best_d = i32::MAX;
    for (c, (cr, cg, cb)) in TABLE {
        let d = dist2(r, g, b, cr, cg, cb);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

fn colors_from_rgb(mode: ColorMode, list: &[(u8, u8, u8)]) -> Vec<Color> {
    match mode {
        ColorMode::Mono => vec![Color::White],
        ColorMode::TrueColor => list
            .iter()
            .map(|&(r, g, b)| Color::Rgb { r, g, b })
            .collect(),
        ColorMode::Color256 => list
            .iter()
            .map(|&(r, g, b)| Color::AnsiValue(rgb_to_ansi256(r, g, b)))
            .collect(),
        ColorMode::Color16 => list
            .iter()
            .map(|&(r, g, b)| rgb_to_color16(r, g, b))
            .collect(),
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn gradient_from_stops(stops: &[(u8, u8, u8)], steps: usize) -> Vec<(u8, u8, u8)> {
    if steps == 0 || stops.is_empty() {
        return Vec::new();
    }
    if stops.len() == 1 || steps == 1 {
        return vec![stops[0]; steps];
    }

    let segs = stops.len() - 1;
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        let t = (i as f32) / ((steps - 1) as f32);
        let pos = t * (segs as f32);
        let seg = (pos.floor() as usize).min(segs - 1);
        let lt = pos - (seg as f32);
        let (r0, g0, b0) = stops[seg];
        let (r1, g1, b1) = stops[seg + 1];
        out.push((
            lerp_u8(r0, r1, lt),
            lerp_u8(g0, g1, lt),
            lerp_u8(b0, b1, lt),
        ));
    }
    out
}

/// The three ANSI greens: SGR 32, 92 and 37.
pub fn default_colors() -> Vec<Color> {
    vec![Color::DarkGreen, Color::Green, Color::Grey]
}

/// Drop colors for a theme, at most [`MAX_COLORS`] entries.
pub fn build_palette(theme: Theme, mode: ColorMode) -> Vec<Color> {
    let stops: &[(u8, u8, u8)] = match theme {
        Theme::Classic => return default_colors(),
        Theme::Green => &[(0, 90, 20), (0, 200, 60), (180, 255, 190)],
        Theme::Amber => &[(120, 60, 0), (255, 170, 0), (255, 235, 170)],
        Theme::Ice => &[(0, 60, 110), (0, 180, 220), (210, 250, 255)],
        Theme::Red => &[(90, 0, 0), (220, 20, 40), (255, 190, 190)],
        Theme::Purple => &[(60, 0, 90), (150, 60, 220), (235, 200, 255)],
    };
    let mut colors = colors_from_rgb(mode, &gradient_from_stops(stops, MAX_COLORS));
    colors.dedup();
    colors
}

/// The two alternating shades of the art glow.
pub fn glow_shades(mode: ColorMode) -> (Color, Color) {
    match mode {
        ColorMode::TrueColor => (
            Color::Rgb {
                r: 0,
                g: 255,
                b: 255,
            },
            Color::Rgb {
                r: 0,
                g: 150,
                b: 170,
            },
        ),
        _ => (Color::Cyan, Color::DarkCyan),
    }
}

/// Parses a color name, an ANSI index (`0`..`255`) or `#rrggbb`.
pub fn parse_color(s: &str) -> Result<Color, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid hex color: {}", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        return match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Color::Rgb { r, g, b }),
            _ => Err(format!("invalid hex color: {}", s)),
        };
    }
    if let Ok(v) = s.parse::<u8>() {
        return Ok(Color::AnsiValue(v));
    }
    match s.to_ascii_lowercase().replace('_', "-").as_str() {
        "black" => Ok(Color::Black),
        "red" | "bright-red" => Ok(Color::Red),
        "dark-red" => Ok(Color::DarkRed),
        "green" | "bright-green" => Ok(Color::Green),
        "dark-green" => Ok(Color::DarkGreen),
        "yellow" | "bright-yellow" => Ok(Color::Yellow),
        "dark-yellow" => Ok(Color::DarkYellow),
        "blue" | "bright-blue" => Ok(Color::Blue),
        "dark-blue" => Ok(Color::DarkBlue),
        "magenta" | "bright-magenta" => Ok(Color::Magenta),
        "dark-magenta" => Ok(Color::DarkMagenta),
        "cyan" | "bright-cyan" => Ok(Color::Cyan),
        "dark-cyan" => Ok(Color::DarkCyan),
        "white" | "bright-white" => Ok(Color::White),
        "grey" | "gray" => Ok(Color::Grey),
        "dark-grey" | "dark-gray" => Ok(Color::DarkGrey),
        _ => Err(format!("invalid color: {}", s)),
    }
}

/// Downgrades a color for mode, if needed.
pub fn fit_color(c: Color, mode: ColorMode) -> Color {
    match (c, mode) {
        (Color::Rgb { r, g, b }, ColorMode::Color256) => Color::AnsiValue(rgb_to_ansi256(r, g, b)),
        (Color::Rgb { r, g, b }, ColorMode::Color16) => rgb_to_color16(r, g, b),
        _ => c,
    }
}

/// Trail color for a slot with `opacity` in `0.0..=1.0`.
pub fn fade(c: Color, opacity: f32) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    match c {
        Color::Rgb { r, g, b } => Color::Rgb {
            r: lerp_u8(0, r, t),
            g: lerp_u8(0, g, t),
            b: lerp_u8(0, b, t),
        },
        _ if t < 0.5 => Color::DarkGreen,
        _ => c,
    }
}

pub fn print_list_themes() {
    println!("AVAILABLE THEMES:");
    println!();
    println!("VALUE        DESCRIPTION");
    println!("classic      Three ANSI greens (default)");
    println!("green        Green gradient");
    println!("amber        Amber gradient (alias: gold)");
    println!("ice          Ice blue gradient (alias: cyan)");
    println!("red          Red gradient");
    println!("purple       Purple gradient");
}
