// Copyright (c) 2026 rezky_nightky

//! Turns the field, the art and the caption into positioned writes.
//!
//! Nothing here touches the terminal. Rows and columns are 1-based, the way
//! cursor addressing escapes count them.

use std::time::Duration;

use crossterm::style::Color;

use crate::art::Art;
use crate::field::Field;
use crate::palette::{fade, fit_color, glow_shades, FALLBACK_GREEN};
use crate::phrase::PhraseSource;
use crate::runtime::ColorMode;

pub const CAPTION_SINGLE_LINE_MAX: usize = 30;
pub const CAPTION_WRAP_WIDTH: usize = 28;
pub const MIN_BUBBLE_WIDTH: usize = 10;
pub const BUBBLE_PADDING: usize = 4;
pub const GLOW_PERIOD_TICKS: u64 = 120;
pub const ART_ROW_OFFSET: i32 = 2;
pub const DEFAULT_CAPTION_INTERVAL: Duration = Duration::from_millis(7000);

const BUBBLE_COLOR: Color = Color::White;
const BUBBLE_POINTER: &str = "▼";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionedWrite {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub fg: Option<Color>,
    pub bold: bool,
}

/// Greedy word wrap. Short captions come back untouched.
pub fn wrap_caption(text: &str) -> Vec<String> {
    if text.chars().count() <= CAPTION_SINGLE_LINE_MAX {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut cur = String::new();
    let mut cur_len = 0usize;
    for word in text.split_whitespace() {
        let wl = word.chars().count();
        if cur.is_empty() {
            cur.push_str(word);
            cur_len = wl;
        } else if cur_len + 1 + wl <= CAPTION_WRAP_WIDTH {
            cur.push(' ');
            cur.push_str(word);
            cur_len += 1 + wl;
        } else {
            lines.push(std::mem::take(&mut cur));
            cur.push_str(word);
            cur_len = wl;
        }
    }
    if !cur.is_empty() || lines.is_empty() {
        lines.push(cur);
    }
    lines
}

pub fn bubble_width(lines: &[String]) -> usize {
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    (longest + BUBBLE_PADDING).max(MIN_BUBBLE_WIDTH)
}

/// Top border, one row per content line, bottom border.
pub fn bubble_rows(lines: &[String]) -> Vec<String> {
    let w = bubble_width(lines);
    let inner = w - BUBBLE_PADDING;
    let rule = "─".repeat(w - 2);

    let mut rows = Vec::with_capacity(lines.len() + 2);
    rows.push(format!("╭{}╮", rule));
    for l in lines {
        let pad = inner.saturating_sub(l.chars().count());
        rows.push(format!("│ {}{} │", l, " ".repeat(pad)));
    }
    rows.push(format!("╰{}╯", rule));
    rows
}

pub struct Renderer {
    art: Art,
    color_mode: ColorMode,
    caption: Option<String>,
    caption_lines: Vec<String>,
    last_refresh: Option<Duration>,
    interval: Duration,
    force_refresh: bool,
    tick: u64,
}

impl Renderer {
    pub fn new(art: Art, color_mode: ColorMode, interval: Duration) -> Self {
        tracing::debug!(
            art = %art.name,
            width = art.width,
            height = art.height(),
            "art loaded"
        );
        Self {
            art,
            color_mode,
            caption: None,
            caption_lines: Vec::new(),
            last_refresh: None,
            interval,
            force_refresh: false,
            tick: 0,
        }
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// Pulls a new caption on the next render.
    pub fn refresh_caption(&mut self) {
        self.force_refresh = true;
    }

    fn update_caption(&mut self, now: Duration, phrases: &mut dyn PhraseSource) {
        let stale = match self.last_refresh {
            None => true,
            Some(last) => now.saturating_sub(last) > self.interval,
        };
        if !(stale || self.force_refresh || self.caption.is_none()) {
            return;
        }

        let text = phrases.next_phrase();
        tracing::debug!(caption = %text, "caption refreshed");
        self.caption_lines = wrap_caption(&text);
        self.caption = Some(text);
        self.last_refresh = Some(now);
        self.force_refresh = false;
    }

    fn glow(&self) -> (Color, bool) {
        let (bright, dim) = glow_shades(self.color_mode);
        if self.tick % GLOW_PERIOD_TICKS < GLOW_PERIOD_TICKS / 2 {
            (bright, true)
        } else {
            (dim, false)
        }
    }

    pub fn render(
        &mut self,
        field: &Field,
        now: Duration,
        phrases: &mut dyn PhraseSource,
    ) -> Vec<PositionedWrite> {
        self.update_caption(now, phrases);

        let mut out = Vec::new();
        let (w, h) = (field.width as i32, field.height as i32);

        self.draw_rain(field, &mut out);

        let art_rows = self.art.height() as i32;
        let art_top = (h - art_rows).div_euclid(2) + ART_ROW_OFFSET;
        let (glow, bold) = self.glow();
        for (i, line) in self.art.lines.iter().enumerate() {
            let len = line.chars().count() as i32;
            let col = (w - len).div_euclid(2) + 1;
            push_clipped(&mut out, w, h, art_top + i as i32, col, line, Some(glow), bold);
        }

        if !self.caption_lines.is_empty() {
            let rows = bubble_rows(&self.caption_lines);
            let bw = bubble_width(&self.caption_lines) as i32;
            let col = (w - bw).div_euclid(2) + 1;
            let pointer_row = art_top - 1;
            let top = pointer_row - rows.len() as i32;
            for (i, row) in rows.iter().enumerate() {
                push_clipped(&mut out, w, h, top + i as i32, col, row, Some(BUBBLE_COLOR), false);
            }
            push_clipped(
                &mut out,
                w,
                h,
                pointer_row,
                col + bw / 2,
                BUBBLE_POINTER,
                Some(BUBBLE_COLOR),
                false,
            );
        }

        self.tick = self.tick.wrapping_add(1);
        out
    }

    fn draw_rain(&self, field: &Field, out: &mut Vec<PositionedWrite>) {
        let h = field.height as f32;
        let on_screen = |y: f32| (0.0..h).contains(&y);
        let mut heads = Vec::new();

        for col in field.columns.iter().filter(|c| c.active) {
            let x = col.x.saturating_add(1);
            for d in &col.drops {
                let base = field
                    .config
                    .colors
                    .get(d.color)
                    .copied()
                    .unwrap_or(FALLBACK_GREEN);
                let base = fit_color(base, self.color_mode);

                if let Some(trail) = &d.trail {
                    for slot in trail.iter().filter(|s| on_screen(s.y)) {
                        out.push(PositionedWrite {
                            row: slot.y.floor() as u16 + 1,
                            col: x,
                            text: slot.ch.to_string(),
                            fg: Some(fade(base, slot.opacity)),
                            bold: false,
                        });
                    }
                }

                if on_screen(d.y) {
                    heads.push(PositionedWrite {
                        row: d.y.floor() as u16 + 1,
                        col: x,
                        text: d.ch.to_string(),
                        fg: Some(base),
                        bold: false,
                    });
                }
            }
        }

        out.extend(heads);
    }
}

/// Pushes a write at a signed 1-based position, trimming what falls left of
/// column 1 and skipping rows off screen.
#[allow(clippy::too_many_arguments)]
fn push_clipped(
    out: &mut Vec<PositionedWrite>,
    width: i32,
    height: i32,
    row: i32,
    col: i32,
    text: &str,
    fg: Option<Color>,
    bold: bool,
) {
    if row < 1 || row > height || col > width {
        return;
    }
    let skip = if col < 1 { (1 - col) as usize } else { 0 };
    let text: String = text.chars().skip(skip).collect();
    if text.is_empty() {
        return;
    }
    out.push(PositionedWrite {
        row: row as u16,
        col: col.max(1) as u16,
        text,
        fg,
        bold,
    });
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::field::{FieldOptions, Raindrop};

    struct Counter(usize);

    impl PhraseSource for Counter {
        fn next_phrase(&mut self) -> String {
            self.0 += 1;
            format!("phrase {}", self.0)
        }
    }

    fn quiet_field(w: u16, h: u16) -> Field {
        let o = FieldOptions {
            density: Some(1.0),
            fade: Some(false),
            ..FieldOptions::default()
        };
        let mut f = Field::new(w, h, &o, StdRng::seed_from_u64(1));
        for c in &mut f.columns {
            c.drops.clear();
        }
        f
    }

    fn renderer() -> Renderer {
        Renderer::new(Art::robot(), ColorMode::Color16, DEFAULT_CAPTION_INTERVAL)
    }

    #[test]
    fn short_caption_is_one_identical_line() {
        let s = "Synergize the  paradigm now!";
        assert_eq!(wrap_caption(s), vec![s.to_string()]);
        let thirty = "a".repeat(30);
        assert_eq!(wrap_caption(&thirty), vec![thirty.clone()]);
    }

    #[test]
    fn long_caption_wraps_at_word_boundaries() {
        let s = "Seamlessly   leverage cloud-native   value chains across every core competency";
        let lines = wrap_caption(s);
        assert!(lines.len() > 1);
        for l in &lines {
            assert!(l.chars().count() <= CAPTION_WRAP_WIDTH, "{:?}", l);
        }
        let collapsed: Vec<&str> = s.split_whitespace().collect();
        assert_eq!(lines.join(" "), collapsed.join(" "));
    }

    #[test]
    fn overlong_word_sits_alone() {
        let word = "x".repeat(35);
        let s = format!("hi {} there", word);
        let lines = wrap_caption(&s);
        assert_eq!(lines, vec!["hi".to_string(), word, "there".to_string()]);
    }

    #[test]
    fn bubble_width_has_a_floor() {
        assert_eq!(bubble_width(&["hey".to_string()]), 10);
        assert_eq!(bubble_width(&["hello there".to_string()]), 15);
        assert_eq!(bubble_width(&[]), 10);
    }

    #[test]
    fn bubble_content_is_padded_to_width_minus_four() {
        let lines = wrap_caption("Proactively orchestrate frictionless microservices today");
        let w = bubble_width(&lines);
        let rows = bubble_rows(&lines);
        assert_eq!(rows.len(), lines.len() + 2);
        for r in &rows {
            assert_eq!(r.chars().count(), w);
        }
        for r in &rows[1..rows.len() - 1] {
            let inner: String = r.chars().skip(2).take(w - 4).collect();
            assert_eq!(inner.chars().count(), w - 4);
            assert!(r.starts_with("│ ") && r.ends_with(" │"));
        }
    }

    #[test]
    fn caption_persists_within_interval_and_refreshes_after() {
        let f = quiet_field(80, 25);
        let mut r = renderer();
        let mut src = Counter(0);

        r.render(&f, Duration::ZERO, &mut src);
        assert_eq!(r.caption(), Some("phrase 1"));
        r.render(&f, Duration::from_millis(7000), &mut src);
        assert_eq!(r.caption(), Some("phrase 1"));
        r.render(&f, Duration::from_millis(7001), &mut src);
        assert_eq!(r.caption(), Some("phrase 2"));
        assert_eq!(src.0, 2);
    }

    #[test]
    fn forced_refresh_pulls_next_phrase() {
        let f = quiet_field(80, 25);
        let mut r = renderer();
        let mut src = Counter(0);
        r.render(&f, Duration::ZERO, &mut src);
        r.refresh_caption();
        r.render(&f, Duration::from_millis(10), &mut src);
        assert_eq!(r.caption(), Some("phrase 2"));
    }

    #[test]
    fn drops_on_screen_are_written_one_based() {
        let mut f = quiet_field(20, 10);
        f.config.colors = vec![Color::Red];
        f.columns[3].drops = vec![
            Raindrop {
                y: 4.7,
                ch: 'Z',
                color: 0,
                trail: None,
            },
            Raindrop {
                y: -1.0,
                ch: 'A',
                color: 0,
                trail: None,
            },
            Raindrop {
                y: 10.0,
                ch: 'B',
                color: 0,
                trail: None,
            },
        ];
        let mut r = renderer();
        let writes = r.render(&f, Duration::ZERO, &mut Counter(0));
        let drops: Vec<&PositionedWrite> = writes
            .iter()
            .filter(|w| ["Z", "A", "B"].contains(&w.text.as_str()))
            .collect();
        assert_eq!(drops.len(), 1);
        assert_eq!((drops[0].row, drops[0].col), (5, 7));
        assert_eq!(drops[0].fg, Some(Color::Red));
    }

    #[test]
    fn unknown_color_index_falls_back_to_green() {
        let mut f = quiet_field(20, 10);
        f.columns[0].drops = vec![Raindrop {
            y: 0.0,
            ch: 'Q',
            color: 99,
            trail: None,
        }];
        let mut r = renderer();
        let writes = r.render(&f, Duration::ZERO, &mut Counter(0));
        let w = writes.iter().find(|w| w.text == "Q").unwrap();
        assert_eq!(w.fg, Some(FALLBACK_GREEN));
        assert_eq!((w.row, w.col), (1, 1));
    }

    #[test]
    fn inactive_columns_are_not_drawn() {
        let mut f = quiet_field(20, 10);
        f.columns[2].active = false;
        f.columns[2].drops = vec![Raindrop {
            y: 3.0,
            ch: 'I',
            color: 0,
            trail: None,
        }];
        let mut r = renderer();
        let writes = r.render(&f, Duration::ZERO, &mut Counter(0));
        assert!(writes.iter().all(|w| w.text != "I"));
    }

    #[test]
    fn art_is_centered_below_the_bubble() {
        let f = quiet_field(80, 25);
        let mut r = renderer();
        let writes = r.render(&f, Duration::ZERO, &mut Counter(0));

        // (25 - 10) / 2 + 2
        let top = writes.iter().find(|w| w.text == "╔═══════════╗").unwrap();
        assert_eq!(top.row, 9);
        assert_eq!(top.col, (80 - 13) / 2 + 1);

        let pointer = writes.iter().find(|w| w.text == BUBBLE_POINTER).unwrap();
        assert_eq!(pointer.row, 8);
        let bottom = writes.iter().find(|w| w.text.starts_with('╰')).unwrap();
        assert_eq!(bottom.row, 7);
        let content = writes.iter().find(|w| w.text.contains("phrase 1")).unwrap();
        assert_eq!(content.row, 6);
        let border = writes.iter().find(|w| w.text.starts_with('╭')).unwrap();
        assert_eq!(border.row, 5);
        // "phrase 1" is 8 chars, so the bubble is 12 wide.
        assert_eq!(border.col as usize, (80 - 12) / 2 + 1);
    }

    #[test]
    fn art_glow_alternates_every_sixty_ticks() {
        let f = quiet_field(80, 25);
        let mut r = renderer();
        let mut src = Counter(0);
        let art_color = |writes: &[PositionedWrite]| {
            writes
                .iter()
                .find(|w| w.text == "╔═══════════╗")
                .and_then(|w| w.fg)
        };

        let first = art_color(&r.render(&f, Duration::ZERO, &mut src));
        for _ in 1..60 {
            r.render(&f, Duration::ZERO, &mut src);
        }
        let second = art_color(&r.render(&f, Duration::ZERO, &mut src));
        for _ in 61..120 {
            r.render(&f, Duration::ZERO, &mut src);
        }
        let third = art_color(&r.render(&f, Duration::ZERO, &mut src));

        assert_eq!(first, Some(Color::Cyan));
        assert_eq!(second, Some(Color::DarkCyan));
        assert_eq!(third, first);
    }

    #[test]
    fn tiny_screens_never_produce_row_or_col_zero() {
        let f = quiet_field(8, 4);
        let mut r = renderer();
        let writes = r.render(&f, Duration::ZERO, &mut Counter(0));
        assert!(writes.iter().all(|w| w.row >= 1 && w.row <= 4 && w.col >= 1));
    }

    #[test]
    fn trails_render_dimmer_than_heads() {
        let o = FieldOptions {
            density: Some(1.0),
            ..FieldOptions::default()
        };
        let mut f = Field::new(20, 10, &o, StdRng::seed_from_u64(3));
        for c in &mut f.columns {
            c.drops.clear();
        }
        f.columns[0].drops = vec![Raindrop {
            y: 5.0,
            ch: 'H',
            color: 1,
            trail: Some(
                (0..3)
                    .map(|k| crate::field::TrailSlot {
                        ch: 't',
                        y: 5.0 - (k as f32 + 1.0),
                        opacity: 1.0 - k as f32 * 0.3,
                    })
                    .collect(),
            ),
        }];
        let mut r = renderer();
        let writes = r.render(&f, Duration::ZERO, &mut Counter(0));
        let trail: Vec<&PositionedWrite> = writes.iter().filter(|w| w.text == "t").collect();
        assert_eq!(
            trail.iter().map(|w| w.row).collect::<Vec<_>>(),
            vec![5, 4, 3]
        );
        assert_eq!(trail[2].fg, Some(Color::DarkGreen));
        let head_pos = writes.iter().position(|w| w.text == "H").unwrap();
        let last_trail = writes.iter().rposition(|w| w.text == "t").unwrap();
        assert!(head_pos > last_trail);
    }
}
