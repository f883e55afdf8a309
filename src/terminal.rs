// Copyright (c) 2026 rezky_nightky

use std::env;
use std::io::{stdout, IsTerminal, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::runtime::ColorMode;

pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 10;
pub const MAX_WIDTH: u16 = 200;
pub const MAX_HEIGHT: u16 = 100;
pub const TITLE: &str = "Buzzphrase Buddy";

pub fn check_size(width: u16, height: u16) -> Result<()> {
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(Error::TooSmall {
            width,
            height,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
        });
    }
    Ok(())
}

/// Caps a drawing area at the largest size the animation handles. Anything
/// past it stays blank.
pub fn clamp_size(width: u16, height: u16) -> (u16, u16) {
    (width.min(MAX_WIDTH), height.min(MAX_HEIGHT))
}

pub fn detect_color_mode() -> ColorMode {
    color_mode_from_env(
        env::var_os("NO_COLOR").is_some(),
        &env::var("COLORTERM").unwrap_or_default(),
        &env::var("TERM").unwrap_or_default(),
    )
}

fn color_mode_from_env(no_color: bool, colorterm: &str, term: &str) -> ColorMode {
    if no_color {
        return ColorMode::Mono;
    }
    let colorterm = colorterm.to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }
    let term = term.to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.is_empty() || term == "linux" || term == "vt100" {
        return ColorMode::Color16;
    }
    ColorMode::Color256
}

pub fn stdout_is_terminal() -> bool {
    stdout().is_terminal()
}

struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
        }
    }
}

/// Owns the terminal's raw mode, alternate screen and hidden cursor for as
/// long as it lives.
pub struct Terminal {
    stdout: Stdout,
    last: Option<LastFrame>,
    run_buf: String,
    row_dirty: Vec<Vec<usize>>,
    touched_rows: Vec<u16>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        if !out.is_terminal() {
            return Err(Error::NotATerminal);
        }
        let (w, h) = terminal::size()?;
        check_size(w, h)?;

        terminal::enable_raw_mode()?;
        let init_res: std::io::Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            let _ = out.execute(terminal::SetTitle(TITLE));
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e.into());
        }
        tracing::debug!(width = w, height = h, "terminal acquired");

        Ok(Self {
            stdout: out,
            last: None,
            run_buf: String::with_capacity(64),
            row_dirty: Vec::new(),
            touched_rows: Vec::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }

    pub fn read_event() -> Result<event::Event> {
        Ok(event::read()?)
    }

    fn set_style(
        &mut self,
        fg: Option<Color>,
        bold: bool,
        cur: &mut (Option<Color>, bool),
    ) -> Result<()> {
        if fg != cur.0 {
            self.stdout.queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            cur.0 = fg;
        }
        if bold != cur.1 {
            self.stdout.queue(SetAttribute(if bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            cur.1 = bold;
        }
        Ok(())
    }

    /// Paints the frame, sending only cells that differ from the last paint.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let mut style: (Option<Color>, bool) = (None, false);
        let mut cur_pos: Option<(u16, u16)> = None;

        let size_changed = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);

        let total_cells = frame.width as usize * frame.height as usize;
        let dirty_is_large = total_cells > 0 && frame.dirty_indices().len() >= total_cells / 3;

        if size_changed || frame.is_dirty_all() || dirty_is_large {
            if size_changed {
                self.stdout
                    .queue(terminal::Clear(terminal::ClearType::All))?;
                self.last = Some(LastFrame::new(frame.width, frame.height));
            }

            for y in 0..frame.height {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..frame.width {
                    let idx = y as usize * frame.width as usize + x as usize;
                    let cell = frame.cell_at_index(idx);
                    self.set_style(cell.fg, cell.bold, &mut style)?;
                    self.stdout.queue(Print(cell.ch))?;
                    if let Some(last) = self.last.as_mut() {
                        last.cells[idx] = cell;
                    }
                }
            }

            self.stdout.queue(SetAttribute(Attribute::Reset))?;
            self.stdout.queue(ResetColor)?;
            self.stdout.flush()?;
            frame.clear_dirty();
            return Ok(());
        }

        let width_usize = frame.width as usize;
        if self.row_dirty.len() != frame.height as usize {
            self.row_dirty = vec![Vec::new(); frame.height as usize];
        }
        for r in &mut self.row_dirty {
            r.clear();
        }
        self.touched_rows.clear();

        for &idx in frame.dirty_indices() {
            let y = (idx / width_usize) as u16;
            if y >= frame.height {
                continue;
            }
            let b = &mut self.row_dirty[y as usize];
            if b.is_empty() {
                self.touched_rows.push(y);
            }
            b.push(idx);
        }
        self.touched_rows.sort_unstable();

        let rows = std::mem::take(&mut self.touched_rows);
        for &y0 in &rows {
            let mut b = std::mem::take(&mut self.row_dirty[y0 as usize]);
            b.sort_unstable();

            let mut i = 0usize;
            while i < b.len() {
                let idx0 = b[i];
                let cell0 = frame.cell_at_index(idx0);
                let Some(last) = self.last.as_mut() else {
                    break;
                };
                if last.cells[idx0] == cell0 {
                    i += 1;
                    continue;
                }
                last.cells[idx0] = cell0;

                // Extend a run of adjacent changed cells sharing one style.
                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                let mut run_len: u16 = 1;
                let mut last_idx = idx0;
                let mut j = i + 1;
                while j < b.len() {
                    let idx1 = b[j];
                    if idx1 != last_idx + 1 {
                        break;
                    }
                    let cell1 = frame.cell_at_index(idx1);
                    if last.cells[idx1] == cell1 || cell1.fg != cell0.fg || cell1.bold != cell0.bold
                    {
                        break;
                    }
                    self.run_buf.push(cell1.ch);
                    last.cells[idx1] = cell1;
                    run_len = run_len.saturating_add(1);
                    last_idx = idx1;
                    j += 1;
                }

                let x0 = (idx0 % width_usize) as u16;
                if cur_pos != Some((x0, y0)) {
                    self.stdout.queue(cursor::MoveTo(x0, y0))?;
                }
                self.set_style(cell0.fg, cell0.bold, &mut style)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;

                let next_x = x0.saturating_add(run_len);
                cur_pos = (next_x < frame.width).then_some((next_x, y0));
                i = j;
            }

            b.clear();
            self.row_dirty[y0 as usize] = b;
        }
        self.touched_rows = rows;

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
        tracing::debug!("terminal restored");
    }
}

/// Stateless restore for paths where the `Terminal` handle cannot be
/// dropped: signal handlers and the panic hook.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_check_enforces_minimum() {
        assert!(check_size(20, 10).is_ok());
        assert!(matches!(
            check_size(19, 10),
            Err(Error::TooSmall { width: 19, .. })
        ));
        assert!(check_size(80, 9).is_err());
    }

    #[test]
    fn huge_sizes_are_capped() {
        assert_eq!(clamp_size(60000, 60000), (MAX_WIDTH, MAX_HEIGHT));
        assert_eq!(clamp_size(250, 40), (200, 40));
        assert_eq!(clamp_size(80, 150), (80, 100));
        assert_eq!(clamp_size(80, 24), (80, 24));
    }

    #[test]
    fn color_mode_follows_environment() {
        assert_eq!(color_mode_from_env(true, "truecolor", ""), ColorMode::Mono);
        assert_eq!(
            color_mode_from_env(false, "24bit", "xterm"),
            ColorMode::TrueColor
        );
        assert_eq!(color_mode_from_env(false, "", "dumb"), ColorMode::Mono);
        assert_eq!(
            color_mode_from_env(false, "", "xterm-256color"),
            ColorMode::Color256
        );
        assert_eq!(color_mode_from_env(false, "", "xterm"), ColorMode::Color256);
        assert_eq!(color_mode_from_env(false, "", "linux"), ColorMode::Color16);
    }
}
