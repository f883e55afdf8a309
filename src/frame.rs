// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::renderer::PositionedWrite;

/// Cell grid the renderer's writes land in. Tracks which cells changed so the
/// terminal only repaints those.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
    touched: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
            touched: Vec::new(),
        }
    }

    /// Blanks everything written since the previous `begin`.
    pub fn begin(&mut self) {
        let touched = std::mem::take(&mut self.touched);
        for &i in &touched {
            self.set_index(i, Cell::BLANK);
        }
        self.touched = touched;
        self.touched.clear();
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }

        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or(Cell::BLANK)
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.set_index(i, cell);
            if cell != Cell::BLANK {
                self.touched.push(i);
            }
        }
    }

    fn set_index(&mut self, i: usize, cell: Cell) {
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// Applies 1-based positioned writes, clipping at the edges. With `mono`
    /// set, colors are dropped.
    pub fn apply(&mut self, writes: &[PositionedWrite], mono: bool) {
        for w in writes {
            if w.row == 0 || w.col == 0 {
                continue;
            }
            let y = w.row - 1;
            let fg = if mono { None } else { w.fg };
            for (i, ch) in w.text.chars().enumerate() {
                let Some(x) = (w.col - 1).checked_add(i as u16) else {
                    break;
                };
                if x >= self.width {
                    break;
                }
                self.set(
                    x,
                    y,
                    Cell {
                        ch,
                        fg,
                        bold: w.bold,
                    },
                );
            }
        }
    }

    /// The frame as plain text, one string per row, trailing blanks trimmed.
    pub fn to_plain_lines(&self) -> Vec<String> {
        let w = self.width as usize;
        if w == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(w)
            .map(|row| {
                let s: String = row.iter().map(|c| c.ch).collect();
                s.trim_end().to_string()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::style::Color;

    use super::*;

    fn at(f: &Frame, x: u16, y: u16) -> Cell {
        f.cell_at_index(f.index(x, y).unwrap())
    }

    fn write(row: u16, col: u16, text: &str) -> PositionedWrite {
        PositionedWrite {
            row,
            col,
            text: text.to_string(),
            fg: Some(Color::Green),
            bold: false,
        }
    }

    #[test]
    fn apply_is_one_based_and_clips() {
        let mut f = Frame::new(4, 2);
        f.apply(&[write(1, 1, "ab"), write(2, 3, "xyz"), write(3, 1, "no")], false);
        assert_eq!(at(&f, 0, 0).ch, 'a');
        assert_eq!(at(&f, 1, 0).ch, 'b');
        assert_eq!(at(&f, 2, 1).ch, 'x');
        assert_eq!(at(&f, 3, 1).ch, 'y');
        assert_eq!(f.to_plain_lines(), vec!["ab".to_string(), "  xy".to_string()]);
    }

    #[test]
    fn zero_coordinates_are_ignored() {
        let mut f = Frame::new(3, 3);
        f.apply(&[write(0, 1, "a"), write(1, 0, "b")], false);
        assert!(f.to_plain_lines().iter().all(|l| l.is_empty()));
    }

    #[test]
    fn mono_drops_colors() {
        let mut f = Frame::new(2, 1);
        f.apply(&[write(1, 1, "a")], true);
        assert_eq!(at(&f, 0, 0).fg, None);
    }

    #[test]
    fn only_changed_cells_are_dirty_after_the_first_paint() {
        let mut f = Frame::new(5, 1);
        f.begin();
        f.apply(&[write(1, 1, "ab")], false);
        assert!(f.is_dirty_all());
        f.clear_dirty();

        f.begin();
        f.apply(&[write(1, 2, "b")], false);
        assert!(f.dirty_indices().contains(&0));
        assert!(!f.dirty_indices().contains(&2));
        assert_eq!(at(&f, 0, 0).ch, ' ');
        assert_eq!(at(&f, 1, 0).ch, 'b');
    }

    #[test]
    fn rewritten_cells_end_up_restored() {
        let mut f = Frame::new(5, 2);
        f.apply(&[write(2, 2, "hey")], false);
        f.clear_dirty();
        f.begin();
        f.apply(&[write(2, 2, "hey")], false);
        // Blanked then restored, so marked but equal to what is on screen.
        assert!(f
            .dirty_indices()
            .iter()
            .all(|&i| f.cell_at_index(i).ch != ' '));
    }
}
