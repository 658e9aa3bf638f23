#![forbid(unsafe_code)]

//! Cell grid and frame diffing.
//!
//! The `view` of the application model renders into a [`Buffer`]; the
//! presenter then emits only the cells that changed since the previous
//! frame, grouped into per-row runs to minimize cursor moves.

use unicode_width::UnicodeWidthChar;

use bioscatter_core::palette::Rgb;

use crate::cell::Cell;
use crate::geometry::Rect;

/// A 2-D grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a buffer of empty cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    /// Grid width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full-buffer rectangle.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// The cell at (x, y), if in bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Write a cell at (x, y). Out-of-bounds writes are dropped.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Write a string starting at (x, y), clipped to the row.
    ///
    /// Wide glyphs occupy their display width; the trailing half of a
    /// wide glyph is left as an empty continuation cell. Zero-width
    /// characters are skipped.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, fg: Option<Rgb>, bold: bool) {
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if col >= self.width {
                break;
            }
            let mut cell = Cell::from_char(ch);
            cell.fg = fg;
            cell.bold = bold;
            self.set(col, y, cell);
            for skip in 1..w {
                self.set(col + skip, y, Cell::EMPTY);
            }
            col = col.saturating_add(w);
        }
    }

    /// Fill a rectangle with one cell value.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let x_end = rect.right().min(self.width);
        let y_end = rect.bottom().min(self.height);
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                self.set(x, y, cell);
            }
        }
    }

    /// Compute the changed-cell runs between `prev` and `self`.
    ///
    /// Buffers of different sizes diff as a full repaint.
    pub fn diff(&self, prev: &Buffer) -> Vec<ChangeRun> {
        if self.width != prev.width || self.height != prev.height {
            return self.full_repaint_runs();
        }
        let mut runs = Vec::new();
        for y in 0..self.height {
            let mut run_start: Option<u16> = None;
            for x in 0..self.width {
                let changed = self.get(x, y) != prev.get(x, y);
                match (changed, run_start) {
                    (true, None) => run_start = Some(x),
                    (false, Some(start)) => {
                        runs.push(ChangeRun { y, x: start, len: x - start });
                        run_start = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = run_start {
                runs.push(ChangeRun {
                    y,
                    x: start,
                    len: self.width - start,
                });
            }
        }
        runs
    }

    /// One run per row, covering the whole buffer.
    pub fn full_repaint_runs(&self) -> Vec<ChangeRun> {
        (0..self.height)
            .map(|y| ChangeRun {
                y,
                x: 0,
                len: self.width,
            })
            .collect()
    }
}

/// A horizontal run of changed cells on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    pub y: u16,
    pub x: u16,
    pub len: u16,
}
