#![forbid(unsafe_code)]

//! Braille sub-cell plotting surface.
//!
//! Each terminal cell holds a 2x4 grid of braille dots, so a `w x h`
//! cell area gives a `2w x 4h` pixel surface. Dots accumulate per cell;
//! the cell's color is the color of the last dot set in it.

use bioscatter_core::palette::Rgb;

use crate::buffer::Buffer;
use crate::cell::Cell;
use crate::geometry::Rect;

/// Unicode braille block origin.
const BRAILLE_BASE: u32 = 0x2800;

/// Dot bit for sub-cell position (dx in 0..2, dy in 0..4).
const DOT_BITS: [[u8; 2]; 4] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

/// Horizontal pixels per cell.
pub const PX_PER_COL: u16 = 2;
/// Vertical pixels per cell.
pub const PX_PER_ROW: u16 = 4;

/// A pixel surface that rasterizes to braille cells.
#[derive(Debug, Clone)]
pub struct BrailleCanvas {
    cols: u16,
    rows: u16,
    dots: Vec<u8>,
    colors: Vec<Option<Rgb>>,
}

impl BrailleCanvas {
    /// Create a canvas covering `cols x rows` cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        let size = cols as usize * rows as usize;
        Self {
            cols,
            rows,
            dots: vec![0; size],
            colors: vec![None; size],
        }
    }

    /// Pixel width of the surface.
    #[inline]
    pub const fn pixel_width(&self) -> u16 {
        self.cols * PX_PER_COL
    }

    /// Pixel height of the surface.
    #[inline]
    pub const fn pixel_height(&self) -> u16 {
        self.rows * PX_PER_ROW
    }

    /// Set the pixel at (px, py). Out-of-range pixels are dropped.
    ///
    /// Fractional positions round to the nearest pixel; negative values
    /// are off-surface by definition.
    pub fn set_pixel(&mut self, px: f64, py: f64, color: Rgb) {
        if !px.is_finite() || !py.is_finite() || px < -0.5 || py < -0.5 {
            return;
        }
        let px = px.round();
        let py = py.round();
        if px < 0.0 || py < 0.0 {
            return;
        }
        let (px, py) = (px as u32, py as u32);
        if px >= self.pixel_width() as u32 || py >= self.pixel_height() as u32 {
            return;
        }
        let col = (px / PX_PER_COL as u32) as usize;
        let row = (py / PX_PER_ROW as u32) as usize;
        let dx = (px % PX_PER_COL as u32) as usize;
        let dy = (py % PX_PER_ROW as u32) as usize;
        let i = row * self.cols as usize + col;
        self.dots[i] |= DOT_BITS[dy][dx];
        self.colors[i] = Some(color);
    }

    /// Rasterize into `buffer` with the canvas origin at `area`'s corner.
    ///
    /// Cells with no dots are left untouched so the canvas can overlay
    /// axes already drawn underneath.
    pub fn blit(&self, area: Rect, buffer: &mut Buffer) {
        let cols = self.cols.min(area.width);
        let rows = self.rows.min(area.height);
        for row in 0..rows {
            for col in 0..cols {
                let i = row as usize * self.cols as usize + col as usize;
                let dots = self.dots[i];
                if dots == 0 {
                    continue;
                }
                // All 256 braille code points are valid chars.
                let symbol = char::from_u32(BRAILLE_BASE + dots as u32).unwrap_or(' ');
                let mut cell = Cell::from_char(symbol);
                cell.fg = self.colors[i];
                buffer.set(area.x + col, area.y + row, cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn top_left_pixel_is_dot_one() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(0.0, 0.0, RED);
        let mut buf = Buffer::new(2, 1);
        canvas.blit(Rect::from_size(2, 1), &mut buf);
        assert_eq!(buf.get(0, 0).map(|c| c.symbol), Some('\u{2801}'));
    }

    #[test]
    fn dots_accumulate_within_a_cell() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0.0, 0.0, RED);
        canvas.set_pixel(1.0, 3.0, BLUE);
        let mut buf = Buffer::new(1, 1);
        canvas.blit(Rect::from_size(1, 1), &mut buf);
        // Dot 1 (0x01) plus lower-right dot 8 (0x80).
        assert_eq!(buf.get(0, 0).map(|c| c.symbol), Some('\u{2881}'));
        // Last writer wins for the cell color.
        assert_eq!(buf.get(0, 0).and_then(|c| c.fg), Some(BLUE));
    }

    #[test]
    fn pixels_map_to_expected_cells() {
        let mut canvas = BrailleCanvas::new(3, 2);
        canvas.set_pixel(5.0, 7.0, RED);
        let mut buf = Buffer::new(3, 2);
        canvas.blit(Rect::from_size(3, 2), &mut buf);
        // Pixel (5, 7) lives in cell (2, 1), lower-right dot.
        assert_eq!(buf.get(2, 1).map(|c| c.symbol), Some('\u{2880}'));
        assert_eq!(buf.get(0, 0).map(|c| c.symbol), Some(' '));
    }

    #[test]
    fn out_of_range_pixels_are_dropped() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(-3.0, 0.0, RED);
        canvas.set_pixel(0.0, 100.0, RED);
        canvas.set_pixel(f64::NAN, 1.0, RED);
        let mut buf = Buffer::new(2, 2);
        canvas.blit(Rect::from_size(2, 2), &mut buf);
        assert_eq!(buf, Buffer::new(2, 2));
    }

    #[test]
    fn empty_cells_do_not_overwrite_background() {
        let mut buf = Buffer::new(2, 1);
        buf.set(0, 0, Cell::from_char('|'));
        let canvas = BrailleCanvas::new(2, 1);
        canvas.blit(Rect::from_size(2, 1), &mut buf);
        assert_eq!(buf.get(0, 0).map(|c| c.symbol), Some('|'));
    }

    #[test]
    fn blit_clips_to_area() {
        let mut canvas = BrailleCanvas::new(4, 4);
        canvas.set_pixel(7.0, 15.0, RED);
        let mut buf = Buffer::new(2, 2);
        canvas.blit(Rect::from_size(2, 2), &mut buf);
        // Dot lies in canvas cell (3, 3), outside the 2x2 blit area.
        assert_eq!(buf, Buffer::new(2, 2));
    }
}
