#![forbid(unsafe_code)]

//! Hover tooltip for a single point.

use bioscatter_core::Point;
use bioscatter_core::palette::{self, Rgb};

use crate::buffer::Buffer;
use crate::cell::Cell;
use crate::geometry::Rect;
use crate::widgets::Widget;

const TOOLTIP_BG: Rgb = Rgb::new(40, 40, 40);

/// A small box describing the hovered point, anchored near a cell.
///
/// The box prefers to sit one cell right and below the anchor and flips
/// to the other side when that would leave the render area, so it never
/// covers the hovered point itself.
#[derive(Debug, Clone, Copy)]
pub struct Tooltip {
    anchor_x: u16,
    anchor_y: u16,
    point: Point,
}

impl Tooltip {
    /// Tooltip for `point`, anchored at the hovered cell.
    pub fn new(anchor_x: u16, anchor_y: u16, point: Point) -> Self {
        Self {
            anchor_x,
            anchor_y,
            point,
        }
    }

    fn lines(&self) -> [String; 2] {
        [
            format!("({:.2}, {:.2})", self.point.x, self.point.y),
            palette::cluster_name(self.point.cluster),
        ]
    }
}

impl Widget for Tooltip {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 2;
        let height = lines.len() as u16;
        if width > area.width || height > area.height {
            return;
        }

        let mut x = self.anchor_x.saturating_add(1);
        if x + width > area.right() {
            x = self.anchor_x.saturating_sub(width);
        }
        let mut y = self.anchor_y.saturating_add(1);
        if y + height > area.bottom() {
            y = self.anchor_y.saturating_sub(height);
        }
        let x = x.clamp(area.x, area.right().saturating_sub(width));
        let y = y.clamp(area.y, area.bottom().saturating_sub(height));

        let accent = palette::cluster_color(self.point.cluster);
        buf.fill(
            Rect::new(x, y, width, height),
            Cell::from_char(' ').with_bg(TOOLTIP_BG),
        );
        for (i, line) in lines.iter().enumerate() {
            let row = y + i as u16;
            for (j, ch) in line.chars().enumerate() {
                let fg = if i == 1 { Some(accent) } else { None };
                let mut cell = Cell::from_char(ch).with_bg(TOOLTIP_BG);
                cell.fg = fg;
                buf.set(x + 1 + j as u16, row, cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_text(buf: &Buffer, x: u16, y: u16, len: u16) -> String {
        (x..x + len)
            .filter_map(|c| buf.get(c, y).map(|c| c.symbol))
            .collect()
    }

    #[test]
    fn renders_coordinates_and_cluster() {
        let mut buf = Buffer::new(40, 10);
        let tooltip = Tooltip::new(5, 3, Point::new(1.5, -2.25, 2));
        tooltip.render(Rect::from_size(40, 10), &mut buf);
        assert!(cell_text(&buf, 6, 4, 20).contains("(1.50, -2.25)"));
        assert!(cell_text(&buf, 6, 5, 20).contains("cluster 2"));
    }

    #[test]
    fn flips_when_anchor_is_near_the_edge() {
        let mut buf = Buffer::new(20, 6);
        let tooltip = Tooltip::new(19, 5, Point::new(0.0, 0.0, 0));
        tooltip.render(Rect::from_size(20, 6), &mut buf);
        // Nothing rendered to the right of or below the anchor.
        assert!(buf.get(19, 5).is_some_and(|c| c.bg.is_none()));
        // The box landed somewhere left/above.
        let any_bg = (0..20).any(|x| (0..6).any(|y| buf.get(x, y).is_some_and(|c| c.bg.is_some())));
        assert!(any_bg);
    }

    #[test]
    fn too_small_area_renders_nothing() {
        let mut buf = Buffer::new(4, 1);
        Tooltip::new(0, 0, Point::new(0.0, 0.0, 0)).render(Rect::from_size(4, 1), &mut buf);
        assert_eq!(buf, Buffer::new(4, 1));
    }

    #[test]
    fn noise_points_name_noise() {
        let mut buf = Buffer::new(40, 10);
        Tooltip::new(2, 2, Point::new(0.0, 0.0, -1)).render(Rect::from_size(40, 10), &mut buf);
        let row: String = (0..40).filter_map(|x| buf.get(x, 4).map(|c| c.symbol)).collect();
        assert!(row.contains("noise"));
    }
}
