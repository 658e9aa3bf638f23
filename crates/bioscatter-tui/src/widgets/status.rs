#![forbid(unsafe_code)]

//! One-row status line with left- and right-aligned segments.

use unicode_width::UnicodeWidthStr;

use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::widgets::Widget;

/// A status row: left-aligned state text, right-aligned key hints.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    left: Vec<String>,
    right: Vec<String>,
}

impl StatusLine {
    /// An empty status line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a left-aligned segment.
    pub fn left(mut self, text: impl Into<String>) -> Self {
        self.left.push(text.into());
        self
    }

    /// Append a right-aligned segment.
    pub fn right(mut self, text: impl Into<String>) -> Self {
        self.right.push(text.into());
        self
    }

    /// A `key description` hint segment.
    pub fn key_hint(self, key: &str, description: &str) -> Self {
        self.right(format!("[{key}] {description}"))
    }
}

impl Widget for StatusLine {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let y = area.y;
        let left = self.left.join("  ");
        buf.set_string(area.x, y, &left, None, false);

        let right = self.right.join("  ");
        let right_width = right.width() as u16;
        if right_width < area.width {
            let x = area.x + area.width - right_width;
            // Right segments win overlap; hints matter more than state text.
            buf.set_string(x, y, &right, None, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.width())
            .filter_map(|x| buf.get(x, y).map(|c| c.symbol))
            .collect()
    }

    #[test]
    fn left_and_right_segments_align() {
        let mut buf = Buffer::new(30, 1);
        StatusLine::new()
            .left("k-means")
            .key_hint("q", "quit")
            .render(Rect::from_size(30, 1), &mut buf);
        let row = row_text(&buf, 0);
        assert!(row.starts_with("k-means"));
        assert!(row.trim_end().ends_with("[q] quit"));
    }

    #[test]
    fn oversized_right_segment_is_dropped() {
        let mut buf = Buffer::new(6, 1);
        StatusLine::new()
            .left("ok")
            .right("much too long for the row")
            .render(Rect::from_size(6, 1), &mut buf);
        assert!(row_text(&buf, 0).starts_with("ok"));
    }
}
