#![forbid(unsafe_code)]

//! Loading spinner.

use crate::buffer::Buffer;
use crate::geometry::Rect;
use crate::widgets::Widget;

/// Braille spinner frames.
pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An animated activity indicator with an optional label.
#[derive(Debug, Clone)]
pub struct Spinner<'a> {
    frame: usize,
    label: Option<&'a str>,
}

impl<'a> Spinner<'a> {
    /// Spinner at the given animation frame (wraps automatically).
    pub fn new(frame: usize) -> Self {
        Self { frame, label: None }
    }

    /// Attach a label after the glyph.
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }
}

impl Widget for Spinner<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let glyph = DOTS[self.frame % DOTS.len()];
        buf.set_string(area.x, area.y, glyph, None, true);
        if let Some(label) = self.label {
            buf.set_string(area.x + 2, area.y, label, None, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_wraps() {
        let mut buf = Buffer::new(10, 1);
        Spinner::new(DOTS.len()).render(Rect::from_size(10, 1), &mut buf);
        assert_eq!(buf.get(0, 0).map(|c| c.symbol.to_string()), Some(DOTS[0].to_string()));
    }

    #[test]
    fn label_follows_glyph() {
        let mut buf = Buffer::new(16, 1);
        Spinner::new(0)
            .label("clustering")
            .render(Rect::from_size(16, 1), &mut buf);
        assert_eq!(buf.get(2, 0).map(|c| c.symbol), Some('c'));
    }

    #[test]
    fn empty_area_renders_nothing() {
        let mut buf = Buffer::new(4, 1);
        Spinner::new(0).render(Rect::new(0, 0, 0, 0), &mut buf);
        assert_eq!(buf, Buffer::new(4, 1));
    }
}
