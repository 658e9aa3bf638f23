#![forbid(unsafe_code)]

//! Viewer widgets.

pub mod chart;
pub mod spinner;
pub mod status;
pub mod tooltip;

use crate::buffer::Buffer;
use crate::geometry::Rect;

/// A renderable component.
///
/// Widgets render themselves into a [`Buffer`] within a given [`Rect`].
pub trait Widget {
    /// Render the widget into the buffer at the given area.
    fn render(&self, area: Rect, buf: &mut Buffer);
}
