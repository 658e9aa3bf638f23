#![forbid(unsafe_code)]

//! Scatter chart: axes, tick labels, braille point cloud, legend.
//!
//! The chart renders through already-composed effective scales, so pan
//! and zoom are invisible here: callers rescale, the chart just plots.
//! Points pushed outside the plot by the current transform are clipped
//! by the canvas.

use bioscatter_core::palette;
use bioscatter_core::{Axis, LinearScale, PointSet};

use crate::buffer::Buffer;
use crate::canvas::{BrailleCanvas, PX_PER_COL, PX_PER_ROW};
use crate::cell::Cell;
use crate::geometry::Rect;
use crate::widgets::Widget;

/// Columns reserved for y tick labels.
const Y_GUTTER: u16 = 8;
/// Rows reserved below the plot: axis line and x tick labels.
const X_GUTTER: u16 = 2;
/// Tick count per axis.
const TICKS: u16 = 4;

/// Chart area split into label gutters and the plot rectangle.
///
/// The same split is used for rendering and for mouse hit testing, so
/// a cell the user points at and the cell a point rendered into always
/// agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub area: Rect,
    pub plot: Rect,
}

impl ChartLayout {
    /// Split `area` into gutters and plot.
    pub fn new(area: Rect) -> Self {
        let plot = Rect::new(
            area.x.saturating_add(Y_GUTTER + 1),
            area.y,
            area.width.saturating_sub(Y_GUTTER + 1),
            area.height.saturating_sub(X_GUTTER),
        );
        Self { area, plot }
    }

    /// Horizontal pixel span of the plot's braille surface.
    #[inline]
    pub fn pixel_span_x(&self) -> f64 {
        (self.plot.width * PX_PER_COL) as f64
    }

    /// Vertical pixel span of the plot's braille surface.
    #[inline]
    pub fn pixel_span_y(&self) -> f64 {
        (self.plot.height * PX_PER_ROW) as f64
    }

    /// The plot-pixel coordinate at the center of a screen cell, or
    /// `None` when the cell lies outside the plot.
    pub fn cell_to_pixel(&self, x: u16, y: u16) -> Option<(f64, f64)> {
        if !self.plot.contains(x, y) {
            return None;
        }
        let px = (x - self.plot.x) as f64 * PX_PER_COL as f64 + (PX_PER_COL as f64 - 1.0) / 2.0;
        let py = (y - self.plot.y) as f64 * PX_PER_ROW as f64 + (PX_PER_ROW as f64 - 1.0) / 2.0;
        Some((px, py))
    }

    /// The screen cell containing a plot-pixel coordinate, or `None`
    /// when the pixel is off-plot.
    pub fn pixel_to_cell(&self, px: f64, py: f64) -> Option<(u16, u16)> {
        if !px.is_finite() || !py.is_finite() || px < 0.0 || py < 0.0 {
            return None;
        }
        let col = (px / PX_PER_COL as f64).floor() as u64;
        let row = (py / PX_PER_ROW as f64).floor() as u64;
        if col >= self.plot.width as u64 || row >= self.plot.height as u64 {
            return None;
        }
        Some((self.plot.x + col as u16, self.plot.y + row as u16))
    }
}

/// The index of the point nearest to a plot-pixel position, within
/// `max_dist` pixels. Ties keep the earliest point.
pub fn nearest_point(
    points: &PointSet,
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    px: f64,
    py: f64,
    max_dist: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let dx = x_scale.position(p.x) - px;
        let dy = y_scale.position(p.y) - py;
        let d2 = dx * dx + dy * dy;
        if d2.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, b)| d2 < b) {
            best = Some((i, d2));
        }
    }
    best.and_then(|(i, d2)| (d2 <= max_dist * max_dist).then_some(i))
}

/// The scatter chart widget.
#[derive(Debug, Clone, Copy)]
pub struct ScatterChart<'a> {
    points: &'a PointSet,
    x_scale: &'a LinearScale,
    y_scale: &'a LinearScale,
    highlight: Option<usize>,
}

impl<'a> ScatterChart<'a> {
    /// Chart over `points` with effective (already zoomed) scales.
    pub fn new(points: &'a PointSet, x_scale: &'a LinearScale, y_scale: &'a LinearScale) -> Self {
        Self {
            points,
            x_scale,
            y_scale,
            highlight: None,
        }
    }

    /// Emphasize one point (the hovered one).
    pub fn highlight(mut self, index: Option<usize>) -> Self {
        self.highlight = index;
        self
    }

    fn render_axes(&self, layout: &ChartLayout, buf: &mut Buffer) {
        let plot = layout.plot;
        let axis_x = plot.x - 1;
        let axis_y = plot.bottom();
        for y in plot.y..plot.bottom() {
            buf.set(axis_x, y, Cell::from_char('│'));
        }
        buf.set(axis_x, axis_y, Cell::from_char('└'));
        for x in plot.x..plot.right() {
            buf.set(x, axis_y, Cell::from_char('─'));
        }
    }

    fn render_ticks(&self, layout: &ChartLayout, buf: &mut Buffer) {
        let plot = layout.plot;
        if plot.is_empty() {
            return;
        }

        for i in 0..TICKS as u32 {
            // Spread ticks from first to last row/column. Interpolate in
            // u32; u16 would overflow on very wide terminals.
            let step = (TICKS as u32 - 1).max(1);
            let row = plot.y + ((plot.height as u32 - 1) * i / step) as u16;
            let py = (row - plot.y) as f64 * PX_PER_ROW as f64 + PX_PER_ROW as f64 / 2.0;
            let label = format_tick(self.y_scale.invert(py));
            let width = label.chars().count() as u16;
            let x = (layout.area.x + Y_GUTTER).saturating_sub(width);
            buf.set_string(x, row, &label, None, false);

            let col = plot.x + ((plot.width as u32 - 1) * i / step) as u16;
            let px = (col - plot.x) as f64 * PX_PER_COL as f64 + PX_PER_COL as f64 / 2.0;
            let label = format_tick(self.x_scale.invert(px));
            let label_x = col.saturating_sub(label.chars().count() as u16 / 2);
            buf.set_string(label_x, plot.bottom() + 1, &label, None, false);
        }
    }

    fn render_points(&self, layout: &ChartLayout, buf: &mut Buffer) {
        let plot = layout.plot;
        let mut canvas = BrailleCanvas::new(plot.width, plot.height);
        for p in self.points {
            canvas.set_pixel(
                self.x_scale.position(p.x),
                self.y_scale.position(p.y),
                palette::cluster_color(p.cluster),
            );
        }
        canvas.blit(plot, buf);
    }

    fn render_highlight(&self, layout: &ChartLayout, buf: &mut Buffer) {
        let Some(index) = self.highlight else {
            return;
        };
        let Some(p) = self.points.points().get(index) else {
            return;
        };
        let px = self.x_scale.position(p.x);
        let py = self.y_scale.position(p.y);
        if let Some((x, y)) = layout.pixel_to_cell(px, py) {
            buf.set(
                x,
                y,
                Cell::from_char('●')
                    .with_fg(palette::cluster_color(p.cluster))
                    .bold(),
            );
        }
    }

    fn render_legend(&self, layout: &ChartLayout, buf: &mut Buffer) {
        let plot = layout.plot;
        let labels = self.points.cluster_labels();
        for (i, label) in labels.iter().enumerate() {
            let y = plot.y + i as u16;
            if y >= plot.bottom() {
                break;
            }
            let name = palette::cluster_name(*label);
            let width = name.chars().count() as u16 + 2;
            if width + 1 > plot.width {
                continue;
            }
            let x = plot.x + 1;
            buf.set(
                x,
                y,
                Cell::from_char('●').with_fg(palette::cluster_color(*label)),
            );
            buf.set_string(x + 2, y, &name, None, false);
        }
    }
}

impl Widget for ScatterChart<'_> {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        let layout = ChartLayout::new(area);
        if layout.plot.is_empty() {
            return;
        }
        self.render_axes(&layout, buf);
        self.render_ticks(&layout, buf);
        self.render_points(&layout, buf);
        self.render_highlight(&layout, buf);
        self.render_legend(&layout, buf);
    }
}

/// Compact tick label with magnitude-dependent precision.
fn format_tick(value: f64) -> String {
    let abs = value.abs();
    if !value.is_finite() {
        return String::from("-");
    }
    if abs >= 1000.0 {
        format!("{value:.0}")
    } else if abs >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}
