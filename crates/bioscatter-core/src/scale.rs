#![forbid(unsafe_code)]

//! Affine data-to-pixel scales.
//!
//! A [`LinearScale`] maps a data-space interval onto a pixel-space interval
//! by linear interpolation. The y-axis range is built inverted (larger data
//! value, smaller pixel y) to match screen-down orientation.

use crate::error::EmptyDataError;
use crate::point::PointSet;

/// Which coordinate a scale operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Pixel space reserved at both ends of an axis for ticks and labels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    /// Reserved before the drawable span (left for x, top for y).
    pub start: f64,
    /// Reserved after the drawable span (right for x, bottom for y).
    pub end: f64,
}

impl Margin {
    /// Create a margin pair.
    #[inline]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// A monotonic affine map from a data interval to a pixel interval.
///
/// The mapping is total: a degenerate domain (min == max) collapses every
/// input onto the midpoint of the pixel range instead of dividing by zero,
/// and `invert` mirrors that by returning the domain midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale from a data domain and a pixel range.
    #[inline]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// The data-space interval.
    #[inline]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The pixel-space interval.
    #[inline]
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Same domain, different pixel range.
    #[inline]
    pub const fn with_range(&self, range: (f64, f64)) -> Self {
        Self {
            domain: self.domain,
            range,
        }
    }

    /// Map a data value to a pixel position.
    pub fn position(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / span * (r1 - r0)
    }

    /// Map a pixel position back to a data value.
    pub fn invert(&self, p: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (p - r0) / span * (d1 - d0)
    }
}

/// Derive the base scale for one axis from a point set's extent.
///
/// The domain is the [min, max] of the axis values. The range spans the
/// drawable pixels with `margin` reserved at each end; for [`Axis::Y`] the
/// range is inverted so larger data values sit higher on screen.
///
/// Fails with [`EmptyDataError`] when the set has no points (or only NaN
/// coordinates on this axis); the caller must not proceed to render.
pub fn compute_scale(
    points: &PointSet,
    axis: Axis,
    pixel_span: f64,
    margin: Margin,
) -> Result<LinearScale, EmptyDataError> {
    let domain = points.extent(axis).ok_or(EmptyDataError)?;
    let range = match axis {
        Axis::X => (margin.start, pixel_span - margin.end),
        Axis::Y => (pixel_span - margin.end, margin.start),
    };
    Ok(LinearScale::new(domain, range))
}
