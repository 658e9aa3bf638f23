#![forbid(unsafe_code)]

//! Pan/zoom transforms and scale rescaling.
//!
//! A [`ZoomTransform`] is a uniform scale-and-translate applied to rendered
//! positions without touching the underlying data. Composing it with a base
//! [`LinearScale`] yields an effective scale with the same data domain and
//! transformed pixel outputs: `effective(v) = k * base(v) + t` per axis.

use crate::scale::{Axis, LinearScale};

/// A scale-and-translate gesture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    /// Uniform scale factor.
    pub k: f64,
    /// Horizontal pixel translation.
    pub tx: f64,
    /// Vertical pixel translation.
    pub ty: f64,
}

impl ZoomTransform {
    /// The identity transform (no zoom, no pan).
    #[inline]
    pub const fn identity() -> Self {
        Self {
            k: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Create a transform from raw gesture components.
    #[inline]
    pub const fn new(k: f64, tx: f64, ty: f64) -> Self {
        Self { k, tx, ty }
    }

    /// Whether this is the identity transform.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.k == 1.0 && self.tx == 0.0 && self.ty == 0.0
    }

    /// The translation component for one axis.
    #[inline]
    pub const fn translate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.tx,
            Axis::Y => self.ty,
        }
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Configured bound on the zoom scale factor.
///
/// Gestures outside the bound are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min_scale: f64,
    pub max_scale: f64,
}

impl ZoomBounds {
    /// Create a bound; `min_scale` must not exceed `max_scale`.
    #[inline]
    pub const fn new(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
        }
    }

    /// Clamp a scale factor into the bound.
    #[inline]
    pub fn clamp(&self, k: f64) -> f64 {
        k.clamp(self.min_scale, self.max_scale)
    }
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self::new(0.5, 20.0)
    }
}

/// Tracks the current pan/zoom transform and rescales base scales.
///
/// Owned by the renderer; gestures mutate it synchronously so the next
/// frame already reflects the new transform, independent of any backend
/// activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomTracker {
    transform: ZoomTransform,
    bounds: ZoomBounds,
}

impl ZoomTracker {
    /// Create a tracker at identity with the given bounds.
    #[inline]
    pub const fn new(bounds: ZoomBounds) -> Self {
        Self {
            transform: ZoomTransform::identity(),
            bounds,
        }
    }

    /// The current transform.
    #[inline]
    pub const fn transform(&self) -> ZoomTransform {
        self.transform
    }

    /// The configured scale bound.
    #[inline]
    pub const fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    /// Adopt a raw gesture transform, clamping its scale factor.
    pub fn apply_gesture(&mut self, raw: ZoomTransform) {
        self.transform = ZoomTransform {
            k: self.bounds.clamp(raw.k),
            tx: raw.tx,
            ty: raw.ty,
        };
    }

    /// Multiply the scale factor by `factor`, keeping the pixel under the
    /// anchor stationary. Wheel zoom uses the cursor as the anchor.
    pub fn zoom_about(&mut self, anchor_x: f64, anchor_y: f64, factor: f64) {
        let old = self.transform;
        let k = self.bounds.clamp(old.k * factor);
        if old.k == 0.0 {
            return;
        }
        let ratio = k / old.k;
        self.transform = ZoomTransform {
            k,
            tx: anchor_x - ratio * (anchor_x - old.tx),
            ty: anchor_y - ratio * (anchor_y - old.ty),
        };
    }

    /// Shift the view by a pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.transform.tx += dx;
        self.transform.ty += dy;
    }

    /// Restore the identity transform.
    pub fn reset(&mut self) {
        self.transform = ZoomTransform::identity();
    }

    /// Compose the tracked transform with a base scale for one axis.
    ///
    /// The effective scale keeps the base domain and transforms only the
    /// pixel range, so `effective(v) = k * base(v) + translate(axis)`.
    pub fn rescale(&self, base: &LinearScale, axis: Axis) -> LinearScale {
        let t = self.transform.translate(axis);
        let k = self.transform.k;
        let (r0, r1) = base.range();
        base.with_range((k * r0 + t, k * r1 + t))
    }
}

impl Default for ZoomTracker {
    fn default() -> Self {
        Self::new(ZoomBounds::default())
    }
}
