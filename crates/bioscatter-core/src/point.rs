#![forbid(unsafe_code)]

//! Projected points and point sets.
//!
//! The canonical wire schema is `{x, y, cluster}`. Older data dumps used
//! `UMAP1`/`UMAP2` for the projection coordinates; those names are accepted
//! on input via serde aliases and never written back out.

use serde::{Deserialize, Serialize};

use crate::scale::Axis;

/// One projected observation: a 2-D embedding coordinate plus the integer
/// cluster label assigned by the backend.
///
/// Label `-1` conventionally marks noise/unassigned points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal projection coordinate.
    #[serde(alias = "UMAP1")]
    pub x: f64,
    /// Vertical projection coordinate.
    #[serde(alias = "UMAP2")]
    pub y: f64,
    /// Cluster label.
    pub cluster: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64, cluster: i32) -> Self {
        Self { x, y, cluster }
    }

    /// The coordinate selected by `axis`.
    #[inline]
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// An ordered sequence of points produced by one backend call or cache read.
///
/// Order is render order only; duplicates are allowed. The whole set is
/// replaced on algorithm switch, never mutated in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Create an empty point set.
    #[inline]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points in render order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterate over the points in render order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// The [min, max] extent of the selected coordinate, or `None` when the
    /// set is empty. NaN coordinates are skipped so one bad record cannot
    /// poison the whole domain.
    pub fn extent(&self, axis: Axis) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for p in &self.points {
            let v = p.coord(axis);
            if v.is_nan() {
                continue;
            }
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        bounds
    }

    /// Distinct cluster labels in ascending order.
    pub fn cluster_labels(&self) -> Vec<i32> {
        let mut labels: Vec<i32> = self.points.iter().map(|p| p.cluster).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
