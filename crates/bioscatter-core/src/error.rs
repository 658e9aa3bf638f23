#![forbid(unsafe_code)]

//! Geometry errors.

use std::fmt;

/// A point set with no points cannot be scaled or rendered.
///
/// Callers must stop before rendering: there is no domain to map and no
/// chart to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDataError;

impl fmt::Display for EmptyDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "empty point set: nothing to scale or render")
    }
}

impl std::error::Error for EmptyDataError {}
