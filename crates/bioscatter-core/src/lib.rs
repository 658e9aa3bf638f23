#![forbid(unsafe_code)]

//! Data model and plot geometry for bioscatter.
//!
//! # Role in bioscatter
//! `bioscatter-core` is the pure, I/O-free heart of the viewer. It defines
//! the projected points the backend hands us, the affine scales that map
//! data space onto the drawing surface, and the pan/zoom transform that
//! rescales those mappings on every gesture.
//!
//! # This crate provides
//! - [`Point`] / [`PointSet`]: immutable 2-D projections with cluster labels.
//! - [`LinearScale`] and [`compute_scale`]: data-extent to pixel-range maps.
//! - [`ZoomTracker`]: the current pan/zoom transform and scale rescaling.
//! - [`palette`]: the fixed cluster color mapping and legend names.
//!
//! # How it fits in the system
//! `bioscatter-client` deserializes backend responses into [`PointSet`]s;
//! `bioscatter-tui` computes base scales from their extents, composes them
//! with the tracked zoom transform, and renders the result. Nothing in this
//! crate touches the network, the filesystem, or the terminal.

pub mod error;
pub mod palette;
pub mod point;
pub mod scale;
pub mod zoom;

pub use error::EmptyDataError;
pub use point::{Point, PointSet};
pub use scale::{Axis, LinearScale, Margin, compute_scale};
pub use zoom::{ZoomBounds, ZoomTracker, ZoomTransform};
