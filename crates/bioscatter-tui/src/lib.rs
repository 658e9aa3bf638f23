#![forbid(unsafe_code)]

//! Terminal scatter plot viewer for clustered biodiversity embeddings.
//!
//! # Role in bioscatter
//! `bioscatter-tui` is the interactive front end. It owns the cell grid
//! renderer (buffer, diff, ANSI presenter), the braille canvas the points
//! are plotted on, the Elm-style update/view runtime, and the application
//! model that wires keyboard/mouse gestures to the scale and zoom math in
//! `bioscatter-core` and the fetching client in `bioscatter-client`.
//!
//! # Structure
//! - [`buffer`] / [`cell`] / [`geometry`]: the render kernel.
//! - [`canvas`]: braille sub-cell plotting surface.
//! - [`event`] / [`terminal`]: canonical input events and the raw-mode
//!   terminal session plus diff presenter.
//! - [`runtime`]: `Model`/`Cmd`/`Program` update-view loop.
//! - [`widgets`]: chart, legend, tooltip, spinner, status line.
//! - [`app`]: the viewer state machine.

pub mod app;
pub mod buffer;
pub mod canvas;
pub mod cell;
pub mod config;
pub mod event;
pub mod geometry;
pub mod runtime;
pub mod terminal;
pub mod widgets;

pub use app::ScatterApp;
pub use buffer::Buffer;
pub use cell::Cell;
pub use config::Config;
pub use event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};
pub use geometry::Rect;
pub use runtime::{Cmd, Model, Program, ProgramConfig};
