//! Core primitives for Horizon IconView.
//!
//! This crate provides the pieces the icon grid engine is built on:
//!
//! - [`geometry`]: integer [`Point`], [`Size`] and [`Rect`] in content pixels
//! - [`signal`]: the [`Signal`] type used for host notifications
//! - [`logging`]: `tracing` targets, span names and [`PerfSpan`]

pub mod geometry;
pub mod logging;
pub mod signal;

pub use geometry::{Point, Rect, Size};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
