//! Logging facilities for Horizon IconView.
//!
//! The engine is instrumented with the `tracing` crate. To see logs, install
//! a subscriber in the host application:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("horizon_iconview::layout=debug"))
//!         .init();
//! }
//! ```

/// Span names used throughout Horizon IconView for tracing.
pub mod span_names {
    /// Full layout pass.
    pub const LAYOUT: &str = "horizon_iconview::layout";
    /// Rubber-band gesture evaluation.
    pub const RUBBER_BAND: &str = "horizon_iconview::rubber_band";
    /// Model notification handling.
    pub const MODEL_UPDATE: &str = "horizon_iconview::model_update";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "horizon_iconview_core";
    /// Signal emission target.
    pub const SIGNAL: &str = "horizon_iconview_core::signal";
    /// Layout engine target.
    pub const LAYOUT: &str = "horizon_iconview::layout";
    /// Item store target.
    pub const STORE: &str = "horizon_iconview::store";
    /// Selection state machine target.
    pub const SELECTION: &str = "horizon_iconview::selection";
    /// Hit-testing target.
    pub const HIT_TEST: &str = "horizon_iconview::hit_test";
    /// Keyboard navigation target.
    pub const NAVIGATION: &str = "horizon_iconview::navigation";
    /// Drag-and-drop target.
    pub const DND: &str = "horizon_iconview::dnd";
    /// Edge auto-scroll target.
    pub const AUTOSCROLL: &str = "horizon_iconview::autoscroll";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_iconview::config";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to measure the duration of layout passes and other hot paths.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_iconview::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("horizon_iconview=trace")
            .with_test_writer()
            .try_init();
        let _span = PerfSpan::new(span_names::LAYOUT);
        tracing::debug!(target: targets::LAYOUT, "inside span");
    }
}
