//! The interactive half of the engine: layout, hit-testing, navigation,
//! gestures and the [`IconView`] facade that drives them.

pub mod autoscroll;
pub mod config;
pub mod dnd;
pub mod events;
pub mod hit_test;
pub mod icon_view;
pub mod layout;
pub mod navigation;
pub mod rubber_band;

#[cfg(test)]
pub(crate) mod testing;

pub use autoscroll::{AutoScroller, DEFAULT_AUTOSCROLL_MARGIN};
pub use config::{IconViewConfig, LayoutMode, TextDirection, ZoomLevel};
pub use dnd::{DropPosition, DropTarget};
pub use events::{Key, KeyPress, KeyboardModifiers, MouseButton, PointerPress};
pub use hit_test::GeometryIndex;
pub use icon_view::IconView;
pub use layout::{LayoutEngine, LayoutParams, LineSpan};
pub use navigation::{CursorMove, Navigator};
pub use rubber_band::{MergePolicy, RubberBand};
