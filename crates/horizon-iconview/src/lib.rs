//! Horizon IconView - the icon grid view engine.
//!
//! Arranges an arbitrary-length list of items into a scrollable grid, answers
//! "which item is under this pixel" queries, and drives the selection and
//! interaction state machine behind a file-manager icon view: click
//! selection, rubber-band drag-select, keyboard cursor navigation and
//! drag-and-drop drop-position feedback.
//!
//! The engine does not paint. A host widget feeds it input events and model
//! notifications, listens to its signals, and supplies a [`CellRenderer`]
//! that measures and draws cells.
//!
//! # Example
//!
//! ```
//! use horizon_iconview::{CursorMove, IconView, Point, SelectionMode, Size};
//!
//! let mut view = IconView::new()
//!     .with_selection_mode(SelectionMode::Multiple)
//!     .with_items(10);
//! view.set_viewport(Point::ZERO, Size::new(222, 400));
//!
//! view.select(3);
//! for _ in 0..3 {
//!     view.move_cursor(CursorMove::Right, true);
//! }
//! assert_eq!(view.selected_items(), vec![3, 4, 5, 6]);
//! ```

pub mod error;
pub mod model;
pub mod view;

pub use horizon_iconview_core::{ConnectionId, PerfSpan, Point, Rect, Signal, Size};

pub use error::{IconViewError, IconViewResult};
pub use model::{
    CellOption, CellRenderer, CellState, CellStyle, FixedSizeRenderer, Item, ItemId, ItemStore, RangePolicy,
    SelectionMode, SelectionState, SubCell,
};
pub use view::{
    CursorMove, DropPosition, DropTarget, IconView, IconViewConfig, Key, KeyPress, KeyboardModifiers, LayoutMode,
    MouseButton, PointerPress, TextDirection, ZoomLevel,
};
