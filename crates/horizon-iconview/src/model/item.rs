//! Item records mirrored from the backing list model.

use horizon_iconview_core::{Rect, Size};
use slotmap::new_key_type;

new_key_type! {
    /// A weak, generational handle to an [`Item`] in an [`ItemStore`](super::ItemStore).
    ///
    /// Handles stay `Copy` and cheap to hold in interaction state (cursor,
    /// anchor, hover, drag destination). A handle to a removed item never
    /// resolves again, even if its storage slot is reused by a later insertion.
    pub struct ItemId;
}

/// One entry of the displayed list.
///
/// The grid position and bounds are owned by the layout engine; the selection
/// flags by the selection state machine. Everything here is plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub(crate) index: usize,
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) bounds: Rect,
    /// Cached preferred size from the cell renderer, `None` until measured.
    pub(crate) preferred: Option<Size>,
    pub(crate) selected: bool,
    pub(crate) selected_before_rubberband: bool,
}

impl Item {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            row: 0,
            col: 0,
            bounds: Rect::ZERO,
            preferred: None,
            selected: false,
            selected_before_rubberband: false,
        }
    }

    /// Position of the item in the store.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Grid row assigned by the last layout pass.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Grid column assigned by the last layout pass.
    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// Bounding box in content-space pixels.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Cached preferred size, or `None` if the item must be re-measured.
    #[inline]
    pub fn preferred_size(&self) -> Option<Size> {
        self.preferred
    }

    /// Whether the item needs a fresh size query before it can be placed.
    #[inline]
    pub fn needs_measure(&self) -> bool {
        self.preferred.is_none()
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Selection state captured when the current rubber-band gesture started.
    #[inline]
    pub fn selected_before_rubberband(&self) -> bool {
        self.selected_before_rubberband
    }

    /// Forget the measured size so the next layout re-queries the renderer.
    #[inline]
    pub(crate) fn invalidate_size(&mut self) {
        self.preferred = None;
    }
}
