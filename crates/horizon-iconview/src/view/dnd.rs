//! Drop-position geometry for drag-and-drop feedback.

use horizon_iconview_core::logging::targets;
use horizon_iconview_core::{Point, Rect};

use super::hit_test::GeometryIndex;
use super::layout::LayoutEngine;
use crate::model::{ItemId, ItemStore};

/// Where a drop lands relative to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropPosition {
    /// No drop destination.
    #[default]
    NoDrop,
    /// Onto the item itself.
    Into,
    /// Before the item on its left.
    Left,
    /// After the item on its right.
    Right,
    /// Above the item.
    Above,
    /// Below the item.
    Below,
}

impl DropPosition {
    /// Zone of `bounds` that contains `pos`.
    ///
    /// The outer quarter of the width maps to `Left`/`Right`, then the outer
    /// quarter of the height to `Above`/`Below`; the remaining center is
    /// `Into`. Points in the spacing gap outside `bounds` fall into the
    /// nearest edge zone.
    pub fn for_point(bounds: Rect, pos: Point) -> Self {
        let quarter_w = bounds.width() / 4;
        let quarter_h = bounds.height() / 4;
        let x = pos.x - bounds.left();
        let y = pos.y - bounds.top();

        if x < quarter_w {
            Self::Left
        } else if x >= bounds.width() - quarter_w {
            Self::Right
        } else if y < quarter_h {
            Self::Above
        } else if y >= bounds.height() - quarter_h {
            Self::Below
        } else {
            Self::Into
        }
    }
}

/// An item together with a drop position.
///
/// `item` is `None` only for `(None, Above)`, insertion into an empty view,
/// and for a cleared destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropTarget {
    pub item: Option<ItemId>,
    pub position: DropPosition,
}

impl DropTarget {
    pub const NONE: Self = Self {
        item: None,
        position: DropPosition::NoDrop,
    };

    pub fn new(item: Option<ItemId>, position: DropPosition) -> Self {
        Self { item, position }
    }

    pub fn is_none(&self) -> bool {
        self.position == DropPosition::NoDrop
    }
}

/// The drop target under `pos` (content coordinates).
///
/// When `reorderable` is false, positions over an item collapse to
/// [`DropPosition::Into`]. Away from every item the target is the last item
/// with [`DropPosition::Below`], or `(None, Above)` for an empty store.
pub fn drop_target(store: &ItemStore, layout: &LayoutEngine, pos: Point, reorderable: bool) -> DropTarget {
    let index = GeometryIndex::new(store, layout);
    let target = match index.item_at(pos).and_then(|id| store.get(id).map(|item| (id, item))) {
        Some((id, item)) => {
            let position = if reorderable {
                DropPosition::for_point(item.bounds(), pos)
            } else {
                DropPosition::Into
            };
            DropTarget::new(Some(id), position)
        }
        None => match store.last_id() {
            Some(last) => DropTarget::new(Some(last), DropPosition::Below),
            None => DropTarget::new(None, DropPosition::Above),
        },
    };
    tracing::trace!(target: targets::DND, x = pos.x, y = pos.y, position = ?target.position, "drop target");
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellStyle, FixedSizeRenderer};
    use horizon_iconview_core::Size;

    fn laid_out(count: usize) -> (ItemStore, LayoutEngine) {
        let mut store = ItemStore::with_len(count);
        let mut layout = LayoutEngine::default();
        layout.layout(&mut store, &FixedSizeRenderer::new(48, 48), &CellStyle::default(), Size::new(222, 400));
        (store, layout)
    }

    #[test]
    fn test_zones() {
        let bounds = Rect::new(0, 0, 48, 48);
        assert_eq!(DropPosition::for_point(bounds, Point::new(5, 24)), DropPosition::Left);
        assert_eq!(DropPosition::for_point(bounds, Point::new(40, 24)), DropPosition::Right);
        assert_eq!(DropPosition::for_point(bounds, Point::new(24, 5)), DropPosition::Above);
        assert_eq!(DropPosition::for_point(bounds, Point::new(24, 40)), DropPosition::Below);
        assert_eq!(DropPosition::for_point(bounds, Point::new(24, 24)), DropPosition::Into);
        // Corners belong to the horizontal zones.
        assert_eq!(DropPosition::for_point(bounds, Point::new(2, 2)), DropPosition::Left);
        assert_eq!(DropPosition::for_point(bounds, Point::new(46, 46)), DropPosition::Right);
        // The gap beside the item.
        assert_eq!(DropPosition::for_point(bounds, Point::new(-2, 24)), DropPosition::Left);
    }

    #[test]
    fn test_drop_target_over_item() {
        let (store, layout) = laid_out(6);
        // Item 1 spans x 60..108, y 6..54.
        let target = drop_target(&store, &layout, Point::new(84, 30), true);
        assert_eq!(target, DropTarget::new(store.id_at(1), DropPosition::Into));
        let target = drop_target(&store, &layout, Point::new(62, 30), true);
        assert_eq!(target.position, DropPosition::Left);
        let target = drop_target(&store, &layout, Point::new(84, 52), true);
        assert_eq!(target.position, DropPosition::Below);
    }

    #[test]
    fn test_not_reorderable_collapses_to_into() {
        let (store, layout) = laid_out(6);
        let target = drop_target(&store, &layout, Point::new(62, 30), false);
        assert_eq!(target, DropTarget::new(store.id_at(1), DropPosition::Into));
    }

    #[test]
    fn test_empty_space_fallbacks() {
        let (store, layout) = laid_out(6);
        let target = drop_target(&store, &layout, Point::new(200, 300), true);
        assert_eq!(target, DropTarget::new(store.id_at(5), DropPosition::Below));

        let (empty, layout) = laid_out(0);
        let target = drop_target(&empty, &layout, Point::new(10, 10), false);
        assert_eq!(target, DropTarget::new(None, DropPosition::Above));
    }

    #[test]
    fn test_cleared_target() {
        assert!(DropTarget::NONE.is_none());
        assert_eq!(DropTarget::default(), DropTarget::NONE);
    }
}
