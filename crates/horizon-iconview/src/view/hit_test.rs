//! Point and rectangle queries over a laid-out grid.
//!
//! Every item answers for its bounds grown by half the column spacing on each
//! side horizontally and half the row spacing vertically, so a click in the
//! gap between two items resolves to the nearer one. Lines from the layout
//! engine act as a coarse index: only items of lines whose grown rectangle
//! matches the query are examined.

use horizon_iconview_core::logging::targets;
use horizon_iconview_core::{Point, Rect, Size};

use super::layout::{LayoutEngine, LineSpan};
use crate::model::{CellOption, CellRenderer, CellState, CellStyle, Item, ItemId, ItemStore, SubCell};

/// Read-only spatial queries over a store laid out by a [`LayoutEngine`].
#[derive(Debug, Clone, Copy)]
pub struct GeometryIndex<'a> {
    store: &'a ItemStore,
    layout: &'a LayoutEngine,
}

impl<'a> GeometryIndex<'a> {
    pub fn new(store: &'a ItemStore, layout: &'a LayoutEngine) -> Self {
        Self { store, layout }
    }

    fn slack(&self) -> (i32, i32) {
        let params = self.layout.params();
        (params.column_spacing / 2, params.row_spacing / 2)
    }

    /// The rectangle an item answers for.
    pub fn hit_box(&self, item: &Item) -> Rect {
        let (dx, dy) = self.slack();
        item.bounds().inflate(dx, dy)
    }

    fn lines_matching(&self, probe: Rect) -> impl Iterator<Item = &'a LineSpan> + 'a {
        let (dx, dy) = self.slack();
        self.layout
            .lines()
            .iter()
            .filter(move |line| line.rect.inflate(dx, dy).intersects(&probe))
    }

    /// The item under `pos` (content coordinates).
    pub fn item_at(&self, pos: Point) -> Option<ItemId> {
        let probe = Rect::new(pos.x, pos.y, 0, 0);
        let hit = self.lines_matching(probe).find_map(|line| {
            line.items.clone().find_map(|index| {
                let id = self.store.id_at(index)?;
                let item = self.store.get(id)?;
                self.hit_box(item).contains(pos).then_some(id)
            })
        });
        tracing::trace!(target: targets::HIT_TEST, x = pos.x, y = pos.y, hit = hit.is_some(), "item_at");
        hit
    }

    /// The item and sub-cell under `pos`.
    ///
    /// Returns `None` when the point is in an item's grown box but on none of
    /// the regions its renderer reports.
    pub fn item_at_cell(
        &self,
        pos: Point,
        renderer: &dyn CellRenderer,
        style: &CellStyle,
    ) -> Option<(ItemId, SubCell)> {
        let id = self.item_at(pos)?;
        let item = self.store.get(id)?;
        let option = CellOption {
            index: item.index(),
            id,
            rect: item.bounds(),
            state: CellState::default().with_selected(item.is_selected()),
            style: *style,
        };
        renderer.hit_subcell(&option, pos).map(|subcell| (id, subcell))
    }

    /// Every item whose grown box overlaps `rect`, in list order.
    pub fn items_in_rect(&self, rect: Rect) -> Vec<ItemId> {
        let mut hits: Vec<(usize, ItemId)> = Vec::new();
        for line in self.lines_matching(rect) {
            for index in line.items.clone() {
                let Some(id) = self.store.id_at(index) else {
                    continue;
                };
                if let Some(item) = self.store.get(id)
                    && self.hit_box(item).intersects(&rect)
                {
                    hits.push((index, id));
                }
            }
        }
        // Lines come in list order except for mirrored column layouts.
        hits.sort_unstable_by_key(|(index, _)| *index);
        hits.into_iter().map(|(_, id)| id).collect()
    }

    /// First and last index of the items intersecting the viewport.
    pub fn visible_range(&self, scroll_offset: Point, viewport: Size) -> Option<(usize, usize)> {
        let view = Rect::new(scroll_offset.x, scroll_offset.y, viewport.width, viewport.height);
        if view.is_empty() {
            return None;
        }

        let mut range: Option<(usize, usize)> = None;
        for line in self.layout.lines() {
            if line.rect.intersect(&view).is_none() {
                continue;
            }
            for index in line.items.clone() {
                let visible = self
                    .store
                    .at(index)
                    .is_some_and(|item| item.bounds().intersect(&view).is_some());
                if visible {
                    range = Some(match range {
                        Some((first, last)) => (first.min(index), last.max(index)),
                        None => (index, index),
                    });
                }
            }
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixedSizeRenderer;
    use crate::view::config::{LayoutMode, TextDirection};
    use crate::view::layout::LayoutParams;
    use crate::view::testing::CountingRenderer;

    fn laid_out(count: usize, params: LayoutParams, viewport: Size) -> (ItemStore, LayoutEngine) {
        let mut store = ItemStore::with_len(count);
        let mut engine = LayoutEngine::new(params);
        engine.layout(&mut store, &FixedSizeRenderer::new(48, 48), &CellStyle::default(), viewport);
        (store, engine)
    }

    fn index_of(store: &ItemStore, id: Option<ItemId>) -> Option<usize> {
        id.and_then(|id| store.index_of(id))
    }

    #[test]
    fn test_item_at_center_agrees_with_layout() {
        for mode in [LayoutMode::Rows, LayoutMode::Columns] {
            for direction in [TextDirection::LeftToRight, TextDirection::RightToLeft] {
                let params = LayoutParams {
                    mode,
                    direction,
                    ..LayoutParams::default()
                };
                let (store, engine) = laid_out(17, params, Size::new(230, 230));
                let index = GeometryIndex::new(&store, &engine);
                for (id, item) in store.iter() {
                    assert_eq!(index.item_at(item.bounds().center()), Some(id), "{mode:?} {direction:?}");
                }
            }
        }
    }

    #[test]
    fn test_gap_resolves_to_nearest() {
        // Items at x 6..54 and 60..108 with a 6px gap.
        let (store, engine) = laid_out(2, LayoutParams::default(), Size::new(150, 100));
        let index = GeometryIndex::new(&store, &engine);

        assert_eq!(index_of(&store, index.item_at(Point::new(56, 20))), Some(0));
        assert_eq!(index_of(&store, index.item_at(Point::new(57, 20))), Some(1));
        // The top margin beyond half the row spacing is empty.
        assert_eq!(index.item_at(Point::new(20, 1)), None);
        // Past the last item.
        assert_eq!(index.item_at(Point::new(140, 20)), None);
    }

    #[test]
    fn test_item_at_cell() {
        let mut store = ItemStore::with_len(1);
        let mut engine = LayoutEngine::default();
        let renderer = FixedSizeRenderer::new(48, 64).with_selection_toggle(8);
        let style = CellStyle {
            icon_size: 32,
            ..CellStyle::default()
        };
        engine.layout(&mut store, &renderer, &style, Size::new(200, 200));
        let index = GeometryIndex::new(&store, &engine);

        // Item bounds are (6, 6, 48, 64); icon spans x 14..46, y 6..38.
        let hit = index.item_at_cell(Point::new(15, 7), &renderer, &style);
        assert_eq!(hit.map(|(_, cell)| cell), Some(SubCell::SelectionToggle));
        let hit = index.item_at_cell(Point::new(30, 30), &renderer, &style);
        assert_eq!(hit.map(|(_, cell)| cell), Some(SubCell::Icon));
        let hit = index.item_at_cell(Point::new(30, 60), &renderer, &style);
        assert_eq!(hit.map(|(_, cell)| cell), Some(SubCell::Label));
        // In the grown box but outside the cell.
        assert_eq!(index.item_at_cell(Point::new(4, 30), &renderer, &style), None);
    }

    #[test]
    fn test_items_in_rect() {
        let (store, engine) = laid_out(10, LayoutParams::default(), Size::new(1000, 100));
        let index = GeometryIndex::new(&store, &engine);

        // Item n spans x 6 + 54n .. 54 + 54n.
        let rect = Rect::from_points(Point::new(114, 1), Point::new(300, 30));
        let hits: Vec<usize> = index
            .items_in_rect(rect)
            .into_iter()
            .filter_map(|id| store.index_of(id))
            .collect();
        assert_eq!(hits, vec![2, 3, 4, 5]);

        assert!(index.items_in_rect(Rect::new(0, 0, 2, 2)).is_empty());
    }

    #[test]
    fn test_items_in_rect_mirrored_columns_in_list_order() {
        let params = LayoutParams {
            mode: LayoutMode::Columns,
            direction: TextDirection::RightToLeft,
            ..LayoutParams::default()
        };
        let (store, engine) = laid_out(6, params, Size::new(400, 120));
        let index = GeometryIndex::new(&store, &engine);

        let all = index.items_in_rect(Rect::new(0, 0, 1000, 1000));
        assert_eq!(all, store.ids().to_vec());
    }

    #[test]
    fn test_visible_range() {
        let mut store = ItemStore::with_len(40);
        let mut engine = LayoutEngine::default();
        let renderer = CountingRenderer::new(|_| Size::new(48, 48));
        engine.layout(&mut store, &renderer, &CellStyle::default(), Size::new(222, 200));
        let index = GeometryIndex::new(&store, &engine);

        // Four items per row, rows are 54px apart starting at y = 6.
        assert_eq!(index.visible_range(Point::ZERO, Size::new(222, 100)), Some((0, 7)));
        assert_eq!(index.visible_range(Point::new(0, 120), Size::new(222, 50)), Some((8, 15)));
        assert_eq!(index.visible_range(Point::new(0, 5000), Size::new(222, 50)), None);
        assert_eq!(index.visible_range(Point::ZERO, Size::ZERO), None);
    }

    #[test]
    fn test_empty_store_queries() {
        let (store, engine) = laid_out(0, LayoutParams::default(), Size::new(100, 100));
        let index = GeometryIndex::new(&store, &engine);
        assert_eq!(index.item_at(Point::new(10, 10)), None);
        assert!(index.items_in_rect(Rect::new(0, 0, 100, 100)).is_empty());
        assert_eq!(index.visible_range(Point::ZERO, Size::new(100, 100)), None);
    }
}
