//! Grid layout engine.
//!
//! Items are placed along a *flow axis* (horizontal for [`LayoutMode::Rows`],
//! vertical for [`LayoutMode::Columns`]) until a line is full, then a new
//! line starts on the cross axis. Each line is built in two passes:
//!
//! 1. placement: walk the items, assign position-in-line and flow offset;
//! 2. normalization: stamp the line's largest cross extent onto every item.
//!
//! Right-to-left mirroring runs as a final pass over the finished grid.
//!
//! Preferred sizes are cached on the items. Only items whose cache was cleared
//! (new items, [`LayoutEngine::invalidate_item`], [`LayoutEngine::invalidate_sizes`])
//! are measured again.

use std::ops::Range;

use horizon_iconview_core::logging::{span_names, targets};
use horizon_iconview_core::{PerfSpan, Rect, Size};

use super::config::{IconViewConfig, LayoutMode, TextDirection};
use crate::model::{CellOption, CellRenderer, CellState, CellStyle, Item, ItemId, ItemStore};

/// Layout-relevant parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub mode: LayoutMode,
    /// Items per line. `None` fits the viewport.
    pub columns: Option<usize>,
    /// Fixed item width. `None` uses the preferred width.
    pub item_width: Option<i32>,
    pub row_spacing: i32,
    pub column_spacing: i32,
    pub margin: i32,
    pub item_padding: i32,
    pub direction: TextDirection,
}

impl Default for LayoutParams {
    fn default() -> Self {
        IconViewConfig::default().layout_params()
    }
}

/// One row (rows-flow) or column (columns-flow) of the laid-out grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpan {
    /// Store indices of the items in this line.
    pub items: Range<usize>,
    /// Bounding rectangle of the line's items.
    pub rect: Rect,
}

impl LineSpan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn for_mode(mode: LayoutMode) -> Self {
        match mode {
            LayoutMode::Rows => Axis::Horizontal,
            LayoutMode::Columns => Axis::Vertical,
        }
    }

    fn main(self, size: Size) -> i32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    fn cross(self, size: Size) -> i32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    fn size(self, main: i32, cross: i32) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    fn rect(self, main: i32, cross: i32, main_len: i32, cross_len: i32) -> Rect {
        match self {
            Axis::Horizontal => Rect::new(main, cross, main_len, cross_len),
            Axis::Vertical => Rect::new(cross, main, cross_len, main_len),
        }
    }
}

/// Assigns grid cells and bounds to the items of a store.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    params: LayoutParams,
    lines: Vec<LineSpan>,
    content_size: Size,
    viewport: Size,
    dirty: bool,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutParams::default())
    }
}

impl LayoutEngine {
    pub fn new(params: LayoutParams) -> Self {
        Self {
            params,
            lines: Vec::new(),
            content_size: Size::new(params.margin * 2, params.margin * 2),
            viewport: Size::ZERO,
            dirty: true,
        }
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Replace the parameters. Marks the layout dirty if anything changed.
    pub fn set_params(&mut self, params: LayoutParams) {
        if self.params != params {
            self.params = params;
            self.dirty = true;
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.params.mode
    }

    /// The viewport size used by the last layout pass.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Overall extent of the laid-out grid, margins included.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Lines in layout order.
    pub fn lines(&self) -> &[LineSpan] {
        &self.lines
    }

    /// Index of the line containing store index `index`.
    pub fn line_of(&self, index: usize) -> Option<usize> {
        let line = self.lines.partition_point(|line| line.items.end <= index);
        (line < self.lines.len() && self.lines[line].items.contains(&index)).then_some(line)
    }

    /// Store index of the item at grid cell `(row, col)`.
    pub fn index_at_cell(&self, row: usize, col: usize) -> Option<usize> {
        let rtl = self.params.direction == TextDirection::RightToLeft;
        match self.params.mode {
            LayoutMode::Rows => {
                let line = self.lines.get(row)?;
                let position = if rtl {
                    line.len().checked_sub(col + 1)?
                } else {
                    col
                };
                (position < line.len()).then(|| line.items.start + position)
            }
            LayoutMode::Columns => {
                let line_index = if rtl {
                    self.lines.len().checked_sub(col + 1)?
                } else {
                    col
                };
                let line = self.lines.get(line_index)?;
                (row < line.len()).then(|| line.items.start + row)
            }
        }
    }

    /// The line holding grid row `line_no` (rows-flow) or grid column
    /// `line_no` (columns-flow).
    pub fn line_by_number(&self, line_no: usize) -> Option<&LineSpan> {
        let rtl = self.params.direction == TextDirection::RightToLeft;
        match self.params.mode {
            LayoutMode::Columns if rtl => self.lines.len().checked_sub(line_no + 1).and_then(|i| self.lines.get(i)),
            _ => self.lines.get(line_no),
        }
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Forget every cached size. The next layout re-measures all items.
    pub fn invalidate_sizes(&mut self, store: &mut ItemStore) {
        for item in store.items_mut() {
            item.invalidate_size();
        }
        self.dirty = true;
        tracing::debug!(target: targets::LAYOUT, items = store.len(), "all item sizes invalidated");
    }

    /// Forget the cached size of one item.
    pub fn invalidate_item(&mut self, store: &mut ItemStore, id: ItemId) {
        if let Some(item) = store.get_mut(id) {
            item.invalidate_size();
            self.dirty = true;
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Lay out every item for `viewport` and return the content size.
    pub fn layout(
        &mut self,
        store: &mut ItemStore,
        renderer: &dyn CellRenderer,
        style: &CellStyle,
        viewport: Size,
    ) -> Size {
        let _span = PerfSpan::new(span_names::LAYOUT);
        self.viewport = viewport.clamp_non_negative();
        let measured = self.measure(store, renderer, style);

        let p = self.params;
        let axis = Axis::for_mode(p.mode);
        let (main_spacing, cross_spacing) = match p.mode {
            LayoutMode::Rows => (p.column_spacing, p.row_spacing),
            LayoutMode::Columns => (p.row_spacing, p.column_spacing),
        };
        let available = axis.main(self.viewport);
        let count = store.len();

        self.lines.clear();
        let mut cross = p.margin;
        let mut widest = 0;
        let mut start = 0;

        while start < count {
            // Pass 1: placement along the flow axis.
            let mut main = p.margin;
            let mut end = start;
            while end < count {
                let Some(extent) = store.at(end).map(|item| self.extent(item)) else {
                    break;
                };
                let len = axis.main(extent);
                let placed = end - start;
                if placed > 0 {
                    let full = match p.columns {
                        Some(capacity) => placed >= capacity,
                        None => main + len + p.margin > available,
                    };
                    if full {
                        break;
                    }
                }
                if let Some(item) = store.at_mut(end) {
                    item.bounds = axis.rect(main, cross, len, axis.cross(extent));
                    match p.mode {
                        LayoutMode::Rows => {
                            item.row = self.lines.len();
                            item.col = placed;
                        }
                        LayoutMode::Columns => {
                            item.row = placed;
                            item.col = self.lines.len();
                        }
                    }
                }
                main += len + main_spacing;
                end += 1;
            }
            if end == start {
                break;
            }

            // Pass 2: every item in the line shares the line's cross extent.
            let line_cross = (start..end)
                .filter_map(|index| store.at(index))
                .map(|item| axis.cross(item.bounds.size))
                .max()
                .unwrap_or(0);
            for index in start..end {
                if let Some(item) = store.at_mut(index) {
                    let len = axis.main(item.bounds.size);
                    let offset = match axis {
                        Axis::Horizontal => item.bounds.left(),
                        Axis::Vertical => item.bounds.top(),
                    };
                    item.bounds = axis.rect(offset, cross, len, line_cross);
                }
            }

            let line_len = main - main_spacing - p.margin;
            widest = widest.max(line_len);
            self.lines.push(LineSpan {
                items: start..end,
                rect: axis.rect(p.margin, cross, line_len, line_cross),
            });
            cross += line_cross + cross_spacing;
            start = end;
        }

        let content_cross = if self.lines.is_empty() {
            p.margin * 2
        } else {
            cross - cross_spacing + p.margin
        };
        self.content_size = axis.size(widest + p.margin * 2, content_cross);

        if p.direction == TextDirection::RightToLeft {
            self.mirror(store);
        }

        self.dirty = false;
        tracing::debug!(
            target: targets::LAYOUT,
            mode = ?p.mode,
            items = count,
            lines = self.lines.len(),
            measured,
            width = self.content_size.width,
            height = self.content_size.height,
            "layout complete"
        );
        self.debug_check(store);
        self.content_size
    }

    /// Query the renderer for every item without a cached size.
    fn measure(&self, store: &mut ItemStore, renderer: &dyn CellRenderer, style: &CellStyle) -> usize {
        let pending: Vec<(usize, ItemId)> = store
            .iter()
            .filter(|(_, item)| item.needs_measure())
            .map(|(id, item)| (item.index(), id))
            .collect();

        for &(index, id) in &pending {
            let option = CellOption {
                index,
                id,
                rect: Rect::ZERO,
                state: CellState::default(),
                style: *style,
            };
            let size = renderer.preferred_size(&option).clamp_non_negative();
            if let Some(item) = store.get_mut(id) {
                item.preferred = Some(size);
            }
        }
        pending.len()
    }

    /// Size an item occupies in the grid before line normalization.
    fn extent(&self, item: &Item) -> Size {
        let preferred = item.preferred.unwrap_or(Size::ZERO);
        let width = self.params.item_width.unwrap_or(preferred.width);
        let padding = self.params.item_padding * 2;
        Size::new(width + padding, preferred.height + padding)
    }

    /// Mirror x coordinates and reverse column numbers for right-to-left text.
    fn mirror(&mut self, store: &mut ItemStore) {
        let width = self.content_size.width;
        let line_count = self.lines.len();

        for line in &mut self.lines {
            line.rect.origin.x = width - line.rect.width() - line.rect.left();
            for index in line.items.clone() {
                if let Some(item) = store.at_mut(index) {
                    item.bounds.origin.x = width - item.bounds.width() - item.bounds.left();
                    item.col = match self.params.mode {
                        LayoutMode::Rows => line.items.len() - 1 - item.col,
                        LayoutMode::Columns => line_count - 1 - item.col,
                    };
                }
            }
        }
    }

    fn debug_check(&self, store: &ItemStore) {
        if cfg!(debug_assertions) {
            let placed: usize = self.lines.iter().map(LineSpan::len).sum();
            debug_assert_eq!(placed, store.len(), "layout left items unplaced");
            for (id, item) in store.iter() {
                debug_assert!(
                    item.bounds.width() >= 0 && item.bounds.height() >= 0,
                    "negative bounds for {id:?}"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FixedSizeRenderer;
    use crate::view::testing::CountingRenderer;

    fn params(mode: LayoutMode) -> LayoutParams {
        LayoutParams {
            mode,
            ..LayoutParams::default()
        }
    }

    fn run(engine: &mut LayoutEngine, store: &mut ItemStore, renderer: &dyn CellRenderer, viewport: Size) -> Size {
        engine.layout(store, renderer, &CellStyle::default(), viewport)
    }

    fn rows_of(store: &ItemStore) -> Vec<(usize, usize)> {
        store.iter().map(|(_, item)| (item.row(), item.col())).collect()
    }

    #[test]
    fn test_rows_flow_wraps_at_viewport() {
        let mut store = ItemStore::with_len(5);
        let mut engine = LayoutEngine::new(params(LayoutMode::Rows));
        let renderer = FixedSizeRenderer::new(48, 48);

        let content = run(&mut engine, &mut store, &renderer, Size::new(150, 400));

        assert_eq!(rows_of(&store), vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
        let p = engine.params();
        assert_eq!(content.height, 2 * p.margin + 3 * 48 + 2 * p.row_spacing);
        assert_eq!(content.width, p.margin + 48 + p.column_spacing + 48 + p.margin);
        assert_eq!(store.at(1).unwrap().bounds(), Rect::new(60, 6, 48, 48));
        assert_eq!(store.at(4).unwrap().bounds(), Rect::new(6, 114, 48, 48));
        assert_eq!(engine.lines().len(), 3);
    }

    #[test]
    fn test_empty_store_is_margins_only() {
        let mut store = ItemStore::new();
        let mut engine = LayoutEngine::default();
        let content = run(&mut engine, &mut store, &FixedSizeRenderer::new(48, 48), Size::new(300, 300));

        let margin = engine.params().margin;
        assert_eq!(content, Size::new(margin * 2, margin * 2));
        assert!(engine.lines().is_empty());
        assert!(!engine.is_dirty());
    }

    #[test]
    fn test_wide_item_gets_own_row() {
        let mut store = ItemStore::with_len(3);
        let mut engine = LayoutEngine::default();
        let content = run(&mut engine, &mut store, &FixedSizeRenderer::new(500, 20), Size::new(100, 100));

        assert_eq!(rows_of(&store), vec![(0, 0), (1, 0), (2, 0)]);
        assert!(content.width > 100);
    }

    #[test]
    fn test_zero_viewport() {
        let mut store = ItemStore::with_len(4);
        let mut engine = LayoutEngine::default();
        run(&mut engine, &mut store, &FixedSizeRenderer::new(10, 10), Size::ZERO);

        assert_eq!(engine.lines().len(), 4);
    }

    #[test]
    fn test_explicit_columns() {
        let mut store = ItemStore::with_len(7);
        let mut engine = LayoutEngine::new(LayoutParams {
            columns: Some(3),
            ..LayoutParams::default()
        });
        run(&mut engine, &mut store, &FixedSizeRenderer::new(10, 10), Size::new(1000, 1000));

        assert_eq!(engine.lines().len(), 3);
        assert_eq!(store.at(6).unwrap().row(), 2);
        assert_eq!(store.at(6).unwrap().col(), 0);
    }

    #[test]
    fn test_row_shares_height() {
        let mut store = ItemStore::with_len(4);
        let mut engine = LayoutEngine::default();
        let renderer = CountingRenderer::new(|index| Size::new(40, 30 + index as i32 * 10));
        run(&mut engine, &mut store, &renderer, Size::new(1000, 1000));

        let heights: Vec<i32> = store.iter().map(|(_, item)| item.bounds().height()).collect();
        assert_eq!(heights, vec![60, 60, 60, 60]);
        assert!(store.iter().all(|(_, item)| item.bounds().width() == 40));
    }

    #[test]
    fn test_no_overlap_within_rows() {
        let mut store = ItemStore::with_len(23);
        let mut engine = LayoutEngine::default();
        let renderer = CountingRenderer::new(|index| Size::new(20 + (index as i32 * 7) % 40, 30));
        run(&mut engine, &mut store, &renderer, Size::new(260, 500));

        for line in engine.lines() {
            let mut previous_right = i32::MIN;
            for index in line.items.clone() {
                let bounds = store.at(index).unwrap().bounds();
                assert!(bounds.left() >= previous_right);
                previous_right = bounds.right();
            }
        }
    }

    #[test]
    fn test_columns_flow_is_transposed() {
        let mut store = ItemStore::with_len(5);
        let mut engine = LayoutEngine::new(params(LayoutMode::Columns));
        let content = run(&mut engine, &mut store, &FixedSizeRenderer::new(48, 48), Size::new(400, 150));

        // (row, col): columns of two items each.
        assert_eq!(rows_of(&store), vec![(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let p = engine.params();
        assert_eq!(content.width, 2 * p.margin + 3 * 48 + 2 * p.column_spacing);
        assert_eq!(store.at(2).unwrap().bounds(), Rect::new(60, 6, 48, 48));
    }

    #[test]
    fn test_columns_share_width() {
        let mut store = ItemStore::with_len(2);
        let mut engine = LayoutEngine::new(params(LayoutMode::Columns));
        let renderer = CountingRenderer::new(|index| Size::new(30 + index as i32 * 20, 20));
        run(&mut engine, &mut store, &renderer, Size::new(400, 400));

        assert!(store.iter().all(|(_, item)| item.bounds().width() == 50));
    }

    #[test]
    fn test_right_to_left_mirrors_rows() {
        let mut store = ItemStore::with_len(3);
        let mut engine = LayoutEngine::new(LayoutParams {
            direction: TextDirection::RightToLeft,
            ..LayoutParams::default()
        });
        let content = run(&mut engine, &mut store, &FixedSizeRenderer::new(48, 48), Size::new(150, 400));

        // Content width is 6 + 48 + 6 + 48 + 6 = 114.
        assert_eq!(content.width, 114);
        let first = store.at(0).unwrap();
        assert_eq!(first.bounds().left(), 60);
        assert_eq!(first.col(), 1);
        let second = store.at(1).unwrap();
        assert_eq!(second.bounds().left(), 6);
        assert_eq!(second.col(), 0);
        // The lone item of the ragged row hugs the right edge.
        let third = store.at(2).unwrap();
        assert_eq!(third.bounds().left(), 60);
        assert_eq!(third.col(), 0);

        assert_eq!(engine.index_at_cell(0, 1), Some(0));
        assert_eq!(engine.index_at_cell(0, 0), Some(1));
        assert_eq!(engine.index_at_cell(1, 0), Some(2));
        assert_eq!(engine.index_at_cell(1, 1), None);
    }

    #[test]
    fn test_item_width_and_padding() {
        let mut store = ItemStore::with_len(2);
        let mut engine = LayoutEngine::new(LayoutParams {
            item_width: Some(80),
            item_padding: 4,
            ..LayoutParams::default()
        });
        run(&mut engine, &mut store, &FixedSizeRenderer::new(48, 48), Size::new(1000, 1000));

        assert_eq!(store.at(0).unwrap().bounds(), Rect::new(6, 6, 88, 56));
        assert_eq!(store.at(1).unwrap().bounds().left(), 6 + 88 + 6);
    }

    #[test]
    fn test_incremental_measurement() {
        let mut store = ItemStore::with_len(10);
        let mut engine = LayoutEngine::default();
        let renderer = CountingRenderer::new(|_| Size::new(32, 32));

        run(&mut engine, &mut store, &renderer, Size::new(200, 200));
        assert_eq!(renderer.calls(), 10);

        // Cached sizes are reused.
        run(&mut engine, &mut store, &renderer, Size::new(300, 200));
        assert_eq!(renderer.calls(), 10);

        let id = store.id_at(4).unwrap();
        engine.invalidate_item(&mut store, id);
        assert!(engine.is_dirty());
        store.insert(0);
        run(&mut engine, &mut store, &renderer, Size::new(300, 200));
        assert_eq!(renderer.calls(), 12);

        engine.invalidate_sizes(&mut store);
        run(&mut engine, &mut store, &renderer, Size::new(300, 200));
        assert_eq!(renderer.calls(), 23);
    }

    #[test]
    fn test_line_of() {
        let mut store = ItemStore::with_len(5);
        let mut engine = LayoutEngine::default();
        run(&mut engine, &mut store, &FixedSizeRenderer::new(48, 48), Size::new(150, 400));

        assert_eq!(engine.line_of(0), Some(0));
        assert_eq!(engine.line_of(3), Some(1));
        assert_eq!(engine.line_of(4), Some(2));
        assert_eq!(engine.line_of(5), None);
    }

    #[test]
    fn test_set_params_marks_dirty() {
        let mut store = ItemStore::with_len(1);
        let mut engine = LayoutEngine::default();
        run(&mut engine, &mut store, &FixedSizeRenderer::new(48, 48), Size::new(150, 400));
        assert!(!engine.is_dirty());

        engine.set_params(*engine.params());
        assert!(!engine.is_dirty());

        engine.set_params(LayoutParams {
            margin: 10,
            ..*engine.params()
        });
        assert!(engine.is_dirty());
    }
}
