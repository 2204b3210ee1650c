//! The icon view facade.
//!
//! [`IconView`] owns the item store, layout engine and selection state, and
//! turns host input (pointer, keyboard, drag-and-drop, model notifications)
//! into state changes and signals. It never paints on its own; the host calls
//! [`IconView::paint_visible`] and the [`CellRenderer`] does the drawing.
//!
//! # Coordinates and handles
//!
//! Every point or rectangle passed to the facade is viewport-local; the view
//! adds the scroll offset set with [`IconView::set_viewport`]. Queries take and
//! return store indices. Signals carry [`ItemId`] handles, which stay valid
//! across reorders and can be resolved with [`IconView::index_of`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_iconview::{FixedSizeRenderer, IconView};
//! use horizon_iconview_core::{Point, Size};
//!
//! let mut view = IconView::new()
//!     .with_renderer(Arc::new(FixedSizeRenderer::new(48, 48)))
//!     .with_items(10);
//! view.set_viewport(Point::ZERO, Size::new(222, 400));
//!
//! assert_eq!(view.item_row(5), Some(1));
//! assert_eq!(view.item_at(Point::new(30, 30)), Some(0));
//! ```

use std::sync::Arc;

use horizon_iconview_core::logging::{span_names, targets};
use horizon_iconview_core::{PerfSpan, Point, Rect, Signal, Size};

use super::autoscroll::AutoScroller;
use super::config::{IconViewConfig, LayoutMode, TextDirection, ZoomLevel};
use super::dnd::{self, DropPosition, DropTarget};
use super::events::{Key, KeyPress, KeyboardModifiers, MouseButton, PointerPress};
use super::hit_test::GeometryIndex;
use super::layout::LayoutEngine;
use super::navigation::{CursorMove, Navigator};
use super::rubber_band::RubberBand;
use crate::error::IconViewResult;
use crate::model::{
    CellOption, CellRenderer, CellState, CellStyle, FixedSizeRenderer, ItemId, ItemStore, RangePolicy,
    SelectionMode, SelectionState, SubCell,
};

/// A primary-button press on its way to a release.
#[derive(Debug, Clone, Copy)]
struct PressState {
    /// Press position in content coordinates.
    origin: Point,
    item: Option<ItemId>,
    /// Reduce the selection to this item on release, unless a drag started.
    reduce_to: Option<ItemId>,
    /// Activate `item` on release (single-click activation).
    activate: bool,
    dragging: bool,
}

/// An icon grid view engine.
pub struct IconView {
    store: ItemStore,
    selection: SelectionState,
    layout: LayoutEngine,
    renderer: Arc<dyn CellRenderer>,
    config: IconViewConfig,
    style: CellStyle,

    // Viewport
    scroll_offset: Point,
    viewport: Size,

    // Gestures
    rubber_band: RubberBand,
    autoscroll: AutoScroller,
    press: Option<PressState>,
    /// Last pointer position in viewport coordinates.
    last_pointer: Option<Point>,

    // Drag and drop
    drag_dest: DropTarget,

    // Signals
    /// Emitted once per operation that changed the set of selected items.
    pub selection_changed: Signal<()>,
    /// Emitted when an item is activated (double click, Enter, or single
    /// click when enabled).
    pub item_activated: Signal<ItemId>,
    /// Emitted when the hovered item changes.
    pub item_hovered: Signal<Option<ItemId>>,
    /// Emitted when the keyboard cursor moves.
    pub cursor_changed: Signal<Option<ItemId>>,
    /// Emitted when a cursor movement finds no target.
    pub keynav_failed: Signal<CursorMove>,
    /// Emitted with the new scroll offset when the view wants to scroll.
    pub scroll_requested: Signal<Point>,
    /// Emitted with the content size after every layout pass.
    pub layout_changed: Signal<Size>,
    /// Emitted when a press on an item turns into a drag.
    pub drag_started: Signal<ItemId>,
}

impl Default for IconView {
    fn default() -> Self {
        Self::new()
    }
}

impl IconView {
    /// Creates an empty view with the default configuration.
    pub fn new() -> Self {
        let config = IconViewConfig::default();
        Self {
            store: ItemStore::new(),
            selection: SelectionState::new(config.selection_mode),
            layout: LayoutEngine::new(config.layout_params()),
            renderer: Arc::new(FixedSizeRenderer::new(48, 48)),
            style: CellStyle::from_config(&config),
            scroll_offset: Point::ZERO,
            viewport: Size::ZERO,
            rubber_band: RubberBand::new(),
            autoscroll: AutoScroller::new(config.autoscroll_margin),
            press: None,
            last_pointer: None,
            drag_dest: DropTarget::NONE,
            config,
            selection_changed: Signal::new(),
            item_activated: Signal::new(),
            item_hovered: Signal::new(),
            cursor_changed: Signal::new(),
            keynav_failed: Signal::new(),
            scroll_requested: Signal::new(),
            layout_changed: Signal::new(),
            drag_started: Signal::new(),
        }
    }

    /// Sets the cell renderer using builder pattern.
    pub fn with_renderer(mut self, renderer: Arc<dyn CellRenderer>) -> Self {
        self.set_renderer(renderer);
        self
    }

    /// Applies a configuration using builder pattern.
    ///
    /// An invalid configuration is logged and ignored; use
    /// [`set_config`](Self::set_config) to handle the error.
    pub fn with_config(mut self, config: IconViewConfig) -> Self {
        if let Err(err) = self.set_config(config) {
            tracing::warn!(target: targets::CONFIG, %err, "ignoring invalid icon view configuration");
        }
        self
    }

    /// Starts with `count` items using builder pattern.
    pub fn with_items(mut self, count: usize) -> Self {
        self.model_reset(count);
        self
    }

    pub fn with_layout_mode(mut self, mode: LayoutMode) -> Self {
        self.set_layout_mode(mode);
        self
    }

    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.set_selection_mode(mode);
        self
    }

    pub fn with_zoom_level(mut self, level: ZoomLevel) -> Self {
        self.set_zoom_level(level);
        self
    }

    pub fn with_text_direction(mut self, direction: TextDirection) -> Self {
        self.set_text_direction(direction);
        self
    }

    pub fn with_columns(mut self, columns: Option<usize>) -> Self {
        self.set_columns(columns);
        self
    }

    pub fn with_single_click(mut self, single_click: bool) -> Self {
        self.set_single_click(single_click);
        self
    }

    pub fn with_reorderable(mut self, reorderable: bool) -> Self {
        self.set_reorderable(reorderable);
        self
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn config(&self) -> &IconViewConfig {
        &self.config
    }

    /// Validate and apply a configuration.
    pub fn set_config(&mut self, config: IconViewConfig) -> IconViewResult<()> {
        config.validate()?;
        self.apply_config(config);
        Ok(())
    }

    fn apply_config(&mut self, config: IconViewConfig) {
        let style = CellStyle::from_config(&config);
        if style != self.style {
            self.style = style;
            self.layout.invalidate_sizes(&mut self.store);
        }
        self.layout.set_params(config.layout_params());
        self.autoscroll.set_margin(config.autoscroll_margin);
        let old_cursor = self.selection.cursor();
        let changed = self.selection.set_mode(&mut self.store, config.selection_mode);
        self.config = config;
        self.notify(changed, old_cursor);
    }

    fn update_config(&mut self, update: impl FnOnce(&mut IconViewConfig)) {
        let mut config = self.config.clone();
        update(&mut config);
        self.apply_config(config);
    }

    pub fn renderer(&self) -> &Arc<dyn CellRenderer> {
        &self.renderer
    }

    /// Replace the renderer. Every item is measured again.
    pub fn set_renderer(&mut self, renderer: Arc<dyn CellRenderer>) {
        self.renderer = renderer;
        self.layout.invalidate_sizes(&mut self.store);
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.update_config(|c| c.layout_mode = mode);
    }

    pub fn set_columns(&mut self, columns: Option<usize>) {
        self.update_config(|c| c.columns = columns.filter(|n| *n > 0));
    }

    pub fn set_item_width(&mut self, width: Option<i32>) {
        self.update_config(|c| c.item_width = width.filter(|w| *w > 0));
    }

    pub fn set_row_spacing(&mut self, spacing: i32) {
        self.update_config(|c| c.row_spacing = spacing.max(0));
    }

    pub fn set_column_spacing(&mut self, spacing: i32) {
        self.update_config(|c| c.column_spacing = spacing.max(0));
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.update_config(|c| c.margin = margin.max(0));
    }

    pub fn set_text_direction(&mut self, direction: TextDirection) {
        self.update_config(|c| c.text_direction = direction);
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Change the selection mode, normalizing the current selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.update_config(|c| c.selection_mode = mode);
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.config.zoom_level
    }

    /// Change the zoom level. Every item is measured again.
    pub fn set_zoom_level(&mut self, level: ZoomLevel) {
        self.update_config(|c| c.zoom_level = level);
    }

    pub fn zoom_in(&mut self) -> bool {
        match self.config.zoom_level.zoom_in() {
            Some(level) => {
                self.set_zoom_level(level);
                true
            }
            None => false,
        }
    }

    pub fn zoom_out(&mut self) -> bool {
        match self.config.zoom_level.zoom_out() {
            Some(level) => {
                self.set_zoom_level(level);
                true
            }
            None => false,
        }
    }

    pub fn set_single_click(&mut self, single_click: bool) {
        self.update_config(|c| c.single_click = single_click);
    }

    pub fn set_reorderable(&mut self, reorderable: bool) {
        self.update_config(|c| c.reorderable = reorderable);
    }

    // =========================================================================
    // Model Notifications
    // =========================================================================

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn item_id(&self, index: usize) -> Option<ItemId> {
        self.store.id_at(index)
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.store.index_of(id)
    }

    /// A row was inserted at `index`.
    pub fn row_inserted(&mut self, index: usize) -> ItemId {
        let old_cursor = self.selection.cursor();
        let id = self.store.insert(index);
        self.layout.mark_dirty();
        let index = self.store.index_of(id).unwrap_or(index);
        let changed = self.selection.ensure_browse_selection(&mut self.store, index);
        self.notify(changed, old_cursor);
        id
    }

    /// The row at `index` is about to be removed.
    ///
    /// Every handle to the item is cleared before its storage is released.
    pub fn row_removed(&mut self, index: usize) {
        let Some(id) = self.store.id_at(index) else {
            tracing::warn!(target: targets::STORE, index, len = self.store.len(), "row_removed out of range, ignoring");
            return;
        };
        let _span = PerfSpan::new(span_names::MODEL_UPDATE);

        let old_cursor = self.selection.cursor();
        let was_prelit = self.selection.prelit() == Some(id);
        let was_selected = self.selection.is_selected(&self.store, id);
        self.selection.forget(id);
        if self.drag_dest.item == Some(id) {
            self.drag_dest = DropTarget::NONE;
        }
        if self.press.is_some_and(|press| press.item == Some(id)) {
            self.press = None;
        }
        if let Some(press) = &mut self.press
            && press.reduce_to == Some(id)
        {
            press.reduce_to = None;
        }

        self.store.remove(index);
        self.layout.mark_dirty();

        let browse = self.selection.ensure_browse_selection(&mut self.store, index);
        if was_prelit {
            self.item_hovered.emit(None);
        }
        self.notify(was_selected || browse, old_cursor);
    }

    /// The row at `from` moved to `to`.
    pub fn row_moved(&mut self, from: usize, to: usize) {
        if self.store.move_item(from, to) {
            self.layout.mark_dirty();
        }
    }

    /// Every row was permuted; `new_order[new_index]` is the old index.
    pub fn rows_reordered(&mut self, new_order: &[usize]) {
        if self.store.reorder(new_order) {
            self.layout.mark_dirty();
        }
    }

    /// The content of the row at `index` changed; its size is measured again.
    pub fn row_changed(&mut self, index: usize) {
        match self.store.id_at(index) {
            Some(id) => self.layout.invalidate_item(&mut self.store, id),
            None => {
                tracing::warn!(target: targets::STORE, index, len = self.store.len(), "row_changed out of range, ignoring");
            }
        }
    }

    /// The model was replaced by `count` fresh rows.
    pub fn model_reset(&mut self, count: usize) {
        let _span = PerfSpan::new(span_names::MODEL_UPDATE);
        let old_cursor = self.selection.cursor();
        let had_selection = self.selection.selected_count(&self.store) > 0;
        let had_prelit = self.selection.prelit().is_some();

        self.rubber_band.cancel(&mut self.store);
        self.autoscroll.stop();
        self.press = None;
        self.drag_dest = DropTarget::NONE;
        self.selection.forget_all();

        self.store.clear();
        for _ in 0..count {
            self.store.push();
        }
        self.layout.mark_dirty();
        tracing::trace!(target: targets::STORE, count, "model reset");

        let browse = self.selection.ensure_browse_selection(&mut self.store, 0);
        if had_prelit {
            self.item_hovered.emit(None);
        }
        self.notify(had_selection || browse, old_cursor);
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Lay out every item now and return the content size.
    pub fn layout(&mut self) -> Size {
        let size = self
            .layout
            .layout(&mut self.store, self.renderer.as_ref(), &self.style, self.viewport);
        self.layout_changed.emit(size);
        size
    }

    /// Lay out if anything invalidated the current layout.
    pub fn relayout_if_dirty(&mut self) -> bool {
        if self.layout.is_dirty() {
            self.layout();
            true
        } else {
            false
        }
    }

    pub fn is_layout_dirty(&self) -> bool {
        self.layout.is_dirty()
    }

    pub fn content_size(&mut self) -> Size {
        self.relayout_if_dirty();
        self.layout.content_size()
    }

    pub fn scroll_offset(&self) -> Point {
        self.scroll_offset
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Record the host's scroll offset and viewport size.
    pub fn set_viewport(&mut self, scroll_offset: Point, size: Size) {
        self.scroll_offset = scroll_offset;
        let size = size.clamp_non_negative();
        if size != self.viewport {
            self.viewport = size;
            self.layout.mark_dirty();
        }
    }

    fn to_content(&self, pos: Point) -> Point {
        pos + self.scroll_offset
    }

    fn geometry(&self) -> GeometryIndex<'_> {
        GeometryIndex::new(&self.store, &self.layout)
    }

    /// Scroll so the item at `index` is visible.
    ///
    /// With `align = Some((x, y))` the item is placed at that fraction of the
    /// viewport (0.0 leading edge, 1.0 trailing edge); otherwise the view
    /// scrolls the least distance that shows the whole item. Returns the new
    /// scroll offset if it changed.
    pub fn scroll_to_item(&mut self, index: usize, align: Option<(f32, f32)>) -> Option<Point> {
        self.relayout_if_dirty();
        let bounds = self.store.at(index)?.bounds();
        let viewport = self.viewport;
        let current = self.scroll_offset;

        let target = match align {
            Some((ax, ay)) => Point::new(
                aligned(bounds.left(), bounds.width(), viewport.width, ax),
                aligned(bounds.top(), bounds.height(), viewport.height, ay),
            ),
            None => Point::new(
                nearest(current.x, bounds.left(), bounds.right(), viewport.width),
                nearest(current.y, bounds.top(), bounds.bottom(), viewport.height),
            ),
        };

        let content = self.layout.content_size();
        let target = Point::new(
            target.x.clamp(0, (content.width - viewport.width).max(0)),
            target.y.clamp(0, (content.height - viewport.height).max(0)),
        );
        if target == current {
            return None;
        }
        self.scroll_offset = target;
        self.scroll_requested.emit(target);
        Some(target)
    }

    // =========================================================================
    // Hit Testing
    // =========================================================================

    /// Index of the item under `pos`.
    pub fn item_at(&mut self, pos: Point) -> Option<usize> {
        self.relayout_if_dirty();
        let pos = self.to_content(pos);
        self.geometry().item_at(pos).and_then(|id| self.store.index_of(id))
    }

    /// Index and sub-cell of the item under `pos`.
    pub fn item_at_cell(&mut self, pos: Point) -> Option<(usize, SubCell)> {
        self.relayout_if_dirty();
        let pos = self.to_content(pos);
        let (id, cell) = self.geometry().item_at_cell(pos, self.renderer.as_ref(), &self.style)?;
        self.store.index_of(id).map(|index| (index, cell))
    }

    /// Indices of the items overlapping `rect`, ascending.
    pub fn items_in_rect(&mut self, rect: Rect) -> Vec<usize> {
        self.relayout_if_dirty();
        let rect = rect.offset(self.scroll_offset.x, self.scroll_offset.y);
        self.geometry()
            .items_in_rect(rect)
            .into_iter()
            .filter_map(|id| self.store.index_of(id))
            .collect()
    }

    /// First and last index of the items inside the viewport.
    pub fn visible_range(&mut self) -> Option<(usize, usize)> {
        self.relayout_if_dirty();
        self.geometry().visible_range(self.scroll_offset, self.viewport)
    }

    pub fn item_row(&mut self, index: usize) -> Option<usize> {
        self.relayout_if_dirty();
        self.store.at(index).map(|item| item.row())
    }

    pub fn item_column(&mut self, index: usize) -> Option<usize> {
        self.relayout_if_dirty();
        self.store.at(index).map(|item| item.col())
    }

    /// Bounds of the item at `index` in content coordinates.
    pub fn item_bounds(&mut self, index: usize) -> Option<Rect> {
        self.relayout_if_dirty();
        self.store.at(index).map(|item| item.bounds())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Select the item at `index` and make it cursor and anchor.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(id) = self.store.id_at(index) else {
            return false;
        };
        let old_cursor = self.selection.cursor();
        let changed = self.selection.select(&mut self.store, id);
        if self.selection.mode() != SelectionMode::None {
            self.selection.set_cursor(Some(id));
            self.selection.set_anchor(Some(id));
        }
        self.notify(changed, old_cursor);
        changed
    }

    pub fn unselect(&mut self, index: usize) -> bool {
        let Some(id) = self.store.id_at(index) else {
            return false;
        };
        let changed = self.selection.unselect(&mut self.store, id);
        self.notify(changed, self.selection.cursor());
        changed
    }

    /// Replace the selection with the range between two indices.
    pub fn select_range(&mut self, anchor: usize, cursor: usize, policy: RangePolicy) -> bool {
        self.relayout_if_dirty();
        let (Some(a), Some(c)) = (self.store.id_at(anchor), self.store.id_at(cursor)) else {
            return false;
        };
        let changed = self.selection.select_range(&mut self.store, a, c, policy);
        self.notify(changed, self.selection.cursor());
        changed
    }

    pub fn select_all(&mut self) -> bool {
        let changed = self.selection.select_all(&mut self.store);
        self.notify(changed, self.selection.cursor());
        changed
    }

    pub fn unselect_all(&mut self) -> bool {
        let changed = self.selection.unselect_all(&mut self.store);
        self.notify(changed, self.selection.cursor());
        changed
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.store.at(index).is_some_and(|item| item.is_selected())
    }

    pub fn selected_count(&self) -> usize {
        self.selection.selected_count(&self.store)
    }

    /// Indices of the selected items, ascending.
    pub fn selected_items(&self) -> Vec<usize> {
        self.store
            .iter()
            .filter(|(_, item)| item.is_selected())
            .map(|(_, item)| item.index())
            .collect()
    }

    /// Call `f` with the index and handle of every selected item.
    pub fn selected_foreach(&self, mut f: impl FnMut(usize, ItemId)) {
        for (id, item) in self.store.iter().filter(|(_, item)| item.is_selected()) {
            f(item.index(), id);
        }
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    pub fn cursor(&self) -> Option<usize> {
        self.selection.cursor().and_then(|id| self.store.index_of(id))
    }

    pub fn anchor(&self) -> Option<usize> {
        self.selection.anchor().and_then(|id| self.store.index_of(id))
    }

    /// Move the cursor to `index`, making it the anchor. With `select` the
    /// item also becomes the only selected one.
    pub fn set_cursor(&mut self, index: usize, select: bool) -> bool {
        let Some(id) = self.store.id_at(index) else {
            return false;
        };
        let old_cursor = self.selection.cursor();
        self.selection.set_cursor(Some(id));
        self.selection.set_anchor(Some(id));
        let changed = select && self.selection.select_only(&mut self.store, id);
        self.notify(changed, old_cursor);
        self.scroll_to_item(index, None);
        true
    }

    /// Make the cursor item the only selected item.
    pub fn select_cursor_item(&mut self) -> bool {
        let Some(id) = self.selection.cursor() else {
            return false;
        };
        let changed = self.selection.select_only(&mut self.store, id);
        self.selection.set_anchor(Some(id));
        self.notify(changed, Some(id));
        changed
    }

    /// Flip the selection of the cursor item.
    pub fn toggle_cursor_item(&mut self) -> bool {
        let Some(id) = self.selection.cursor() else {
            return false;
        };
        let changed = self.selection.toggle(&mut self.store, id);
        self.selection.set_anchor(Some(id));
        self.notify(changed, Some(id));
        changed
    }

    /// Emit `item_activated` for the cursor item.
    pub fn activate_cursor_item(&mut self) -> bool {
        match self.selection.cursor() {
            Some(id) => {
                self.item_activated.emit(id);
                true
            }
            None => false,
        }
    }

    /// Move the cursor, extending the selection when `extend` is set.
    pub fn move_cursor(&mut self, movement: CursorMove, extend: bool) -> bool {
        let modifiers = if extend {
            KeyboardModifiers::SHIFT
        } else {
            KeyboardModifiers::NONE
        };
        self.move_cursor_with(movement, modifiers)
    }

    /// Move the cursor, updating the selection according to `modifiers`.
    ///
    /// Shift extends from the anchor (Ctrl+Shift as a box), Ctrl alone moves
    /// only the cursor, and no modifier selects the new cursor item alone.
    pub fn move_cursor_with(&mut self, movement: CursorMove, modifiers: KeyboardModifiers) -> bool {
        self.relayout_if_dirty();
        let old_cursor = self.selection.cursor();
        let target = Navigator::new(&self.store, &self.layout, self.viewport).target(old_cursor, movement);
        let Some(target) = target else {
            tracing::debug!(target: targets::NAVIGATION, ?movement, "cursor did not move");
            self.keynav_failed.emit(movement);
            return false;
        };

        self.selection.set_cursor(Some(target));
        let changed = match self.selection.mode() {
            SelectionMode::None => false,
            SelectionMode::Multiple if modifiers.shift => {
                let anchor = self
                    .selection
                    .anchor()
                    .filter(|id| self.store.contains(*id))
                    .or(old_cursor)
                    .unwrap_or(target);
                self.selection.set_anchor(Some(anchor));
                self.selection
                    .select_range(&mut self.store, anchor, target, RangePolicy::from_modifiers(modifiers))
            }
            SelectionMode::Multiple if modifiers.control => false,
            _ => {
                self.selection.set_anchor(Some(target));
                self.selection.select_only(&mut self.store, target)
            }
        };

        self.notify(changed, old_cursor);
        if let Some(index) = self.store.index_of(target) {
            self.scroll_to_item(index, None);
        }
        true
    }

    // =========================================================================
    // Pointer Events
    // =========================================================================

    /// Handle a button press. Returns `true` if the view consumed it.
    pub fn pointer_press(&mut self, event: PointerPress) -> bool {
        if event.button != MouseButton::Left {
            return false;
        }
        self.relayout_if_dirty();
        let pos = self.to_content(event.pos);
        self.last_pointer = Some(event.pos);

        let geometry = self.geometry();
        let hit = geometry.item_at(pos);
        let subcell = geometry
            .item_at_cell(pos, self.renderer.as_ref(), &self.style)
            .map(|(_, cell)| cell);

        let old_cursor = self.selection.cursor();
        let Some(id) = hit else {
            let changed = self
                .rubber_band
                .start(&mut self.store, &mut self.selection, pos, event.modifiers);
            self.press = Some(PressState {
                origin: pos,
                item: None,
                reduce_to: None,
                activate: false,
                dragging: false,
            });
            self.notify(changed, old_cursor);
            return true;
        };

        if event.click_count >= 2 {
            tracing::trace!(target: targets::SELECTION, "double click activates");
            self.item_activated.emit(id);
            return true;
        }

        let modifiers = event.modifiers;
        let mode = self.selection.mode();
        let on_toggle = subcell == Some(SubCell::SelectionToggle);
        let mut reduce_to = None;

        let changed = if on_toggle && mode == SelectionMode::Multiple {
            self.selection.set_anchor(Some(id));
            self.selection.toggle(&mut self.store, id)
        } else if mode == SelectionMode::None {
            false
        } else if modifiers.shift {
            let anchor = self
                .selection
                .anchor()
                .filter(|a| self.store.contains(*a))
                .or(old_cursor)
                .unwrap_or(id);
            self.selection.set_anchor(Some(anchor));
            self.selection
                .select_range(&mut self.store, anchor, id, RangePolicy::from_modifiers(modifiers))
        } else if modifiers.control && matches!(mode, SelectionMode::Multiple | SelectionMode::Single) {
            self.selection.set_anchor(Some(id));
            self.selection.toggle(&mut self.store, id)
        } else if mode == SelectionMode::Multiple && self.selection.is_selected(&self.store, id) {
            // Keep the selection so it can be dragged as a whole.
            self.selection.set_anchor(Some(id));
            reduce_to = Some(id);
            false
        } else {
            self.selection.set_anchor(Some(id));
            self.selection.select_only(&mut self.store, id)
        };
        self.selection.set_cursor(Some(id));

        self.press = Some(PressState {
            origin: pos,
            item: Some(id),
            reduce_to,
            activate: self.config.single_click && modifiers.none() && !on_toggle,
            dragging: false,
        });
        self.notify(changed, old_cursor);
        true
    }

    /// Handle pointer motion. Returns `true` if the selection changed.
    pub fn pointer_move(&mut self, pos: Point) -> bool {
        self.relayout_if_dirty();
        self.last_pointer = Some(pos);
        let content = self.to_content(pos);

        if self.rubber_band.is_active() {
            self.autoscroll.update(pos, self.viewport);
            let changed = self
                .rubber_band
                .update(&mut self.store, &self.layout, &self.selection, content);
            self.notify(changed, self.selection.cursor());
            return changed;
        }

        let threshold = self.config.drag_threshold;
        if let Some(press) = &mut self.press
            && let Some(id) = press.item
            && !press.dragging
            && content.manhattan_distance(press.origin) >= threshold
        {
            press.dragging = true;
            tracing::debug!(target: targets::DND, "drag started");
            self.drag_started.emit(id);
        }

        let hovered = self.geometry().item_at(content);
        if self.selection.set_prelit(hovered) {
            self.item_hovered.emit(hovered);
        }
        false
    }

    /// Handle the button release ending a press.
    pub fn pointer_release(&mut self, pos: Point) -> bool {
        self.relayout_if_dirty();
        let content = self.to_content(pos);
        let old_cursor = self.selection.cursor();
        let mut changed = false;

        if self.rubber_band.is_active() {
            changed |= self
                .rubber_band
                .update(&mut self.store, &self.layout, &self.selection, content);
            self.rubber_band.finish(&mut self.store, &mut self.selection);
            self.autoscroll.stop();
        }

        if let Some(press) = self.press.take()
            && !press.dragging
        {
            if let Some(id) = press.reduce_to {
                changed |= self.selection.select_only(&mut self.store, id);
            }
            if press.activate
                && let Some(id) = press.item
                && self.geometry().item_at(content) == Some(id)
            {
                self.item_activated.emit(id);
            }
        }

        self.notify(changed, old_cursor);
        changed
    }

    /// The pointer left the view.
    pub fn pointer_leave(&mut self) {
        if self.selection.set_prelit(None) {
            self.item_hovered.emit(None);
        }
    }

    /// Scroll one step toward the edge the pointer is near during a rubber
    /// band or drag. Call from a repeating host timer.
    pub fn autoscroll_tick(&mut self) -> Option<Point> {
        self.relayout_if_dirty();
        let next = self.autoscroll.tick(self.scroll_offset, self.layout.content_size())?;
        self.scroll_offset = next;
        self.scroll_requested.emit(next);

        if self.rubber_band.is_active()
            && let Some(pointer) = self.last_pointer
        {
            let content = self.to_content(pointer);
            let changed = self
                .rubber_band
                .update(&mut self.store, &self.layout, &self.selection, content);
            self.notify(changed, self.selection.cursor());
        } else if !self.drag_dest.is_none()
            && let Some(pointer) = self.last_pointer
        {
            // The content under the pointer moved; so did the destination.
            self.drag_dest = self.drop_target(pointer);
        }
        Some(next)
    }

    /// The rubber band rectangle in content coordinates, while one is active.
    pub fn rubber_band_rect(&self) -> Option<Rect> {
        self.rubber_band.rect()
    }

    // =========================================================================
    // Keyboard Events
    // =========================================================================

    /// Handle a key press. Returns `true` if the view consumed it.
    pub fn key_press(&mut self, event: KeyPress) -> bool {
        if let Some(movement) = event.key.cursor_move() {
            return self.move_cursor_with(movement, event.modifiers);
        }

        let ctrl = event.modifiers.control;
        let shift = event.modifiers.shift;
        match event.key {
            Key::Space if ctrl => {
                self.toggle_cursor_item();
                true
            }
            Key::Space => {
                self.select_cursor_item();
                true
            }
            Key::Enter => self.activate_cursor_item(),
            Key::Character(c) if ctrl && shift && c.eq_ignore_ascii_case(&'a') => {
                self.unselect_all();
                true
            }
            Key::Character(c) if ctrl && c.eq_ignore_ascii_case(&'a') => {
                self.select_all();
                true
            }
            Key::Escape => {
                if self.rubber_band.is_active() {
                    let changed = self.rubber_band.cancel(&mut self.store);
                    self.autoscroll.stop();
                    self.press = None;
                    self.notify(changed, self.selection.cursor());
                } else {
                    self.unselect_all();
                }
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Drag and Drop
    // =========================================================================

    /// Drop target under `pos` without recording it.
    pub fn drop_target(&mut self, pos: Point) -> DropTarget {
        self.relayout_if_dirty();
        let pos = self.to_content(pos);
        dnd::drop_target(&self.store, &self.layout, pos, self.config.reorderable)
    }

    /// A drag moved over the view: record the destination under `pos`.
    pub fn drag_motion(&mut self, pos: Point) -> DropTarget {
        let target = self.drop_target(pos);
        self.drag_dest = target;
        self.last_pointer = Some(pos);
        self.autoscroll.update(pos, self.viewport);
        target
    }

    /// The drag left the view or was dropped.
    pub fn drag_leave(&mut self) {
        self.drag_dest = DropTarget::NONE;
        self.autoscroll.stop();
    }

    /// Set the drop destination directly. `None` clears it.
    pub fn set_drag_dest_item(&mut self, index: Option<usize>, position: DropPosition) {
        self.drag_dest = match index {
            Some(index) => match self.store.id_at(index) {
                Some(id) => DropTarget::new(Some(id), position),
                None => DropTarget::NONE,
            },
            None if position == DropPosition::Above => DropTarget::new(None, position),
            None => DropTarget::NONE,
        };
    }

    /// The current drop destination as an index and position.
    pub fn drag_dest_item(&self) -> (Option<usize>, DropPosition) {
        let index = self.drag_dest.item.and_then(|id| self.store.index_of(id));
        (index, self.drag_dest.position)
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Hand every visible item to the renderer. Returns how many were painted.
    pub fn paint_visible(&mut self) -> usize {
        self.relayout_if_dirty();
        let Some((first, last)) = self.visible_range() else {
            return 0;
        };
        let view = Rect::new(
            self.scroll_offset.x,
            self.scroll_offset.y,
            self.viewport.width,
            self.viewport.height,
        );

        let mut painted = 0;
        for index in first..=last {
            let Some(id) = self.store.id_at(index) else {
                continue;
            };
            let Some(item) = self.store.get(id) else {
                continue;
            };
            if item.bounds().intersect(&view).is_none() {
                continue;
            }
            let state = CellState::default()
                .with_selected(item.is_selected())
                .with_cursor(self.selection.cursor() == Some(id))
                .with_prelit(self.selection.prelit() == Some(id))
                .with_drop_highlight(
                    self.drag_dest.item == Some(id) && self.drag_dest.position == DropPosition::Into,
                );
            let option = CellOption {
                index,
                id,
                rect: item.bounds(),
                state,
                style: self.style,
            };
            self.renderer.paint(&option);
            painted += 1;
        }
        painted
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Emit the signals for one public operation.
    fn notify(&self, selection_changed: bool, old_cursor: Option<ItemId>) {
        self.selection.debug_check(&self.store);
        if selection_changed {
            tracing::trace!(target: targets::SELECTION, selected = self.selected_count(), "selection changed");
            self.selection_changed.emit(());
        }
        let cursor = self.selection.cursor();
        if cursor != old_cursor {
            self.cursor_changed.emit(cursor);
        }
    }
}

impl std::fmt::Debug for IconView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconView")
            .field("items", &self.store.len())
            .field("selection", &self.selection)
            .field("config", &self.config)
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

/// Scroll offset placing `[start, start + len)` at fraction `align` of `view`.
fn aligned(start: i32, len: i32, view: i32, align: f32) -> i32 {
    let slack = (view - len) as f32;
    start - (slack * align.clamp(0.0, 1.0)).round() as i32
}

/// Smallest scroll from `current` that shows `[start, end)` in `view`.
fn nearest(current: i32, start: i32, end: i32, view: i32) -> i32 {
    if start < current {
        start
    } else if end > current + view {
        (end - view).min(start)
    } else {
        current
    }
}

static_assertions::assert_impl_all!(IconView: Send, Sync);
