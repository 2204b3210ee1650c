//! Selection state machine for the icon view.
//!
//! Selection flags live on the [`Item`](super::Item)s themselves; this module
//! holds the mode and the weak cursor/anchor/hover handles, and implements
//! every mode-aware mutation. Each operation returns `true` when it changed
//! anything so the owning view can emit a single notification.
//!
//! # Modes
//!
//! | Mode       | Selected items            |
//! |------------|---------------------------|
//! | `None`     | always zero               |
//! | `Single`   | zero or one               |
//! | `Browse`   | exactly one once non-empty |
//! | `Multiple` | any number                |

use horizon_iconview_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::item::{Item, ItemId};
use super::store::ItemStore;
use crate::view::KeyboardModifiers;

/// Selection behavior mode for the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// No items can be selected.
    None,
    /// At most one item is selected.
    Single,
    /// Exactly one item is selected once the view has items.
    Browse,
    /// Any number of items can be selected.
    #[default]
    Multiple,
}

/// How [`SelectionState::select_range`] decides which items lie between two ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Every item between the two ends in list order.
    #[default]
    ListOrder,
    /// Every item whose grid cell lies in the rectangle spanned by the two ends.
    BoundingBox,
}

impl RangePolicy {
    /// Shift alone selects in list order; Ctrl+Shift selects a box.
    pub fn from_modifiers(modifiers: KeyboardModifiers) -> Self {
        if modifiers.shift && modifiers.control {
            Self::BoundingBox
        } else {
            Self::ListOrder
        }
    }
}

/// Mode, cursor, anchor and hover state of an icon view.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    mode: SelectionMode,
    cursor: Option<ItemId>,
    anchor: Option<ItemId>,
    prelit: Option<ItemId>,
}

impl SelectionState {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    // =========================================================================
    // Mode
    // =========================================================================

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Change the mode and bring the current selection in line with it.
    pub fn set_mode(&mut self, store: &mut ItemStore, mode: SelectionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        tracing::debug!(target: targets::SELECTION, from = ?self.mode, to = ?mode, "selection mode changed");
        self.mode = mode;

        let changed = match mode {
            SelectionMode::None => self.clear(store),
            SelectionMode::Single | SelectionMode::Browse => {
                let keep = self
                    .cursor
                    .filter(|id| self.is_selected(store, *id))
                    .or_else(|| self.selected_ids(store).first().copied())
                    .and_then(|id| store.get(id))
                    .map(|item| item.index);
                let mut changed = false;
                for item in store.items_mut() {
                    let wanted = Some(item.index) == keep;
                    if item.selected != wanted {
                        item.selected = wanted;
                        changed = true;
                    }
                }
                changed | self.ensure_browse_selection(store, 0)
            }
            SelectionMode::Multiple => false,
        };
        self.debug_check(store);
        changed
    }

    // =========================================================================
    // Handles
    // =========================================================================

    /// The keyboard cursor, if it still refers to a live item.
    pub fn cursor(&self) -> Option<ItemId> {
        self.cursor
    }

    pub fn anchor(&self) -> Option<ItemId> {
        self.anchor
    }

    /// The hovered item.
    pub fn prelit(&self) -> Option<ItemId> {
        self.prelit
    }

    /// Set the cursor. Returns `true` if it changed.
    pub fn set_cursor(&mut self, cursor: Option<ItemId>) -> bool {
        let changed = self.cursor != cursor;
        self.cursor = cursor;
        changed
    }

    pub fn set_anchor(&mut self, anchor: Option<ItemId>) {
        self.anchor = anchor;
    }

    /// Set the hovered item. Returns `true` if it changed.
    pub fn set_prelit(&mut self, prelit: Option<ItemId>) -> bool {
        let changed = self.prelit != prelit;
        self.prelit = prelit;
        changed
    }

    /// Drop every handle that refers to `id`. Called before the item is removed.
    pub fn forget(&mut self, id: ItemId) {
        if self.cursor == Some(id) {
            self.cursor = None;
        }
        if self.anchor == Some(id) {
            self.anchor = None;
        }
        if self.prelit == Some(id) {
            self.prelit = None;
        }
    }

    /// Drop every handle.
    pub fn forget_all(&mut self) {
        self.cursor = None;
        self.anchor = None;
        self.prelit = None;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_selected(&self, store: &ItemStore, id: ItemId) -> bool {
        store.get(id).is_some_and(|item| item.selected)
    }

    pub fn selected_count(&self, store: &ItemStore) -> usize {
        store.iter().filter(|(_, item)| item.selected).count()
    }

    /// Selected items in list order.
    pub fn selected_ids(&self, store: &ItemStore) -> Vec<ItemId> {
        store
            .iter()
            .filter(|(_, item)| item.selected)
            .map(|(id, _)| id)
            .collect()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Select `id`. Single and Browse modes clear every other item first.
    pub fn select(&mut self, store: &mut ItemStore, id: ItemId) -> bool {
        let changed = match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single | SelectionMode::Browse => self.select_only(store, id),
            SelectionMode::Multiple => set_selected(store, id, true),
        };
        self.debug_check(store);
        changed
    }

    /// Unselect `id`. Browse mode refuses to unselect its last item.
    pub fn unselect(&mut self, store: &mut ItemStore, id: ItemId) -> bool {
        let changed = match self.mode {
            SelectionMode::None => false,
            SelectionMode::Browse => {
                tracing::trace!(target: targets::SELECTION, "browse mode keeps its selected item");
                false
            }
            SelectionMode::Single | SelectionMode::Multiple => set_selected(store, id, false),
        };
        self.debug_check(store);
        changed
    }

    /// Flip the selection of `id`.
    pub fn toggle(&mut self, store: &mut ItemStore, id: ItemId) -> bool {
        if self.is_selected(store, id) {
            self.unselect(store, id)
        } else {
            self.select(store, id)
        }
    }

    /// Make `id` the only selected item, in any mode except `None`.
    pub fn select_only(&mut self, store: &mut ItemStore, id: ItemId) -> bool {
        if self.mode == SelectionMode::None {
            return false;
        }
        let Some(target) = store.get(id).map(|item| item.index) else {
            return false;
        };
        let mut changed = false;
        for item in store.items_mut() {
            let wanted = item.index == target;
            if item.selected != wanted {
                item.selected = wanted;
                changed = true;
            }
        }
        changed
    }

    /// Replace the selection with the range between `anchor` and `cursor`.
    ///
    /// Single and Browse modes select only the `cursor` end.
    pub fn select_range(
        &mut self,
        store: &mut ItemStore,
        anchor: ItemId,
        cursor: ItemId,
        policy: RangePolicy,
    ) -> bool {
        match self.mode {
            SelectionMode::None => return false,
            SelectionMode::Single | SelectionMode::Browse => return self.select(store, cursor),
            SelectionMode::Multiple => {}
        }

        let (Some(a), Some(c)) = (store.get(anchor), store.get(cursor)) else {
            return false;
        };

        let indices = a.index.min(c.index)..=a.index.max(c.index);
        let rows = a.row.min(c.row)..=a.row.max(c.row);
        let cols = a.col.min(c.col)..=a.col.max(c.col);
        let in_range = |item: &Item| match policy {
            RangePolicy::ListOrder => indices.contains(&item.index),
            RangePolicy::BoundingBox => rows.contains(&item.row) && cols.contains(&item.col),
        };

        let mut changed = false;
        for item in store.items_mut() {
            let wanted = in_range(item);
            if item.selected != wanted {
                item.selected = wanted;
                changed = true;
            }
        }
        tracing::trace!(target: targets::SELECTION, ?policy, changed, "range selected");
        changed
    }

    /// Select every item. Only effective in `Multiple` mode.
    pub fn select_all(&mut self, store: &mut ItemStore) -> bool {
        if self.mode != SelectionMode::Multiple {
            return false;
        }
        let mut changed = false;
        for item in store.items_mut() {
            if !item.selected {
                item.selected = true;
                changed = true;
            }
        }
        changed
    }

    /// Unselect every item. Only effective in `Multiple` mode.
    pub fn unselect_all(&mut self, store: &mut ItemStore) -> bool {
        if self.mode != SelectionMode::Multiple {
            return false;
        }
        self.clear(store)
    }

    /// Unselect every item regardless of mode.
    ///
    /// Used for gestures that start from scratch; callers in Browse mode must
    /// restore a selection before returning to the host.
    pub(crate) fn clear(&mut self, store: &mut ItemStore) -> bool {
        let mut changed = false;
        for item in store.items_mut() {
            if item.selected {
                item.selected = false;
                changed = true;
            }
        }
        changed
    }

    /// In Browse mode, select an item if none is selected.
    ///
    /// Prefers the cursor, then the item at `near_index` (clamped to the end).
    /// The chosen item also becomes cursor and anchor.
    pub fn ensure_browse_selection(&mut self, store: &mut ItemStore, near_index: usize) -> bool {
        if self.mode != SelectionMode::Browse || store.is_empty() {
            return false;
        }
        if store.iter().any(|(_, item)| item.selected) {
            return false;
        }

        let target = self
            .cursor
            .filter(|id| store.contains(*id))
            .or_else(|| store.id_at(near_index.min(store.len() - 1)));
        let Some(id) = target else {
            return false;
        };

        set_selected(store, id, true);
        self.cursor = Some(id);
        self.anchor = Some(id);
        tracing::trace!(target: targets::SELECTION, "browse mode selected fallback item");
        true
    }

    /// Assert the mode invariants in debug builds.
    pub(crate) fn debug_check(&self, store: &ItemStore) {
        if cfg!(debug_assertions) {
            let count = self.selected_count(store);
            match self.mode {
                SelectionMode::None => debug_assert_eq!(count, 0, "selection in None mode"),
                SelectionMode::Single => debug_assert!(count <= 1, "{count} items selected in Single mode"),
                SelectionMode::Browse => debug_assert!(
                    count == 1 || (count == 0 && store.is_empty()),
                    "{count} items selected in Browse mode"
                ),
                SelectionMode::Multiple => {}
            }
        }
    }
}

fn set_selected(store: &mut ItemStore, id: ItemId, selected: bool) -> bool {
    match store.get_mut(id) {
        Some(item) if item.selected != selected => {
            item.selected = selected;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(mode: SelectionMode, count: usize) -> (SelectionState, ItemStore) {
        (SelectionState::new(mode), ItemStore::with_len(count))
    }

    fn selected_indices(state: &SelectionState, store: &ItemStore) -> Vec<usize> {
        state
            .selected_ids(store)
            .into_iter()
            .filter_map(|id| store.index_of(id))
            .collect()
    }

    fn id(store: &ItemStore, index: usize) -> ItemId {
        store.id_at(index).unwrap()
    }

    #[test]
    fn test_none_mode_ignores_everything() {
        let (mut state, mut store) = setup(SelectionMode::None, 3);
        let first = id(&store, 0);
        assert!(!state.select(&mut store, first));
        assert!(!state.select_all(&mut store));
        assert_eq!(state.selected_count(&store), 0);
    }

    #[test]
    fn test_single_mode_replaces() {
        let (mut state, mut store) = setup(SelectionMode::Single, 3);
        let (a, b) = (id(&store, 0), id(&store, 1));

        assert!(state.select(&mut store, a));
        assert!(state.select(&mut store, b));
        assert_eq!(selected_indices(&state, &store), vec![1]);

        // Reselecting is not a change.
        assert!(!state.select(&mut store, b));

        assert!(state.unselect(&mut store, b));
        assert_eq!(state.selected_count(&store), 0);
    }

    #[test]
    fn test_browse_mode_keeps_one() {
        let (mut state, mut store) = setup(SelectionMode::Browse, 3);
        assert!(state.ensure_browse_selection(&mut store, 0));
        assert_eq!(selected_indices(&state, &store), vec![0]);

        let second = id(&store, 1);
        assert!(state.select(&mut store, second));
        assert!(!state.unselect(&mut store, second));
        assert_eq!(selected_indices(&state, &store), vec![1]);

        assert!(!state.unselect_all(&mut store));
        assert_eq!(state.selected_count(&store), 1);
    }

    #[test]
    fn test_multiple_mode_accumulates() {
        let (mut state, mut store) = setup(SelectionMode::Multiple, 4);
        let (a, c) = (id(&store, 0), id(&store, 2));
        state.select(&mut store, a);
        state.select(&mut store, c);
        assert_eq!(selected_indices(&state, &store), vec![0, 2]);

        assert!(state.toggle(&mut store, a));
        assert_eq!(selected_indices(&state, &store), vec![2]);

        assert!(state.select_all(&mut store));
        assert_eq!(state.selected_count(&store), 4);
        assert!(state.unselect_all(&mut store));
        assert_eq!(state.selected_count(&store), 0);
    }

    #[test]
    fn test_select_range_list_order() {
        let (mut state, mut store) = setup(SelectionMode::Multiple, 10);
        let (anchor, cursor) = (id(&store, 6), id(&store, 3));
        let stray = id(&store, 9);
        state.select(&mut store, stray);

        assert!(state.select_range(&mut store, anchor, cursor, RangePolicy::ListOrder));
        assert_eq!(selected_indices(&state, &store), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_select_range_bounding_box() {
        let (mut state, mut store) = setup(SelectionMode::Multiple, 9);
        // Lay out a 3x3 grid by hand.
        for index in 0..9 {
            let item = store.at_mut(index).unwrap();
            item.row = index / 3;
            item.col = index % 3;
        }
        let (anchor, cursor) = (id(&store, 1), id(&store, 5));

        assert!(state.select_range(&mut store, anchor, cursor, RangePolicy::BoundingBox));
        assert_eq!(selected_indices(&state, &store), vec![1, 2, 4, 5]);

        assert!(state.select_range(&mut store, anchor, cursor, RangePolicy::ListOrder));
        assert_eq!(selected_indices(&state, &store), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_select_range_single_mode_selects_cursor() {
        let (mut state, mut store) = setup(SelectionMode::Single, 5);
        let (anchor, cursor) = (id(&store, 0), id(&store, 3));
        state.select_range(&mut store, anchor, cursor, RangePolicy::ListOrder);
        assert_eq!(selected_indices(&state, &store), vec![3]);
    }

    #[test]
    fn test_range_policy_from_modifiers() {
        assert_eq!(RangePolicy::from_modifiers(KeyboardModifiers::SHIFT), RangePolicy::ListOrder);
        assert_eq!(
            RangePolicy::from_modifiers(KeyboardModifiers::CTRL_SHIFT),
            RangePolicy::BoundingBox
        );
    }

    #[test]
    fn test_set_mode_normalizes() {
        let (mut state, mut store) = setup(SelectionMode::Multiple, 5);
        for index in [1, 2, 4] {
            let item = id(&store, index);
            state.select(&mut store, item);
        }
        state.set_cursor(Some(id(&store, 2)));

        assert!(state.set_mode(&mut store, SelectionMode::Single));
        assert_eq!(selected_indices(&state, &store), vec![2]);

        assert!(state.set_mode(&mut store, SelectionMode::None));
        assert_eq!(state.selected_count(&store), 0);

        state.set_mode(&mut store, SelectionMode::Browse);
        assert_eq!(state.selected_count(&store), 1);
    }

    #[test]
    fn test_forget_clears_handles() {
        let (mut state, store) = setup(SelectionMode::Multiple, 2);
        let a = id(&store, 0);
        state.set_cursor(Some(a));
        state.set_anchor(Some(a));
        state.set_prelit(Some(a));

        state.forget(a);
        assert_eq!(state.cursor(), None);
        assert_eq!(state.anchor(), None);
        assert_eq!(state.prelit(), None);
    }
}
