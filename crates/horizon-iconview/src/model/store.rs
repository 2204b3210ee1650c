//! Ordered item storage mirroring an external list model.
//!
//! Items live in a [`SlotMap`] keyed by [`ItemId`] so that interaction state can
//! hold weak, generational handles. A separate `order` vector gives the list
//! order. After every mutation each item's recorded `index` matches its
//! position in `order`; debug builds assert this.

use horizon_iconview_core::Signal;
use horizon_iconview_core::logging::targets;
use slotmap::SlotMap;

use super::item::{Item, ItemId};

/// Notifications emitted by an [`ItemStore`] after each mutation.
#[derive(Debug, Default)]
pub struct StoreSignals {
    /// An item was inserted. Args: index.
    pub inserted: Signal<usize>,
    /// An item was removed. Args: index it occupied.
    pub removed: Signal<usize>,
    /// An item moved. Args: (old index, new index).
    pub moved: Signal<(usize, usize)>,
    /// All items were permuted. Args: `new_order[new_index] == old_index`.
    pub reordered: Signal<Vec<usize>>,
    /// The store was emptied.
    pub cleared: Signal<()>,
}

/// Ordered sequence of [`Item`] records.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: SlotMap<ItemId, Item>,
    order: Vec<ItemId>,
    signals: StoreSignals,
}

impl ItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `count` fresh items.
    pub fn with_len(count: usize) -> Self {
        let mut store = Self::new();
        store.order.reserve(count);
        for index in 0..count {
            let id = store.items.insert(Item::new(index));
            store.order.push(id);
        }
        store
    }

    /// The store's notification signals.
    pub fn signals(&self) -> &StoreSignals {
        &self.signals
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in list order.
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    /// Handle of the item at `index`.
    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.order.get(index).copied()
    }

    /// Handle of the last item.
    pub fn last_id(&self) -> Option<ItemId> {
        self.order.last().copied()
    }

    /// Whether `id` still refers to a live item.
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(id)
    }

    /// The item at `index`.
    pub fn at(&self, index: usize) -> Option<&Item> {
        self.order.get(index).and_then(|id| self.items.get(*id))
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Option<&mut Item> {
        let id = *self.order.get(index)?;
        self.items.get_mut(id)
    }

    /// Current index of `id`.
    ///
    /// The recorded index is trusted only when it agrees with the order
    /// vector; otherwise the position is re-derived from the order.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        let item = self.items.get(id)?;
        if self.order.get(item.index) == Some(&id) {
            return Some(item.index);
        }
        tracing::warn!(
            target: targets::STORE,
            recorded = item.index,
            "item index out of sync with store order, re-deriving"
        );
        self.order.iter().position(|other| *other == id)
    }

    /// Items in list order with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item)> + '_ {
        self.order.iter().filter_map(|id| self.items.get(*id).map(|item| (*id, item)))
    }

    /// Mutable access to every item, in no particular order.
    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> + '_ {
        self.items.values_mut()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a fresh item at `index`, returning its handle.
    ///
    /// An index past the end appends.
    pub fn insert(&mut self, index: usize) -> ItemId {
        let index = if index > self.order.len() {
            tracing::warn!(
                target: targets::STORE,
                index,
                len = self.order.len(),
                "insert index past end, appending"
            );
            self.order.len()
        } else {
            index
        };

        let id = self.items.insert(Item::new(index));
        self.order.insert(index, id);
        self.reindex_from(index + 1);
        self.debug_check_indices();

        tracing::trace!(target: targets::STORE, index, "item inserted");
        self.signals.inserted.emit(index);
        id
    }

    /// Append a fresh item.
    pub fn push(&mut self) -> ItemId {
        self.insert(self.order.len())
    }

    /// Remove the item at `index`, returning its handle and record.
    pub fn remove(&mut self, index: usize) -> Option<(ItemId, Item)> {
        if index >= self.order.len() {
            tracing::warn!(
                target: targets::STORE,
                index,
                len = self.order.len(),
                "remove index out of range, ignoring"
            );
            return None;
        }

        let id = self.order.remove(index);
        let item = self.items.remove(id)?;
        self.reindex_from(index);
        self.debug_check_indices();

        tracing::trace!(target: targets::STORE, index, "item removed");
        self.signals.removed.emit(index);
        Some((id, item))
    }

    /// Move the item at `from` so that it ends up at `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.order.len();
        if from >= len || to >= len {
            tracing::warn!(target: targets::STORE, from, to, len, "move out of range, ignoring");
            return false;
        }
        if from == to {
            return true;
        }

        let id = self.order.remove(from);
        self.order.insert(to, id);
        self.reindex_from(from.min(to));
        self.debug_check_indices();

        tracing::trace!(target: targets::STORE, from, to, "item moved");
        self.signals.moved.emit((from, to));
        true
    }

    /// Permute all items. `new_order[new_index]` is the old index of the item
    /// that ends up at `new_index`.
    pub fn reorder(&mut self, new_order: &[usize]) -> bool {
        if !is_permutation(new_order, self.order.len()) {
            tracing::warn!(
                target: targets::STORE,
                len = self.order.len(),
                "reorder is not a permutation of the store, ignoring"
            );
            return false;
        }

        let old = std::mem::take(&mut self.order);
        self.order = new_order.iter().map(|old_index| old[*old_index]).collect();
        self.reindex_from(0);
        self.debug_check_indices();

        tracing::trace!(target: targets::STORE, len = self.order.len(), "items reordered");
        self.signals.reordered.emit(new_order.to_vec());
        true
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
        tracing::trace!(target: targets::STORE, "store cleared");
        self.signals.cleared.emit(());
    }

    fn reindex_from(&mut self, start: usize) {
        for (index, id) in self.order.iter().enumerate().skip(start) {
            if let Some(item) = self.items.get_mut(*id) {
                item.index = index;
            }
        }
    }

    fn debug_check_indices(&self) {
        debug_assert_eq!(self.items.len(), self.order.len());
        debug_assert!(
            self.order
                .iter()
                .enumerate()
                .all(|(index, id)| self.items.get(*id).is_some_and(|item| item.index == index)),
            "item index disagrees with store order"
        );
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &old in order {
        if old >= len || seen[old] {
            return false;
        }
        seen[old] = true;
    }
    true
}
