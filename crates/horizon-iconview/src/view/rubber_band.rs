//! Drag-select gesture.
//!
//! When a gesture starts, every item's selection is copied into
//! `selected_before_rubberband`. Each pointer move recomputes the band
//! rectangle and derives the selection from that snapshot and the set of
//! items under the band, so moving back over an item undoes what passing it
//! did. The selection from before the gesture is kept separately so that
//! cancelling restores it even after a plain gesture cleared it.

use horizon_iconview_core::logging::{span_names, targets};
use horizon_iconview_core::{PerfSpan, Point, Rect};

use super::events::KeyboardModifiers;
use super::hit_test::GeometryIndex;
use super::layout::LayoutEngine;
use crate::model::{ItemId, ItemStore, SelectionMode, SelectionState};

/// How the band's hit set combines with the selection it started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Items under the band are added (Shift held at gesture start).
    Or,
    /// Items under the band flip their snapshot state.
    #[default]
    Xor,
}

impl MergePolicy {
    pub fn from_modifiers(modifiers: KeyboardModifiers) -> Self {
        if modifiers.shift { Self::Or } else { Self::Xor }
    }

    fn merge(self, before: bool, hit: bool) -> bool {
        match self {
            Self::Or => before || hit,
            Self::Xor => before ^ hit,
        }
    }
}

/// State of a drag-select gesture. Idle until [`RubberBand::start`].
#[derive(Debug, Clone, Default)]
pub struct RubberBand {
    active: bool,
    /// Gesture origin in content coordinates.
    origin: Point,
    /// Current pointer position in content coordinates.
    current: Point,
    policy: MergePolicy,
    /// Items selected before the gesture, sorted.
    restore: Vec<ItemId>,
}

impl RubberBand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// The band rectangle in content coordinates, while active.
    pub fn rect(&self) -> Option<Rect> {
        self.active.then(|| Rect::from_points(self.origin, self.current))
    }

    /// Begin a gesture at `origin` (content coordinates).
    ///
    /// Without Shift or Ctrl the selection is cleared first, except in Browse
    /// mode, which must keep its item. Returns `true` if the selection changed.
    pub fn start(
        &mut self,
        store: &mut ItemStore,
        selection: &mut SelectionState,
        origin: Point,
        modifiers: KeyboardModifiers,
    ) -> bool {
        if selection.mode() == SelectionMode::None {
            return false;
        }

        self.restore = store
            .iter()
            .filter(|(_, item)| item.is_selected())
            .map(|(id, _)| id)
            .collect();
        self.restore.sort_unstable();

        let additive = modifiers.shift || modifiers.control;
        let changed = if !additive && selection.mode() != SelectionMode::Browse {
            selection.clear(store)
        } else {
            false
        };

        for item in store.items_mut() {
            item.selected_before_rubberband = item.selected;
        }
        self.active = true;
        self.origin = origin;
        self.current = origin;
        self.policy = MergePolicy::from_modifiers(modifiers);
        tracing::debug!(
            target: targets::SELECTION,
            x = origin.x,
            y = origin.y,
            policy = ?self.policy,
            "rubber band started"
        );
        changed
    }

    /// Move the band's free corner to `pos` (content coordinates) and
    /// recompute the selection. Returns `true` if the selection changed.
    pub fn update(
        &mut self,
        store: &mut ItemStore,
        layout: &LayoutEngine,
        selection: &SelectionState,
        pos: Point,
    ) -> bool {
        if !self.active {
            return false;
        }
        let _span = PerfSpan::new(span_names::RUBBER_BAND);
        self.current = pos;
        let rect = Rect::from_points(self.origin, self.current);

        let hits: Vec<usize> = GeometryIndex::new(store, layout)
            .items_in_rect(rect)
            .into_iter()
            .filter_map(|id| store.index_of(id))
            .collect();

        let changed = match selection.mode() {
            SelectionMode::None => false,
            SelectionMode::Multiple => {
                let mut changed = false;
                for item in store.items_mut() {
                    let hit = hits.binary_search(&item.index).is_ok();
                    let wanted = self.policy.merge(item.selected_before_rubberband, hit);
                    if item.selected != wanted {
                        item.selected = wanted;
                        changed = true;
                    }
                }
                changed
            }
            // One item at most: the band's last hit, or the snapshot.
            SelectionMode::Single | SelectionMode::Browse => {
                let last_hit = hits.last().copied();
                let mut changed = false;
                for item in store.items_mut() {
                    let wanted = match last_hit {
                        Some(index) => item.index == index,
                        None => item.selected_before_rubberband,
                    };
                    if item.selected != wanted {
                        item.selected = wanted;
                        changed = true;
                    }
                }
                changed
            }
        };

        tracing::trace!(target: targets::SELECTION, hits = hits.len(), changed, "rubber band updated");
        selection.debug_check(store);
        changed
    }

    /// End the gesture.
    ///
    /// The last selected item in list order becomes cursor and anchor. With
    /// nothing selected both are left alone. Returns the new cursor, if any.
    pub fn finish(&mut self, store: &mut ItemStore, selection: &mut SelectionState) -> Option<ItemId> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.restore.clear();
        for item in store.items_mut() {
            item.selected_before_rubberband = false;
        }

        let last = store
            .iter()
            .filter(|(_, item)| item.is_selected())
            .map(|(id, _)| id)
            .last();
        if let Some(id) = last {
            selection.set_cursor(Some(id));
            selection.set_anchor(Some(id));
        }
        tracing::debug!(target: targets::SELECTION, selected = selection.selected_count(store), "rubber band finished");
        last
    }

    /// Abandon the gesture, restoring the selection from before it started.
    pub fn cancel(&mut self, store: &mut ItemStore) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        let restore = std::mem::take(&mut self.restore);
        let ids = store.ids().to_vec();
        let mut changed = false;
        for id in ids {
            let Some(item) = store.get_mut(id) else {
                continue;
            };
            let wanted = restore.binary_search(&id).is_ok();
            if item.selected != wanted {
                item.selected = wanted;
                changed = true;
            }
            item.selected_before_rubberband = false;
        }
        tracing::debug!(target: targets::SELECTION, restored = restore.len(), "rubber band cancelled");
        changed
    }
}
