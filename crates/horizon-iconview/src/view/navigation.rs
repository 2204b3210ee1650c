//! Keyboard cursor traversal.
//!
//! Steps are expressed in grid cells. A step along the flow axis (Left/Right
//! in rows-flow, Up/Down in columns-flow) that runs off the end of a line
//! continues in list order. So does a step across lines that lands past the
//! end of a shorter line.

use horizon_iconview_core::Size;
use horizon_iconview_core::logging::targets;

use super::config::{LayoutMode, TextDirection};
use super::layout::LayoutEngine;
use crate::model::{Item, ItemId, ItemStore};

/// A cursor movement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorMove {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Computes cursor targets over a laid-out store.
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    store: &'a ItemStore,
    layout: &'a LayoutEngine,
    page: Size,
}

impl<'a> Navigator<'a> {
    /// `page` is the viewport size, used as the PageUp/PageDown distance.
    pub fn new(store: &'a ItemStore, layout: &'a LayoutEngine, page: Size) -> Self {
        Self { store, layout, page }
    }

    /// Where `movement` takes the cursor from `from`.
    ///
    /// Returns `None` if the cursor cannot move. With no (or a stale) cursor
    /// the first item is the target, or the last one for [`CursorMove::End`].
    pub fn target(&self, from: Option<ItemId>, movement: CursorMove) -> Option<ItemId> {
        let (first, last) = (self.store.id_at(0)?, self.store.last_id()?);
        let Some((from, item)) = from.and_then(|id| self.store.get(id).map(|item| (id, item))) else {
            return Some(if movement == CursorMove::End { last } else { first });
        };

        let target = match movement {
            CursorMove::Home => Some(first),
            CursorMove::End => Some(last),
            CursorMove::PageUp => self.page_step(item, false),
            CursorMove::PageDown => self.page_step(item, true),
            CursorMove::Up | CursorMove::Down | CursorMove::Left | CursorMove::Right => {
                self.step(item, movement)
            }
        };
        let target = target.filter(|id| *id != from);
        tracing::trace!(target: targets::NAVIGATION, ?movement, moved = target.is_some(), "cursor target");
        target
    }

    fn mode(&self) -> LayoutMode {
        self.layout.mode()
    }

    fn rtl(&self) -> bool {
        self.layout.params().direction == TextDirection::RightToLeft
    }

    /// (line number, position in line) in grid terms.
    fn grid_pos(&self, item: &Item) -> (usize, usize) {
        match self.mode() {
            LayoutMode::Rows => (item.row(), item.col()),
            LayoutMode::Columns => (item.col(), item.row()),
        }
    }

    fn cell(&self, line: usize, position: usize) -> Option<ItemId> {
        let index = match self.mode() {
            LayoutMode::Rows => self.layout.index_at_cell(line, position),
            LayoutMode::Columns => self.layout.index_at_cell(position, line),
        }?;
        self.store.id_at(index)
    }

    fn step(&self, item: &Item, movement: CursorMove) -> Option<ItemId> {
        let along_flow = matches!(
            (self.mode(), movement),
            (LayoutMode::Rows, CursorMove::Left | CursorMove::Right)
                | (LayoutMode::Columns, CursorMove::Up | CursorMove::Down)
        );
        let forward = matches!(movement, CursorMove::Right | CursorMove::Down);
        let (line, position) = self.grid_pos(item);

        if along_flow {
            let next = if forward {
                position.checked_add(1)
            } else {
                position.checked_sub(1)
            };
            if let Some(id) = next.and_then(|p| self.cell(line, p)) {
                return Some(id);
            }
            // Continue in list order. Mirrored rows number columns right to left.
            let list_forward = match self.mode() {
                LayoutMode::Rows => forward != self.rtl(),
                LayoutMode::Columns => forward,
            };
            let index = if list_forward {
                item.index().checked_add(1)
            } else {
                item.index().checked_sub(1)
            }?;
            return self.store.id_at(index);
        }

        let next_line = if forward {
            line.checked_add(1)
        } else {
            line.checked_sub(1)
        }?;
        if let Some(id) = self.cell(next_line, position) {
            return Some(id);
        }
        // A shorter line has no cell here: take the list-order neighbour.
        self.layout.line_by_number(next_line)?;
        let index = if forward {
            item.index().checked_add(1)
        } else {
            item.index().checked_sub(1)
        }?;
        self.store.id_at(index)
    }

    /// Leading edge of an item across lines.
    fn cross_coord(&self, item: &Item) -> i32 {
        match self.mode() {
            LayoutMode::Rows => item.bounds().top(),
            LayoutMode::Columns => item.bounds().left(),
        }
    }

    fn page_step(&self, item: &Item, forward: bool) -> Option<ItemId> {
        let (line, position) = self.grid_pos(item);
        let line_count = self.layout.lines().len();
        let page = match self.mode() {
            LayoutMode::Rows => self.page.height,
            LayoutMode::Columns => self.page.width,
        }
        .max(1);
        let start = self.cross_coord(item);

        let lines: Box<dyn Iterator<Item = usize>> = if forward {
            Box::new(line + 1..line_count)
        } else {
            Box::new((0..line).rev())
        };

        let mut best = None;
        for candidate_line in lines {
            let Some(id) = self.cell(candidate_line, position) else {
                continue;
            };
            best = Some(id);
            let Some(candidate) = self.store.get(id) else {
                continue;
            };
            let reached = if forward {
                self.cross_coord(candidate) >= start + page
            } else {
                self.cross_coord(candidate) <= start - page
            };
            if reached {
                break;
            }
        }

        best.or_else(|| {
            let movement = match (self.mode(), forward) {
                (LayoutMode::Rows, true) => CursorMove::Down,
                (LayoutMode::Rows, false) => CursorMove::Up,
                (LayoutMode::Columns, true) => CursorMove::Right,
                (LayoutMode::Columns, false) => CursorMove::Left,
            };
            self.step(item, movement)
        })
    }
}
