//! Item records, the item store, selection state and the renderer seam.

mod item;
mod renderer;
mod selection;
mod store;

pub use item::{Item, ItemId};
pub use renderer::{CellOption, CellRenderer, CellState, CellStyle, FixedSizeRenderer, SubCell};
pub use selection::{RangePolicy, SelectionMode, SelectionState};
pub use store::{ItemStore, StoreSignals};
