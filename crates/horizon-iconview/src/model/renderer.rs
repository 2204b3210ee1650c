//! The cell renderer capability consumed by the engine.
//!
//! The engine never paints. It asks a [`CellRenderer`] how large each item
//! wants to be, which sub-region of a cell lies under a point, and hands it
//! the final geometry when the host asks for a paint pass.

use horizon_iconview_core::{Point, Rect, Size};

use super::item::ItemId;
use crate::view::{IconViewConfig, TextDirection};

/// Visual state of one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellState {
    /// The item is selected.
    pub selected: bool,
    /// The item is the keyboard cursor.
    pub cursor: bool,
    /// The pointer hovers over the item.
    pub prelit: bool,
    /// The item is the current drop destination.
    pub drop_highlight: bool,
}

impl CellState {
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_prelit(mut self, prelit: bool) -> Self {
        self.prelit = prelit;
        self
    }

    pub fn with_drop_highlight(mut self, drop_highlight: bool) -> Self {
        self.drop_highlight = drop_highlight;
        self
    }
}

/// Style values shared by every cell of a view.
///
/// Derived once from the view configuration and passed down with each
/// [`CellOption`], so renderers never consult global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    /// Icon edge length for the current zoom level.
    pub icon_size: i32,
    /// Label wrap width for the current zoom level.
    pub wrap_width: i32,
    /// Spacing between the icon and the label.
    pub spacing: i32,
    /// Padding the engine adds around the preferred size.
    pub item_padding: i32,
    pub direction: TextDirection,
}

impl CellStyle {
    pub fn from_config(config: &IconViewConfig) -> Self {
        Self {
            icon_size: config.zoom_level.icon_size(),
            wrap_width: config.zoom_level.wrap_width(),
            spacing: config.spacing,
            item_padding: config.item_padding,
            direction: config.text_direction,
        }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::from_config(&IconViewConfig::default())
    }
}

/// Everything a renderer needs to measure, paint or hit-test one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellOption {
    /// Position of the item in the store.
    pub index: usize,
    /// Handle of the item.
    pub id: ItemId,
    /// The cell rectangle in content space. Zero while measuring.
    pub rect: Rect,
    pub state: CellState,
    pub style: CellStyle,
}

/// A distinct region within a rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubCell {
    /// The icon glyph.
    Icon,
    /// The text label.
    Label,
    /// A selection toggle emblem drawn over the icon.
    SelectionToggle,
    /// Anywhere else inside the cell.
    Item,
}

/// Measures and paints item cells on behalf of the engine.
pub trait CellRenderer: Send + Sync {
    /// Preferred size of the cell content, without item padding.
    fn preferred_size(&self, option: &CellOption) -> Size;

    /// Paint the cell at `option.rect`.
    fn paint(&self, option: &CellOption);

    /// Which sub-cell lies under `pos` (content coordinates), if any.
    ///
    /// The default treats the whole cell rectangle as [`SubCell::Item`].
    fn hit_subcell(&self, option: &CellOption, pos: Point) -> Option<SubCell> {
        option.rect.contains(pos).then_some(SubCell::Item)
    }
}

/// A renderer that gives every item the same size.
///
/// The cell is split into an icon square at the top (centered, sized by the
/// zoom level) and a label area below it. When `toggle_size` is non-zero the
/// icon's leading corner carries a selection toggle. Painting is left to the
/// host; this renderer only measures and hit-tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSizeRenderer {
    size: Size,
    toggle_size: i32,
}

impl FixedSizeRenderer {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: Size::new(width, height),
            toggle_size: 0,
        }
    }

    /// Enable a selection toggle of the given edge length.
    pub fn with_selection_toggle(mut self, toggle_size: i32) -> Self {
        self.toggle_size = toggle_size.max(0);
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    fn icon_rect(&self, option: &CellOption) -> Rect {
        let content = option
            .rect
            .inflate(-option.style.item_padding, -option.style.item_padding);
        let edge = option.style.icon_size.min(content.width()).min(content.height()).max(0);
        Rect::new(
            content.left() + (content.width() - edge) / 2,
            content.top(),
            edge,
            edge,
        )
    }
}

impl CellRenderer for FixedSizeRenderer {
    fn preferred_size(&self, _option: &CellOption) -> Size {
        self.size
    }

    fn paint(&self, _option: &CellOption) {}

    fn hit_subcell(&self, option: &CellOption, pos: Point) -> Option<SubCell> {
        if !option.rect.contains(pos) {
            return None;
        }

        let icon = self.icon_rect(option);
        if self.toggle_size > 0 {
            let toggle_x = match option.style.direction {
                TextDirection::LeftToRight => icon.left(),
                TextDirection::RightToLeft => icon.right() - self.toggle_size,
            };
            let toggle = Rect::new(toggle_x, icon.top(), self.toggle_size, self.toggle_size);
            if toggle.contains(pos) {
                return Some(SubCell::SelectionToggle);
            }
        }
        if icon.contains(pos) {
            return Some(SubCell::Icon);
        }
        if pos.y >= icon.bottom() {
            return Some(SubCell::Label);
        }
        Some(SubCell::Item)
    }
}

static_assertions::assert_impl_all!(FixedSizeRenderer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn option(rect: Rect) -> CellOption {
        CellOption {
            index: 0,
            id: ItemId::from(KeyData::from_ffi(1)),
            rect,
            state: CellState::default(),
            style: CellStyle {
                icon_size: 32,
                wrap_width: 64,
                spacing: 0,
                item_padding: 0,
                direction: TextDirection::LeftToRight,
            },
        }
    }

    #[test]
    fn test_fixed_size() {
        let renderer = FixedSizeRenderer::new(48, 64);
        assert_eq!(renderer.preferred_size(&option(Rect::ZERO)), Size::new(48, 64));
    }

    #[test]
    fn test_hit_subcell_regions() {
        let renderer = FixedSizeRenderer::new(48, 64).with_selection_toggle(8);
        let opt = option(Rect::new(0, 0, 48, 64));

        // Icon is 32x32 centered horizontally at the top: x in 8..40.
        assert_eq!(renderer.hit_subcell(&opt, Point::new(9, 2)), Some(SubCell::SelectionToggle));
        assert_eq!(renderer.hit_subcell(&opt, Point::new(24, 16)), Some(SubCell::Icon));
        assert_eq!(renderer.hit_subcell(&opt, Point::new(24, 50)), Some(SubCell::Label));
        assert_eq!(renderer.hit_subcell(&opt, Point::new(2, 10)), Some(SubCell::Item));
        assert_eq!(renderer.hit_subcell(&opt, Point::new(60, 10)), None);
    }

    #[test]
    fn test_toggle_mirrors_for_rtl() {
        let renderer = FixedSizeRenderer::new(48, 64).with_selection_toggle(8);
        let mut opt = option(Rect::new(0, 0, 48, 64));
        opt.style.direction = TextDirection::RightToLeft;

        assert_eq!(renderer.hit_subcell(&opt, Point::new(38, 2)), Some(SubCell::SelectionToggle));
        assert_eq!(renderer.hit_subcell(&opt, Point::new(9, 2)), Some(SubCell::Icon));
    }

    #[test]
    fn test_cell_state_builders() {
        let state = CellState::default().with_selected(true).with_prelit(true);
        assert!(state.selected);
        assert!(state.prelit);
        assert!(!state.cursor);
        assert!(!state.drop_highlight);
    }
}
