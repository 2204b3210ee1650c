//! Input events delivered by the host widget.
//!
//! Positions in these events are viewport-local pixels; the view converts them
//! to content space with the current scroll offset.

use horizon_iconview_core::Point;

use super::navigation::CursorMove;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        control: true,
        alt: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }

    /// Check if no modifiers are pressed.
    pub fn none(&self) -> bool {
        !self.any()
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button (scroll wheel click).
    Middle,
}

/// A pointer button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerPress {
    pub button: MouseButton,
    /// Position in viewport-local coordinates.
    pub pos: Point,
    pub modifiers: KeyboardModifiers,
    /// 1 for a single click, 2 for a double click.
    pub click_count: u8,
}

impl PointerPress {
    /// A single click.
    pub fn new(button: MouseButton, pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            button,
            pos,
            modifiers,
            click_count: 1,
        }
    }

    /// A left-button single click without modifiers.
    pub fn left(pos: Point) -> Self {
        Self::new(MouseButton::Left, pos, KeyboardModifiers::NONE)
    }

    pub fn with_click_count(mut self, click_count: u8) -> Self {
        self.click_count = click_count;
        self
    }
}

/// Keys the icon view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Space,
    Enter,
    Escape,
    /// A printable character, lowercase.
    Character(char),
}

impl Key {
    /// The cursor movement bound to this key, if any.
    pub fn cursor_move(self) -> Option<CursorMove> {
        match self {
            Key::ArrowUp => Some(CursorMove::Up),
            Key::ArrowDown => Some(CursorMove::Down),
            Key::ArrowLeft => Some(CursorMove::Left),
            Key::ArrowRight => Some(CursorMove::Right),
            Key::PageUp => Some(CursorMove::PageUp),
            Key::PageDown => Some(CursorMove::PageDown),
            Key::Home => Some(CursorMove::Home),
            Key::End => Some(CursorMove::End),
            _ => None,
        }
    }
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: KeyboardModifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, KeyboardModifiers::NONE)
    }
}
