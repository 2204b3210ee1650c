//! Edge auto-scroll shared by the rubber band and drag-and-drop.
//!
//! The host feeds pointer positions while a gesture is active and calls
//! [`AutoScroller::tick`] from a repeating timer. Each tick scrolls toward
//! the edge the pointer is near, faster the deeper it sits in the margin.

use horizon_iconview_core::logging::targets;
use horizon_iconview_core::{Point, Size};

/// Default edge margin in pixels.
pub const DEFAULT_AUTOSCROLL_MARGIN: i32 = 15;

#[derive(Debug, Clone)]
pub struct AutoScroller {
    margin: i32,
    /// Last pointer position in viewport coordinates.
    pointer: Option<Point>,
    viewport: Size,
}

impl Default for AutoScroller {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSCROLL_MARGIN)
    }
}

impl AutoScroller {
    pub fn new(margin: i32) -> Self {
        Self {
            margin: margin.max(0),
            pointer: None,
            viewport: Size::ZERO,
        }
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.margin = margin.max(0);
    }

    /// Record the pointer position. Returns `true` if it lies in the edge margin.
    pub fn update(&mut self, pointer: Point, viewport: Size) -> bool {
        self.pointer = Some(pointer);
        self.viewport = viewport;
        self.is_active()
    }

    pub fn stop(&mut self) {
        self.pointer = None;
    }

    /// Whether the last pointer position asks for scrolling.
    pub fn is_active(&self) -> bool {
        self.pointer.is_some_and(|p| self.delta(p) != Point::ZERO)
    }

    /// Scroll step for a pointer position, per axis.
    fn delta(&self, pointer: Point) -> Point {
        Point::new(
            edge_step(pointer.x, self.viewport.width, self.margin),
            edge_step(pointer.y, self.viewport.height, self.margin),
        )
    }

    /// The scroll offset after one tick, or `None` when the pointer is out
    /// of the margin or the content cannot scroll further that way.
    pub fn tick(&self, scroll_offset: Point, content: Size) -> Option<Point> {
        let delta = self.delta(self.pointer?);
        if delta == Point::ZERO {
            return None;
        }

        let max_x = (content.width - self.viewport.width).max(0);
        let max_y = (content.height - self.viewport.height).max(0);
        let next = Point::new(
            (scroll_offset.x + delta.x).clamp(0, max_x),
            (scroll_offset.y + delta.y).clamp(0, max_y),
        );
        if next == scroll_offset {
            tracing::trace!(target: targets::AUTOSCROLL, "auto-scroll extent exhausted");
            return None;
        }
        tracing::trace!(target: targets::AUTOSCROLL, dx = next.x - scroll_offset.x, dy = next.y - scroll_offset.y, "auto-scroll tick");
        Some(next)
    }
}

/// Signed step along one axis: negative near the leading edge, positive near
/// the trailing one, proportional to the depth into the margin.
fn edge_step(pos: i32, extent: i32, margin: i32) -> i32 {
    if margin == 0 || extent <= 0 {
        return 0;
    }
    if pos < margin {
        -(margin - pos).clamp(1, margin)
    } else if pos >= extent - margin {
        (pos - (extent - margin) + 1).clamp(1, margin)
    } else {
        0
    }
}
