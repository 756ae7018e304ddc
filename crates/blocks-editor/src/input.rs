//! Pointer sampling for paste anchoring.
//!
//! The host input layer feeds pointer events in; paste reads back where
//! the fragment should land. Opening a context menu pins the anchor to the
//! spot that was right-clicked or long-pressed, since the pointer then
//! travels to the menu item.

use blocks_core::geometry::{PointerKind, ScreenPoint};

/// A pointer position and the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: ScreenPoint,
    pub kind: PointerKind,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, kind: PointerKind) -> Self {
        Self {
            position: ScreenPoint::new(x, y),
            kind,
        }
    }
}

/// A normalized pointer event from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved over the canvas.
    Move(PointerSample),
    /// Context menu opened (right click or long press) at this spot.
    ContextMenu(PointerSample),
    /// Context menu dismissed or an item was chosen.
    MenuClosed,
    /// Pointer left the canvas.
    Leave,
}

/// Remembers the last pointer position and any open context-menu anchor.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    last: Option<PointerSample>,
    menu: Option<PointerSample>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Move(sample) => self.last = Some(sample),
            PointerEvent::ContextMenu(sample) => {
                self.menu = Some(sample);
                self.last = Some(sample);
            }
            PointerEvent::MenuClosed => self.menu = None,
            PointerEvent::Leave => self.last = None,
        }
    }

    /// Where a paste issued now should land: the open menu's anchor, else
    /// the last pointer position, else unknown.
    pub fn paste_anchor(&self) -> Option<PointerSample> {
        self.menu.or(self.last)
    }
}
