#![forbid(unsafe_code)]

//! Raw pointer/keyboard input consumed by the drag gesture recognizer.
//!
//! Only the subset of terminal input that can start, steer, or abort a drag
//! is modelled here. Hosts translate their native events into these before
//! handing them to [`crate::gesture::DragGestureRecognizer`].

use crate::geometry::Position;

/// Input relevant to drag sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A mouse event.
    Mouse(MouseEvent),

    /// A key press. Only `Escape` affects drags.
    Key(KeyCode),

    /// Focus gained (`true`) or lost (`false`).
    Focus(bool),
}

/// Key codes the recognizer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    /// Any other key. Never affects a drag.
    Other,
}

/// A mouse event in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// The type of mouse event.
    pub kind: MouseEventKind,

    /// X coordinate (0-indexed).
    pub x: u16,

    /// Y coordinate (0-indexed).
    pub y: u16,
}

impl MouseEvent {
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self { kind, x, y }
    }

    /// Pointer location.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// The type of mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Mouse button pressed down.
    Down(MouseButton),

    /// Mouse button released.
    Up(MouseButton),

    /// Mouse moved while a button is held.
    Drag(MouseButton),

    /// Mouse moved with no button pressed.
    Moved,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}
