//! Touch Input Module
//!
//! Screen-space touch events with a contact index, so several fingers can be
//! tracked at once (one on the joystick, one dragging the view).

/// Phase of a touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Press,
    Release,
    Move,
}

/// A touch event in screen pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub kind: TouchKind,
    pub x: i32,
    pub y: i32,
    /// Identifies the finger across press, move and release
    pub contact: u32,
}

impl TouchEvent {
    pub fn press(x: i32, y: i32, contact: u32) -> Self {
        Self {
            kind: TouchKind::Press,
            x,
            y,
            contact,
        }
    }

    pub fn moved(x: i32, y: i32, contact: u32) -> Self {
        Self {
            kind: TouchKind::Move,
            x,
            y,
            contact,
        }
    }

    pub fn release(x: i32, y: i32, contact: u32) -> Self {
        Self {
            kind: TouchKind::Release,
            x,
            y,
            contact,
        }
    }
}
