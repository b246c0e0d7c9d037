//! Keyboard Input Module
//!
//! Generic key codes and press/release events, independent of any windowing system.

/// Generic key codes for the keys the samples react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,
    Space,
    ShiftLeft,
    ShiftRight,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Control keys
    Escape,
    Enter,

    /// Debug draw toggle in the character sample
    B,

    /// Catch-all for unhandled keys
    Unknown,
}

impl KeyCode {
    /// Maps a character (case-insensitive) to a key code.
    ///
    /// Upper and lower case letters produce the same key, so `'W'` and `'w'`
    /// both drive forward movement.
    pub fn from_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'w' => KeyCode::W,
            'a' => KeyCode::A,
            's' => KeyCode::S,
            'd' => KeyCode::D,
            'b' => KeyCode::B,
            ' ' => KeyCode::Space,
            '\u{1b}' => KeyCode::Escape,
            '\n' | '\r' => KeyCode::Enter,
            _ => KeyCode::Unknown,
        }
    }

    pub fn is_shift(self) -> bool {
        matches!(self, KeyCode::ShiftLeft | KeyCode::ShiftRight)
    }
}

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Press,
    Release,
}

/// A single keyboard event delivered to `Game::key_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub state: KeyState,
    pub key: KeyCode,
}

impl KeyEvent {
    pub fn press(key: KeyCode) -> Self {
        Self {
            state: KeyState::Press,
            key,
        }
    }

    pub fn release(key: KeyCode) -> Self {
        Self {
            state: KeyState::Release,
            key,
        }
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }
}
