//! Input Module
//!
//! Platform-agnostic input: keyboard, touch, accelerometer tilt and the
//! touch-driven virtual gamepad. Drivers queue `InputEvent`s on the game
//! runner, which forwards them to the game before each update.
//!
//! # Example
//!
//! ```rust,ignore
//! use gameplay_samples_engine::input::{InputEvent, KeyCode, KeyEvent, TouchEvent};
//!
//! runner.queue_input(InputEvent::Key(KeyEvent::press(KeyCode::W)));
//! runner.queue_input(InputEvent::Touch(TouchEvent::press(140, 610, 0)));
//! ```

pub mod accelerometer;
pub mod gamepad;
pub mod keyboard;
pub mod touch;

pub use accelerometer::AccelerometerReading;
pub use gamepad::{ButtonLayout, ButtonState, Gamepad, GamepadLayout, JoystickLayout};
pub use keyboard::{KeyCode, KeyEvent, KeyState};
pub use touch::{TouchEvent, TouchKind};

/// Any input a driver can feed into a running game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Touch(TouchEvent),
    /// Replaces the current accelerometer reading
    Accelerometer(AccelerometerReading),
}
