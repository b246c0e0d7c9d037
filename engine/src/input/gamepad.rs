//! Virtual Gamepad
//!
//! On-screen joysticks and buttons driven by touch contacts. Each control
//! claims the contact that pressed inside it and follows that contact until it
//! is released, so a second finger elsewhere on screen is left to the game.
//!
//! # Example
//!
//! ```ignore
//! use gameplay_samples_engine::input::{Gamepad, GamepadLayout, TouchEvent};
//!
//! let mut gamepad = Gamepad::new(layout);
//! if !gamepad.touch_event(&TouchEvent::press(150, 600, 0)) {
//!     // touch landed outside every control
//! }
//! let stick = gamepad.joystick_state(0);
//! ```

use glam::{Vec2, Vec4};

use super::touch::{TouchEvent, TouchKind};
use crate::render::{DrawList, Rect, SpriteBatch};

/// Screen and texture regions of one joystick.
#[derive(Debug, Clone, PartialEq)]
pub struct JoystickLayout {
    /// Thumb rest position on screen
    pub thumb_screen: Rect,
    /// Thumb sprite in the gamepad texture
    pub thumb_tex: Rect,
    /// Dock on screen; presses inside it grab the joystick
    pub dock_screen: Rect,
    pub dock_tex: Rect,
    /// Maximum thumb travel in pixels
    pub radius: f32,
}

/// Screen and texture regions of one button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLayout {
    pub screen: Rect,
    pub released_tex: Rect,
    pub pressed_tex: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GamepadLayout {
    /// Texture atlas holding every control sprite
    pub texture: String,
    pub joysticks: Vec<JoystickLayout>,
    pub buttons: Vec<ButtonLayout>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
}

#[derive(Debug, Clone)]
struct Joystick {
    layout: JoystickLayout,
    contact: Option<u32>,
    /// Thumb displacement in pixels, screen orientation (y down)
    displacement: Vec2,
}

impl Joystick {
    fn rest(&self) -> Vec2 {
        let (x, y) = self.layout.thumb_screen.center();
        Vec2::new(x, y)
    }

    fn track(&mut self, x: i32, y: i32) {
        let mut delta = Vec2::new(x as f32, y as f32) - self.rest();
        if delta.length() > self.layout.radius {
            delta = delta.normalize() * self.layout.radius;
        }
        self.displacement = delta;
    }

    /// Normalized value with y pointing up, length at most 1.
    fn value(&self) -> Vec2 {
        if self.layout.radius <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.displacement.x, -self.displacement.y) / self.layout.radius
    }
}

#[derive(Debug, Clone)]
struct Button {
    layout: ButtonLayout,
    contact: Option<u32>,
}

/// Touch-driven joysticks and buttons.
#[derive(Debug, Clone)]
pub struct Gamepad {
    texture: String,
    joysticks: Vec<Joystick>,
    buttons: Vec<Button>,
}

impl Gamepad {
    pub fn new(layout: GamepadLayout) -> Self {
        Self {
            texture: layout.texture,
            joysticks: layout
                .joysticks
                .into_iter()
                .map(|layout| Joystick {
                    layout,
                    contact: None,
                    displacement: Vec2::ZERO,
                })
                .collect(),
            buttons: layout
                .buttons
                .into_iter()
                .map(|layout| Button {
                    layout,
                    contact: None,
                })
                .collect(),
        }
    }

    /// Routes a touch to the controls. Returns `true` if a control consumed it.
    pub fn touch_event(&mut self, event: &TouchEvent) -> bool {
        let (fx, fy) = (event.x as f32, event.y as f32);
        let mut consumed = false;

        for stick in &mut self.joysticks {
            match event.kind {
                TouchKind::Press => {
                    if stick.contact.is_none() && stick.layout.dock_screen.contains(fx, fy) {
                        stick.contact = Some(event.contact);
                        stick.track(event.x, event.y);
                        consumed = true;
                    }
                }
                TouchKind::Move => {
                    if stick.contact == Some(event.contact) {
                        stick.track(event.x, event.y);
                        consumed = true;
                    }
                }
                TouchKind::Release => {
                    if stick.contact == Some(event.contact) {
                        stick.contact = None;
                        stick.displacement = Vec2::ZERO;
                        consumed = true;
                    }
                }
            }
            if consumed {
                return true;
            }
        }

        for button in &mut self.buttons {
            match event.kind {
                TouchKind::Press => {
                    if button.contact.is_none() && button.layout.screen.contains(fx, fy) {
                        button.contact = Some(event.contact);
                        return true;
                    }
                }
                TouchKind::Move => {
                    if button.contact == Some(event.contact) {
                        return true;
                    }
                }
                TouchKind::Release => {
                    if button.contact == Some(event.contact) {
                        button.contact = None;
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Joystick value in [-1, 1] per axis, y up. Zero for unknown indices.
    pub fn joystick_state(&self, index: usize) -> Vec2 {
        self.joysticks.get(index).map_or(Vec2::ZERO, Joystick::value)
    }

    pub fn is_joystick_active(&self, index: usize) -> bool {
        self.joysticks
            .get(index)
            .is_some_and(|stick| stick.contact.is_some())
    }

    pub fn button_state(&self, index: usize) -> ButtonState {
        match self.buttons.get(index) {
            Some(button) if button.contact.is_some() => ButtonState::Pressed,
            _ => ButtonState::Released,
        }
    }

    /// Appends the control sprites to the frame.
    pub fn draw(&self, frame: &mut DrawList) {
        let mut batch = SpriteBatch::new(&self.texture);
        for stick in &self.joysticks {
            batch.draw(stick.layout.dock_screen, stick.layout.dock_tex, Vec4::ONE);
            let thumb = stick.layout.thumb_screen;
            let dst = Rect::new(
                thumb.x + stick.displacement.x,
                thumb.y + stick.displacement.y,
                thumb.width,
                thumb.height,
            );
            batch.draw(dst, stick.layout.thumb_tex, Vec4::ONE);
        }
        for button in &self.buttons {
            let src = if button.contact.is_some() {
                button.layout.pressed_tex
            } else {
                button.layout.released_tex
            };
            batch.draw(button.layout.screen, src, Vec4::ONE);
        }
        if !batch.is_empty() {
            frame.push(batch.finish());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawCommand;

    fn layout() -> GamepadLayout {
        GamepadLayout {
            texture: "res/gamepad.png".to_string(),
            joysticks: vec![JoystickLayout {
                thumb_screen: Rect::centered(100.0, 500.0, 40.0, 40.0),
                thumb_tex: Rect::new(10.0, 188.0, 47.0, 47.0),
                dock_screen: Rect::centered(100.0, 500.0, 160.0, 160.0),
                dock_tex: Rect::new(0.0, 0.0, 170.0, 170.0),
                radius: 50.0,
            }],
            buttons: vec![ButtonLayout {
                screen: Rect::new(1000.0, 500.0, 50.0, 50.0),
                released_tex: Rect::new(10.0, 188.0, 47.0, 47.0),
                pressed_tex: Rect::new(69.0, 188.0, 47.0, 47.0),
            }],
        }
    }

    #[test]
    fn test_joystick_press_up_gives_positive_y() {
        let mut pad = Gamepad::new(layout());
        assert!(pad.touch_event(&TouchEvent::press(100, 475, 0)));
        assert!(pad.is_joystick_active(0));
        let value = pad.joystick_state(0);
        assert!(value.x.abs() < 1e-6);
        assert!((value.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_joystick_value_is_clamped_to_unit_length() {
        let mut pad = Gamepad::new(layout());
        pad.touch_event(&TouchEvent::press(100, 500, 3));
        pad.touch_event(&TouchEvent::moved(400, 500, 3));
        let value = pad.joystick_state(0);
        assert!((value.length() - 1.0).abs() < 1e-5);
        assert!(value.x > 0.99);
    }

    #[test]
    fn test_joystick_release_resets() {
        let mut pad = Gamepad::new(layout());
        pad.touch_event(&TouchEvent::press(120, 500, 1));
        assert!(pad.touch_event(&TouchEvent::release(120, 500, 1)));
        assert!(!pad.is_joystick_active(0));
        assert_eq!(pad.joystick_state(0), Vec2::ZERO);
    }

    #[test]
    fn test_other_contact_does_not_move_joystick() {
        let mut pad = Gamepad::new(layout());
        pad.touch_event(&TouchEvent::press(100, 500, 0));
        assert!(!pad.touch_event(&TouchEvent::moved(140, 500, 7)));
        assert_eq!(pad.joystick_state(0), Vec2::ZERO);
    }

    #[test]
    fn test_button_press_and_release() {
        let mut pad = Gamepad::new(layout());
        assert_eq!(pad.button_state(0), ButtonState::Released);
        assert!(pad.touch_event(&TouchEvent::press(1020, 520, 2)));
        assert_eq!(pad.button_state(0), ButtonState::Pressed);
        assert!(pad.touch_event(&TouchEvent::release(1020, 520, 2)));
        assert_eq!(pad.button_state(0), ButtonState::Released);
    }

    #[test]
    fn test_touch_outside_controls_is_not_consumed() {
        let mut pad = Gamepad::new(layout());
        assert!(!pad.touch_event(&TouchEvent::press(640, 100, 0)));
        assert!(!pad.is_joystick_active(0));
    }

    #[test]
    fn test_draw_uses_pressed_region_while_held() {
        let mut pad = Gamepad::new(layout());
        pad.touch_event(&TouchEvent::press(1020, 520, 0));
        let mut frame = DrawList::new();
        pad.draw(&mut frame);
        match &frame.commands()[0] {
            DrawCommand::Sprites { texture, sprites } => {
                assert_eq!(texture, "res/gamepad.png");
                assert_eq!(sprites.len(), 3);
                assert_eq!(sprites[2].src, Rect::new(69.0, 188.0, 47.0, 47.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
