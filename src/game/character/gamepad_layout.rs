//! On-screen controls of the character sample: one joystick at the bottom
//! left and a jump button at the bottom right, sized for a 720 pixel tall
//! screen and scaled to the actual height.

use crate::input::{ButtonLayout, GamepadLayout, JoystickLayout};
use crate::render::Rect;

pub const GAMEPAD_TEXTURE: &str = "res/gamepad.png";
pub const JOYSTICK: usize = 0;
pub const JUMP_BUTTON: usize = 0;

const REFERENCE_HEIGHT: f32 = 720.0;

const THUMB_SIZE: f32 = 47.0;
const THUMB_TEX: (f32, f32) = (10.0, 188.0);
const THUMB_SCREEN: (f32, f32) = (120.0, 130.0);

const DOCK_SIZE: f32 = 170.0;
const DOCK_TEX: (f32, f32) = (0.0, 0.0);
const DOCK_SCREEN: (f32, f32) = (48.0, 191.0);

const BUTTON_SIZE: f32 = 47.0;
const BUTTON_PRESSED_TEX: (f32, f32) = (69.0, 188.0);
const BUTTON_RELEASED_TEX: (f32, f32) = (10.0, 188.0);
/// Offsets from the right and bottom screen edges
const BUTTON_SCREEN: (f32, f32) = (120.0, 130.0);

pub const JOYSTICK_RADIUS: f32 = 45.0;

/// Layout for a `width` x `height` screen. Screen-space offsets are measured
/// from the bottom edge (and the right edge for the button).
pub fn character_gamepad_layout(width: u32, height: u32) -> GamepadLayout {
    let w = width as f32;
    let h = height as f32;
    let scale = h / REFERENCE_HEIGHT;

    let joystick = JoystickLayout {
        thumb_screen: Rect::new(
            THUMB_SCREEN.0 * scale,
            h - THUMB_SCREEN.1 * scale,
            THUMB_SIZE * scale,
            THUMB_SIZE * scale,
        ),
        thumb_tex: Rect::new(THUMB_TEX.0, THUMB_TEX.1, THUMB_SIZE, THUMB_SIZE),
        dock_screen: Rect::new(
            DOCK_SCREEN.0 * scale,
            h - DOCK_SCREEN.1 * scale,
            DOCK_SIZE * scale,
            DOCK_SIZE * scale,
        ),
        dock_tex: Rect::new(DOCK_TEX.0, DOCK_TEX.1, DOCK_SIZE, DOCK_SIZE),
        radius: JOYSTICK_RADIUS,
    };

    let button = ButtonLayout {
        screen: Rect::new(
            w - scale * (BUTTON_SCREEN.0 + BUTTON_SIZE),
            h - BUTTON_SCREEN.1 * scale,
            BUTTON_SIZE * scale,
            BUTTON_SIZE * scale,
        ),
        released_tex: Rect::new(
            BUTTON_RELEASED_TEX.0,
            BUTTON_RELEASED_TEX.1,
            BUTTON_SIZE,
            BUTTON_SIZE,
        ),
        pressed_tex: Rect::new(
            BUTTON_PRESSED_TEX.0,
            BUTTON_PRESSED_TEX.1,
            BUTTON_SIZE,
            BUTTON_SIZE,
        ),
    };

    GamepadLayout {
        texture: GAMEPAD_TEXTURE.to_string(),
        joysticks: vec![joystick],
        buttons: vec![button],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_resolution_regions() {
        let layout = character_gamepad_layout(1280, 720);
        let stick = &layout.joysticks[JOYSTICK];
        assert_eq!(stick.thumb_screen, Rect::new(120.0, 590.0, 47.0, 47.0));
        assert_eq!(stick.dock_screen, Rect::new(48.0, 529.0, 170.0, 170.0));
        assert_eq!(layout.buttons[JUMP_BUTTON].screen, Rect::new(1113.0, 590.0, 47.0, 47.0));
    }

    #[test]
    fn test_scales_with_height() {
        let layout = character_gamepad_layout(1920, 1080);
        let stick = &layout.joysticks[JOYSTICK];
        assert_eq!(stick.dock_screen, Rect::new(72.0, 793.5, 255.0, 255.0));
        // texture regions never scale
        assert_eq!(stick.dock_tex, Rect::new(0.0, 0.0, 170.0, 170.0));
        assert_eq!(stick.radius, JOYSTICK_RADIUS);
    }
}
