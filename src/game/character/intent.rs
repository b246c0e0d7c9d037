//! Movement Intent
//!
//! Maps keys, the virtual joystick and the jump button to a set of intent
//! flags plus two signed velocities, and picks the animation clip that
//! matches the intent.
//!
//! Keys on the same axis (W/S, A/D) are last-writer-wins: pressing S while W
//! is held walks backwards, and releasing S goes back to walking forwards.

use glam::Vec2;

use crate::input::{KeyCode, KeyEvent};
use crate::physics::AnimationFlags;

/// Bit set of movement intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MovementIntent(u32);

impl MovementIntent {
    pub const NONE: Self = Self(0);
    pub const FORWARD: Self = Self(1);
    pub const BACKWARD: Self = Self(2);
    pub const STRAFE_LEFT: Self = Self(4);
    pub const STRAFE_RIGHT: Self = Self(8);
    pub const JUMP: Self = Self(16);
    pub const RUN: Self = Self(32);

    const MOVEMENT: u32 = 1 | 2 | 4 | 8;

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Any of the four direction bits.
    pub fn is_moving(self) -> bool {
        self.0 & Self::MOVEMENT != 0
    }
}

impl std::ops::BitOr for MovementIntent {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntentMapper {
    flags: MovementIntent,
    velocity_ns: f32,
    velocity_ew: f32,
    /// Held W/S keys, most recent last
    north_south: Vec<KeyCode>,
    /// Held A/D keys, most recent last
    east_west: Vec<KeyCode>,
    shift_held: bool,
}

impl IntentMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> MovementIntent {
        self.flags
    }

    /// Forward (+) / backward (-) velocity.
    pub fn velocity_ns(&self) -> f32 {
        self.velocity_ns
    }

    /// Left (+) / right (-) velocity.
    pub fn velocity_ew(&self) -> f32 {
        self.velocity_ew
    }

    /// Applies a movement or run key. Returns `false` for keys it ignores.
    pub fn key_event(&mut self, event: KeyEvent) -> bool {
        let pressed = event.is_press();
        match event.key {
            KeyCode::W | KeyCode::S => Self::track(&mut self.north_south, event.key, pressed),
            KeyCode::A | KeyCode::D => Self::track(&mut self.east_west, event.key, pressed),
            key if key.is_shift() => self.shift_held = pressed,
            _ => return false,
        }
        self.apply_keys();
        true
    }

    fn track(held: &mut Vec<KeyCode>, key: KeyCode, pressed: bool) {
        held.retain(|k| *k != key);
        if pressed {
            held.push(key);
        }
    }

    fn apply_keys(&mut self) {
        self.flags.remove(
            MovementIntent::FORWARD
                | MovementIntent::BACKWARD
                | MovementIntent::STRAFE_LEFT
                | MovementIntent::STRAFE_RIGHT
                | MovementIntent::RUN,
        );

        self.velocity_ns = match self.north_south.last() {
            Some(KeyCode::W) => {
                self.flags.insert(MovementIntent::FORWARD);
                1.0
            }
            Some(_) => {
                self.flags.insert(MovementIntent::BACKWARD);
                -1.0
            }
            None => 0.0,
        };
        self.velocity_ew = match self.east_west.last() {
            Some(KeyCode::A) => {
                self.flags.insert(MovementIntent::STRAFE_LEFT);
                1.0
            }
            Some(_) => {
                self.flags.insert(MovementIntent::STRAFE_RIGHT);
                -1.0
            }
            None => 0.0,
        };
        if self.shift_held && self.flags.is_moving() {
            self.flags.insert(MovementIntent::RUN);
        }
    }

    /// Overrides keyboard intent with a non-zero joystick. Returns `false`
    /// (and changes nothing) when the joystick is centered.
    pub fn apply_joystick(&mut self, joystick: Vec2, run_threshold: f32) -> bool {
        if joystick == Vec2::ZERO {
            return false;
        }
        self.north_south.clear();
        self.east_west.clear();
        self.flags = MovementIntent::NONE;
        self.velocity_ns = joystick.y;
        self.velocity_ew = 0.0;
        if joystick.y > 0.0 {
            self.flags.insert(MovementIntent::FORWARD);
        } else if joystick.y < 0.0 {
            self.flags.insert(MovementIntent::BACKWARD);
        }
        if self.flags.is_moving() && joystick.length() >= run_threshold {
            self.flags.insert(MovementIntent::RUN);
        }
        true
    }

    /// Jump button: replaces every other intent.
    pub fn set_jump(&mut self) {
        self.flags = MovementIntent::JUMP;
    }

    /// Drops a pending jump once it has been acted on.
    pub fn clear_jump(&mut self) {
        self.flags.remove(MovementIntent::JUMP);
    }

    /// Forgets all intent, including held keys.
    pub fn reset(&mut self) {
        self.flags = MovementIntent::NONE;
        self.velocity_ns = 0.0;
        self.velocity_ew = 0.0;
        self.north_south.clear();
        self.east_west.clear();
    }
}

/// Character animation matching an intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipChoice {
    Jump,
    Idle,
    Walk { speed: f32 },
    Run { speed: f32 },
}

impl ClipChoice {
    pub fn name(self) -> &'static str {
        match self {
            ClipChoice::Jump => "jump",
            ClipChoice::Idle => "idle",
            ClipChoice::Walk { .. } => "walk",
            ClipChoice::Run { .. } => "run",
        }
    }

    /// Playback speed; negative plays the clip backwards.
    pub fn speed(self) -> f32 {
        match self {
            ClipChoice::Jump | ClipChoice::Idle => 1.0,
            ClipChoice::Walk { speed } | ClipChoice::Run { speed } => speed,
        }
    }

    pub fn flags(self) -> AnimationFlags {
        match self {
            ClipChoice::Jump => AnimationFlags::Resume,
            _ => AnimationFlags::Repeat,
        }
    }
}

/// Picks the clip for `intent`. Strafing decides the playback direction when
/// present, otherwise forward/backward does.
pub fn select_clip(intent: MovementIntent, anim_speed: f32) -> ClipChoice {
    if intent.contains(MovementIntent::JUMP) {
        return ClipChoice::Jump;
    }
    if !intent.is_moving() {
        return ClipChoice::Idle;
    }
    let backwards = if intent.contains(MovementIntent::STRAFE_LEFT) {
        false
    } else if intent.contains(MovementIntent::STRAFE_RIGHT) {
        true
    } else {
        intent.contains(MovementIntent::BACKWARD)
    };
    let speed = if backwards { -anim_speed } else { anim_speed };
    if intent.contains(MovementIntent::RUN) {
        ClipChoice::Run { speed }
    } else {
        ClipChoice::Walk { speed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(mapper: &mut IntentMapper, key: KeyCode) {
        assert!(mapper.key_event(KeyEvent::press(key)));
    }

    fn release(mapper: &mut IntentMapper, key: KeyCode) {
        assert!(mapper.key_event(KeyEvent::release(key)));
    }

    #[test]
    fn test_wasd_sets_flags_and_velocities() {
        let mut m = IntentMapper::new();
        press(&mut m, KeyCode::W);
        press(&mut m, KeyCode::A);
        assert_eq!(m.flags(), MovementIntent::FORWARD | MovementIntent::STRAFE_LEFT);
        assert_eq!((m.velocity_ns(), m.velocity_ew()), (1.0, 1.0));

        release(&mut m, KeyCode::A);
        press(&mut m, KeyCode::D);
        assert_eq!(m.flags(), MovementIntent::FORWARD | MovementIntent::STRAFE_RIGHT);
        assert_eq!(m.velocity_ew(), -1.0);
    }

    #[test]
    fn test_same_axis_last_writer_wins_and_release_restores() {
        let mut m = IntentMapper::new();
        press(&mut m, KeyCode::W);
        press(&mut m, KeyCode::S);
        assert_eq!(m.flags(), MovementIntent::BACKWARD);
        assert_eq!(m.velocity_ns(), -1.0);

        release(&mut m, KeyCode::S);
        assert_eq!(m.flags(), MovementIntent::FORWARD);
        assert_eq!(m.velocity_ns(), 1.0);

        release(&mut m, KeyCode::W);
        assert!(m.flags().is_empty());
        assert_eq!(m.velocity_ns(), 0.0);
    }

    #[test]
    fn test_shift_runs_only_while_moving() {
        let mut m = IntentMapper::new();
        press(&mut m, KeyCode::ShiftLeft);
        assert!(!m.flags().contains(MovementIntent::RUN));
        press(&mut m, KeyCode::W);
        assert!(m.flags().contains(MovementIntent::RUN));
        release(&mut m, KeyCode::ShiftLeft);
        assert_eq!(m.flags(), MovementIntent::FORWARD);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut m = IntentMapper::new();
        assert!(!m.key_event(KeyEvent::press(KeyCode::B)));
        assert!(m.flags().is_empty());
    }

    #[test]
    fn test_joystick_overrides_keys() {
        let mut m = IntentMapper::new();
        press(&mut m, KeyCode::A);
        assert!(m.apply_joystick(Vec2::new(0.3, -0.5), 0.85));
        assert_eq!(m.flags(), MovementIntent::BACKWARD);
        assert_eq!((m.velocity_ns(), m.velocity_ew()), (-0.5, 0.0));

        assert!(m.apply_joystick(Vec2::new(0.0, 0.9), 0.85));
        assert_eq!(m.flags(), MovementIntent::FORWARD | MovementIntent::RUN);
    }

    #[test]
    fn test_centered_joystick_changes_nothing() {
        let mut m = IntentMapper::new();
        press(&mut m, KeyCode::W);
        assert!(!m.apply_joystick(Vec2::ZERO, 0.85));
        assert_eq!(m.flags(), MovementIntent::FORWARD);
    }

    #[test]
    fn test_forward_flag_tracks_latest_northbound_reading() {
        let mut m = IntentMapper::new();
        for y in [0.4, -0.2, 0.7, -0.9, 0.1] {
            m.apply_joystick(Vec2::new(0.0, y), 1.0);
            assert_eq!(m.flags().contains(MovementIntent::FORWARD), y > 0.0);
        }
    }

    #[test]
    fn test_jump_replaces_intent() {
        let mut m = IntentMapper::new();
        press(&mut m, KeyCode::W);
        m.set_jump();
        assert_eq!(m.flags(), MovementIntent::JUMP);
        m.clear_jump();
        assert!(m.flags().is_empty());
    }

    #[test]
    fn test_select_clip() {
        assert_eq!(select_clip(MovementIntent::NONE, 1.0), ClipChoice::Idle);
        assert_eq!(
            select_clip(MovementIntent::JUMP | MovementIntent::FORWARD, 1.0),
            ClipChoice::Jump
        );
        assert_eq!(select_clip(MovementIntent::FORWARD, 1.0), ClipChoice::Walk { speed: 1.0 });
        assert_eq!(select_clip(MovementIntent::BACKWARD, 1.0), ClipChoice::Walk { speed: -1.0 });
        // strafing decides direction
        assert_eq!(
            select_clip(MovementIntent::BACKWARD | MovementIntent::STRAFE_LEFT, 1.0),
            ClipChoice::Walk { speed: 1.0 }
        );
        assert_eq!(
            select_clip(MovementIntent::FORWARD | MovementIntent::STRAFE_RIGHT, 2.0),
            ClipChoice::Walk { speed: -2.0 }
        );
        assert_eq!(
            select_clip(MovementIntent::FORWARD | MovementIntent::RUN, 1.0),
            ClipChoice::Run { speed: 1.0 }
        );
        assert_eq!(ClipChoice::Jump.flags(), AnimationFlags::Resume);
        assert_eq!(ClipChoice::Idle.flags(), AnimationFlags::Repeat);
    }
}
