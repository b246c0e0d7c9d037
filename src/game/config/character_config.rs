//! Character Configuration

use serde::Deserialize;

/// Tuning for the character sample. `Default` matches the shipped sample.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Move speed of the walk clip (m/s)
    pub walk_speed: f32,
    /// Move speed of the run clip (m/s)
    pub run_speed: f32,
    /// Playback speed for movement clips; negated when walking backwards
    pub anim_speed: f32,
    /// Cross-fade between movement clips (milliseconds)
    pub blend_duration_ms: f32,
    /// Distance in front of the camera that must stay visible
    pub focus_distance: f32,
    /// Step used when pulling the camera past an occluder
    pub camera_step: f32,
    /// Stop pulling once the squared distance to the focal point drops to this
    pub min_focus_distance_sq: f32,
    /// Camera-to-character distance below which the character fades
    pub alpha_fade_distance: f32,
    /// Joystick deflection (0..1) at or above which the character runs
    pub run_threshold: f32,
    /// Apex height of a jump (meters)
    pub jump_height: f32,
    /// Fraction of the jump clip after which the character leaves the ground
    pub jump_trigger: f32,
    /// Degrees of turn per pixel of touch drag
    pub touch_rotate_scale: f32,
    /// Radians of turn per frame per unit of horizontal joystick, times pi
    pub joystick_turn: f32,
    /// Height of the blob shadow above the ground
    pub shadow_offset: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            walk_speed: 7.5,
            run_speed: 10.0,
            anim_speed: 1.0,
            blend_duration_ms: 300.0,
            focus_distance: 16.0,
            camera_step: 0.1,
            min_focus_distance_sq: 2.0,
            alpha_fade_distance: 10.0,
            run_threshold: 0.85,
            jump_height: 2.0,
            jump_trigger: 0.3,
            touch_rotate_scale: 0.5,
            joystick_turn: 0.015,
            shadow_offset: 0.1,
        }
    }
}

impl CharacterConfig {
    /// Rejects values the camera rig and movement cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.camera_step.is_finite() && self.camera_step > 0.0) {
            return Err(format!("camera_step must be positive, got {}", self.camera_step));
        }
        if !(self.focus_distance.is_finite() && self.focus_distance > 0.0) {
            return Err(format!(
                "focus_distance must be positive, got {}",
                self.focus_distance
            ));
        }
        if !(self.alpha_fade_distance > 0.0) {
            return Err(format!(
                "alpha_fade_distance must be positive, got {}",
                self.alpha_fade_distance
            ));
        }
        Ok(())
    }
}
