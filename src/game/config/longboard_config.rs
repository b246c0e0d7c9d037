//! Longboard Configuration
//!
//! Tilt ranges and speed limits of the longboard sample.

use serde::Deserialize;

use crate::samples::longboard::UvWrap;

/// Tuning for the longboard sample. `Default` matches the shipped sample.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LongboardConfig {
    /// Pitch (degrees) at which the board is at full throttle
    pub pitch_min: f32,
    /// Pitch (degrees) at which the board is idle
    pub pitch_max: f32,
    /// Largest roll (degrees) that still steers harder
    pub roll_max: f32,
    /// Speed at zero throttle (m/s)
    pub velocity_min: f32,
    /// Speed at full throttle (m/s)
    pub velocity_max: f32,
    /// Turn rate at full roll and full throttle (degrees per second)
    pub turn_rate_max: f32,
    /// Half extent of the ground quad (meters)
    pub world_size: f32,
    /// How the ground texture offset is kept in range
    pub uv_wrap: UvWrap,
}

impl Default for LongboardConfig {
    fn default() -> Self {
        Self {
            pitch_min: 20.0,
            pitch_max: 70.0,
            roll_max: 40.0,
            velocity_min: 0.2,
            velocity_max: 4.0,
            turn_rate_max: 90.0,
            world_size: 20.0,
            uv_wrap: UvWrap::Modulo,
        }
    }
}
