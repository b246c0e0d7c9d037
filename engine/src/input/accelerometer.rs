//! Accelerometer Input Module
//!
//! Device tilt expressed as pitch and roll in degrees.

/// Latest tilt reading. Positive pitch tilts the top of the device away from the user.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelerometerReading {
    /// Pitch in degrees
    pub pitch: f32,
    /// Roll in degrees
    pub roll: f32,
}

impl AccelerometerReading {
    pub fn new(pitch: f32, roll: f32) -> Self {
        Self { pitch, roll }
    }

    /// Returns the reading with pitch clamped to `[pitch_min, pitch_max]`
    /// and roll clamped to `[-roll_max, roll_max]`.
    pub fn clamped(&self, pitch_min: f32, pitch_max: f32, roll_max: f32) -> Self {
        Self {
            pitch: self.pitch.clamp(pitch_min, pitch_max),
            roll: self.roll.clamp(-roll_max, roll_max),
        }
    }
}
