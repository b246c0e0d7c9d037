//! Board Kinematics
//!
//! Turns a tilt reading into throttle, speed and heading. The board itself
//! never moves: the ground is rotated under it and its texture scrolled, so
//! all state here describes the ground relative to the board.

use glam::{Mat4, Vec2, Vec3};
use serde::Deserialize;

use crate::input::AccelerometerReading;
use crate::samples::config::LongboardConfig;

/// How the ground texture offset is kept within one texture repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvWrap {
    /// Wrap into [0, 1)
    #[default]
    Modulo,
    /// `x >= 1` becomes `1 - x`; the offset jumps backwards and may go negative
    Reflect,
}

impl UvWrap {
    pub fn apply(self, value: f32) -> f32 {
        match self {
            UvWrap::Modulo => value.rem_euclid(1.0),
            UvWrap::Reflect if value >= 1.0 => 1.0 - value,
            UvWrap::Reflect => value,
        }
    }
}

/// Throttle in [0, 1] for a pitch in degrees: 1 at `pitch_min`, 0 at `pitch_max`.
pub fn throttle(config: &LongboardConfig, pitch: f32) -> f32 {
    let range = config.pitch_max - config.pitch_min;
    if range <= 0.0 {
        return 0.0;
    }
    let pitch = pitch.clamp(config.pitch_min, config.pitch_max);
    1.0 - (pitch - config.pitch_min) / range
}

/// Result of one kinematic step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardStep {
    pub throttle: f32,
    /// Roll after clamping, in degrees
    pub roll: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardKinematics {
    speed: f32,
    direction: Vec3,
    ground_world: Mat4,
    uv_offset: Vec2,
}

impl BoardKinematics {
    pub fn new(config: &LongboardConfig) -> Self {
        Self {
            speed: config.velocity_min,
            direction: Vec3::NEG_Z,
            ground_world: Mat4::IDENTITY,
            uv_offset: Vec2::ZERO,
        }
    }

    /// Current speed (m/s).
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Unit heading in the ground plane.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn ground_world(&self) -> Mat4 {
        self.ground_world
    }

    pub fn uv_offset(&self) -> Vec2 {
        self.uv_offset
    }

    /// Advances by `dt` seconds under the given tilt.
    pub fn step(
        &mut self,
        config: &LongboardConfig,
        reading: AccelerometerReading,
        dt: f32,
    ) -> BoardStep {
        let tilt = reading.clamped(config.pitch_min, config.pitch_max, config.roll_max);
        let throttle = throttle(config, tilt.pitch);

        self.speed = config.velocity_min + (config.velocity_max - config.velocity_min) * throttle;

        let steer = if config.roll_max > 0.0 {
            tilt.roll / config.roll_max
        } else {
            0.0
        };
        let turn_degrees = config.turn_rate_max * dt * steer * throttle;
        let rotation = Mat4::from_rotation_y(-turn_degrees.to_radians());
        self.direction = rotation
            .transform_vector3(self.direction)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        self.ground_world = rotation * self.ground_world;

        let travel = self.speed * dt;
        self.uv_offset.x = config.uv_wrap.apply(self.uv_offset.x - self.direction.x * travel);
        self.uv_offset.y = config.uv_wrap.apply(self.uv_offset.y - self.direction.z * travel);

        BoardStep {
            throttle,
            roll: tilt.roll,
        }
    }
}

/// Wheels world matrix for a roll in degrees.
pub fn wheels_world(config: &LongboardConfig, roll: f32) -> Mat4 {
    let steer = if config.roll_max > 0.0 { roll / config.roll_max } else { 0.0 };
    Mat4::from_scale(Vec3::splat(1.2))
        * Mat4::from_translation(Vec3::new(-steer * 0.05, 0.0, 0.05))
        * Mat4::from_rotation_y((roll * 0.45).to_radians())
}

/// Board world matrix for a roll in degrees.
pub fn board_world(roll: f32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(1.25))
        * Mat4::from_translation(Vec3::new(0.0, 0.0, 0.65))
        * Mat4::from_rotation_z((roll * 0.5).to_radians())
        * Mat4::from_rotation_y((roll * 0.1).to_radians())
}
