//! Physics Module
//!
//! Lightweight collision world for scene nodes. No external physics library:
//! shapes are axis-aligned boxes, spheres and upright capsules, and the only
//! simulated bodies are kinematic characters.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//!
//! # Submodules
//!
//! - [`collision`] - Ray and closest-point tests against world-space shapes
//! - [`character`] - Character controller state and movement animations
//! - [`world`] - Collision objects, queries, stepping and contact events

pub mod character;
pub mod collision;
pub mod world;

pub use character::{AnimationFlags, PhysicsCharacter};
pub use collision::WorldShape;
pub use world::{
    CollisionEvent, CollisionEventKind, CollisionObject, CollisionObjectId, CollisionObjectType,
    CollisionShape, HitResult, PhysicsWorld,
};
