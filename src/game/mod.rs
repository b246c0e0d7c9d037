//! Sample Games
//!
//! Games built on the engine core. Each one implements `Game` and is driven
//! by a `GameRunner`, either from its binary or from tests.
//!
//! - [`longboard`] - Accelerometer-steered longboard on an endless road
//! - [`character`] - Third-person character with camera de-occlusion
//! - [`config`] - Tunables for both samples, loaded from JSON

pub mod character;
pub mod config;
pub mod longboard;

pub use character::CharacterGame;
pub use config::SamplesConfig;
pub use longboard::LongboardGame;
