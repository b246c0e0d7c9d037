//! Gameplay Samples Engine Library
//!
//! A headless engine core for small gameplay samples. It keeps the state a
//! real engine would hand a game (scene nodes, collision shapes, animation
//! clip timelines, audio sources, recorded draw commands) so that samples can
//! be driven frame by frame and tested without a window or GPU.
//!
//! # Modules
//!
//! - [`game`] - `Game` lifecycle trait, `Engine` context and `GameRunner`
//! - [`input`] - Keyboard, touch, accelerometer and the virtual gamepad
//! - [`scene`] - Node hierarchy, materials, visitors and the JSON scene loader
//! - [`physics`] - Collision queries and the kinematic character
//! - [`animation`] - Clip playback with cross-fades and listeners
//! - [`audio`] - Audio source state
//! - [`render`] - Meshes, models, sprites and draw lists
//! - [`samples`] - The longboard and character sample games
//!
//! # Example
//!
//! ```ignore
//! use gameplay_samples_engine::game::{Engine, GameRunner};
//! use gameplay_samples_engine::samples::longboard::LongboardGame;
//! use gameplay_samples_engine::samples::config::SamplesConfig;
//!
//! let config = SamplesConfig::default();
//! let engine = Engine::new(config.engine.clone());
//! let mut runner = GameRunner::new(engine, LongboardGame::new(config.longboard));
//! runner.initialize()?;
//! runner.run(300, 1.0 / 60.0, |_| Vec::new());
//! runner.finalize();
//! ```

pub mod animation;
pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod physics;
pub mod render;
pub mod resources;
pub mod scene;

// Sample games (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod samples;

pub use config::EngineConfig;
pub use error::EngineError;
pub use game::{Engine, EngineEvent, Game, GameRunner};
pub use input::{InputEvent, KeyCode, KeyEvent, TouchEvent};
pub use resources::Resources;
