//! Engine Configuration
//!
//! Window size and asset location for a headless run. Deserialized from the
//! `engine` section of the samples config file; every field has a default.

use std::path::PathBuf;

use serde::Deserialize;

/// Settings the engine core needs before a game is initialized.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Virtual screen width in pixels
    pub width: u32,
    /// Virtual screen height in pixels
    pub height: u32,
    /// Directory that resource paths such as `res/scene.json` are resolved against
    pub asset_root: PathBuf,
    /// Fail with `MissingAsset` when a referenced texture, shader, sound or font is absent
    pub verify_assets: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            asset_root: PathBuf::from("."),
            verify_assets: false,
        }
    }
}

impl EngineConfig {
    /// Width over height, as used for camera projections.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
