//! Config Module
//!
//! Tuning for both samples plus the engine settings, read from one JSON file.
//! Every section and field is optional; missing values keep their defaults.
//!
//! ```json
//! {
//!   "engine": { "width": 1920, "height": 1080, "asset_root": "." },
//!   "longboard": { "velocity_max": 6.0, "uv_wrap": "reflect" },
//!   "character": { "blend_duration_ms": 150 }
//! }
//! ```

pub mod character_config;
pub mod longboard_config;

pub use character_config::CharacterConfig;
pub use longboard_config::LongboardConfig;

use std::path::Path;

use serde::Deserialize;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Environment variable naming an optional config file.
pub const CONFIG_ENV: &str = "SAMPLES_CONFIG";

/// Environment variable overriding `engine.asset_root`.
pub const ASSET_ROOT_ENV: &str = "SAMPLES_ASSET_ROOT";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SamplesConfig {
    pub engine: EngineConfig,
    pub longboard: LongboardConfig,
    pub character: CharacterConfig,
}

impl SamplesConfig {
    /// Reads a config file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        if !path.exists() {
            return Err(EngineError::MissingAsset(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|source| EngineError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses and validates a config document.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(text)?;
        config
            .character
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(config)
    }

    /// Loads the file named by `SAMPLES_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, EngineError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let config = Self::load(Path::new(&path))?;
                log::info!("[Config] loaded {}", Path::new(&path).display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Applies `SAMPLES_ASSET_ROOT` when set. Otherwise a root without a
    /// `res/` directory is replaced by `fallback`.
    pub fn resolve_asset_root(&mut self, fallback: &Path) {
        if let Some(root) = std::env::var_os(ASSET_ROOT_ENV) {
            self.engine.asset_root = root.into();
        } else if !self.engine.asset_root.join("res").is_dir() {
            log::debug!(
                "[Config] no res/ under {}, using {}",
                self.engine.asset_root.display(),
                fallback.display()
            );
            self.engine.asset_root = fallback.to_path_buf();
        }
    }
}
