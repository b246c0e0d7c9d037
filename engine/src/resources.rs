//! Resource Paths
//!
//! Resolves sample resource paths (`res/...`) against the configured asset
//! root and reads the JSON descriptions the engine understands.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::EngineError;

/// Asset root plus the verification policy for binary assets.
#[derive(Clone, Debug)]
pub struct Resources {
    root: PathBuf,
    verify: bool,
}

impl Resources {
    pub fn new(root: impl Into<PathBuf>, verify: bool) -> Self {
        Self {
            root: root.into(),
            verify,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (or root-relative) location of a resource.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Resolves a binary asset (texture, shader, sound, font).
    ///
    /// The file is only checked for existence when verification is enabled,
    /// since a headless run never decodes these formats.
    pub fn require(&self, relative: &str) -> Result<PathBuf, EngineError> {
        let path = self.path(relative);
        if self.verify && !path.exists() {
            return Err(EngineError::MissingAsset(path));
        }
        Ok(path)
    }

    /// Reads and deserializes a JSON resource. Always checked.
    pub fn load_json<T: DeserializeOwned>(&self, relative: &str) -> Result<T, EngineError> {
        let path = self.path(relative);
        if !path.exists() {
            return Err(EngineError::MissingAsset(path));
        }
        let text = std::fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|source| EngineError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_resources(verify: bool) -> Resources {
        Resources::new(env!("CARGO_MANIFEST_DIR"), verify)
    }

    #[test]
    fn test_require_skips_check_without_verification() {
        let res = crate_resources(false);
        let path = res.require("res/does_not_exist.png").unwrap();
        assert!(path.ends_with("res/does_not_exist.png"));
    }

    #[test]
    fn test_require_reports_missing_asset_with_verification() {
        let res = crate_resources(true);
        let err = res.require("res/does_not_exist.png").unwrap_err();
        assert!(matches!(err, EngineError::MissingAsset(_)));
    }

    #[test]
    fn test_load_json_missing_file() {
        let res = crate_resources(false);
        let err = res.load_json::<serde_json::Value>("res/nope.json").unwrap_err();
        assert!(matches!(err, EngineError::MissingAsset(_)));
    }

    #[test]
    fn test_load_json_reads_scene() {
        let res = crate_resources(false);
        let value: serde_json::Value = res.load_json("res/scene.json").unwrap();
        assert!(value.get("nodes").is_some());
    }
}
