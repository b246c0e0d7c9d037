//! Engine Errors
//!
//! Failures raised while loading sample resources or resolving scene content.
//! Missing nodes, clips and components surface here instead of as null handles.

use std::path::PathBuf;

/// Errors produced by the engine core and the samples built on it.
#[derive(Debug)]
pub enum EngineError {
    /// Asset file does not exist under the asset root (only raised when verification is on).
    MissingAsset(PathBuf),
    /// Standard I/O error.
    Io(std::io::Error),
    /// A scene, clip or config file failed to parse.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// No node with this id exists in the scene.
    NodeNotFound(String),
    /// The node exists but lacks a component the caller requires.
    MissingComponent {
        node: String,
        component: &'static str,
    },
    /// No animation clip (or character animation) with this id.
    ClipNotFound(String),
    /// The scene description is structurally invalid.
    InvalidScene(String),
    /// A collision object handle that the physics world does not know.
    UnknownCollisionObject(u32),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MissingAsset(path) => write!(f, "missing asset: {}", path.display()),
            EngineError::Io(e) => write!(f, "IO error: {e}"),
            EngineError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            EngineError::NodeNotFound(id) => write!(f, "scene node not found: {id}"),
            EngineError::MissingComponent { node, component } => {
                write!(f, "node '{node}' has no {component}")
            }
            EngineError::ClipNotFound(id) => write!(f, "animation clip not found: {id}"),
            EngineError::InvalidScene(reason) => write!(f, "invalid scene: {reason}"),
            EngineError::UnknownCollisionObject(id) => {
                write!(f, "unknown collision object #{id}")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io(e) => Some(e),
            EngineError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_missing_component() {
        let err = EngineError::MissingComponent {
            node: "Camera".to_string(),
            component: "collision object",
        };
        assert_eq!(err.to_string(), "node 'Camera' has no collision object");
    }

    #[test]
    fn test_io_error_converts_and_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
