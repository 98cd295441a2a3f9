//! Crate-wide error types
//!
//! The [`TabList`](crate::TabList) contract itself is total: adapters absorb
//! every fault locally. These errors only cross the boundary where a caller
//! can act on them (host collaborators, configuration loading).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type shared by host collaborators and configuration
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TabSyncError {
    /// The host refused a tablist mutation (duplicate, wrong thread, ...)
    #[error("Backend rejected operation: {0}")]
    BackendRejection(String),

    /// The component renderer produced nothing usable
    #[error("Component could not be rendered")]
    RenderFailure,

    /// The viewer's connection is closed
    #[error("Viewer is no longer connected")]
    ViewerGone,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TabSyncError>;

impl From<std::io::Error> for TabSyncError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for TabSyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TabSyncError::BackendRejection("duplicate entry".to_string());
        assert_eq!(err.to_string(), "Backend rejected operation: duplicate entry");
        assert_eq!(
            TabSyncError::ViewerGone.to_string(),
            "Viewer is no longer connected"
        );
    }

    #[test]
    fn test_error_serde() {
        let json = serde_json::to_string(&TabSyncError::ConfigError("bad".into())).unwrap();
        assert_eq!(json, r#"{"type":"ConfigError","message":"bad"}"#);
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: TabSyncError = err.into();
        assert!(matches!(converted, TabSyncError::SerializationError(_)));
    }
}
