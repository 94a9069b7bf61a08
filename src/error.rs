//! Error types for Parley
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Parley operations
///
/// Storage and invocation failures are fatal to the running command.
/// A corrupt conversation file is reported separately from a missing one.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure on the conversation store or the pointer file
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted conversation file exists but cannot be parsed
    #[error("Corrupt conversation data in {}: {reason}", path.display())]
    CorruptData {
        /// Path of the offending file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Remote model call failed (network, auth, quota, malformed reply)
    #[error("Invocation error: {0}")]
    Invocation(String),

    /// Invalid arguments or references supplied by the user
    #[error("{0}")]
    User(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ParleyError {
    /// Returns true for errors caused by the persisted store
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ParleyError::Storage(_) | ParleyError::CorruptData { .. } | ParleyError::Io(_)
        )
    }
}

/// Result type alias for Parley operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation. Callers that
/// need to branch on the category downcast to [`ParleyError`].
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ParleyError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_storage_error_display() {
        let error = ParleyError::Storage("permission denied".to_string());
        assert_eq!(error.to_string(), "Storage error: permission denied");
    }

    #[test]
    fn test_corrupt_data_error_display() {
        let error = ParleyError::CorruptData {
            path: PathBuf::from("/tmp/conversations/broken.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("/tmp/conversations/broken.json"));
        assert!(s.contains("expected value"));
    }

    #[test]
    fn test_invocation_error_display() {
        let error = ParleyError::Invocation("rate limited".to_string());
        assert_eq!(error.to_string(), "Invocation error: rate limited");
    }

    #[test]
    fn test_user_error_display_is_bare_message() {
        let error = ParleyError::User("Unknown persona: pirate".to_string());
        assert_eq!(error.to_string(), "Unknown persona: pirate");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = ParleyError::MissingCredentials("anthropic".to_string());
        assert_eq!(
            error.to_string(),
            "Missing credentials for provider: anthropic"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ParleyError = io_error.into();
        assert!(matches!(error, ParleyError::Io(_)));
        assert!(error.is_storage());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ParleyError = json_error.into();
        assert!(matches!(error, ParleyError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ParleyError = yaml_error.into();
        assert!(matches!(error, ParleyError::Yaml(_)));
    }

    #[test]
    fn test_invocation_is_not_storage() {
        assert!(!ParleyError::Invocation("x".to_string()).is_storage());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParleyError>();
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = ParleyError::Storage("disk full".to_string()).into();
        assert!(matches!(
            err.downcast_ref::<ParleyError>(),
            Some(ParleyError::Storage(_))
        ));
    }
}
