//! Test utilities for Parley
//!
//! This module provides common test utilities including temporary directory
//! management, test file creation, and assertion helpers.

use crate::config::Config;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory for testing
///
/// # Returns
///
/// Returns a TempDir that will be cleaned up when dropped
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Arguments
///
/// * `dir` - Directory to create the file in
/// * `name` - Name of the file
/// * `content` - Content to write to the file
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration whose storage lives under `dir`
pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.chat.conversations_directory = Some(dir.path().join("conversations"));
    config.chat.pointer_file = Some(dir.path().join("current_conversation.txt"));
    config
}

/// Create a test configuration YAML string
pub fn test_config_yaml() -> String {
    r#"
provider:
  type: ollama
  anthropic:
    api_base: https://api.anthropic.com
    api_key_env: ANTHROPIC_API_KEY
    max_tokens: 2048
  ollama:
    host: http://localhost:11434
    timeout_seconds: 30

chat:
  model: llama3.2:latest
  naming_model: llama3.2:latest
  temperature: 0.2
  persona: formal
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParleyError;

    #[test]
    fn test_temp_dir_creation() {
        let dir = temp_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_create_test_file() {
        let dir = temp_dir();
        let path = create_test_file(&dir, "test.txt", "content");
        assert!(path.exists());
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(ParleyError::Config("test error message".to_string()).into());
        assert_error_contains(result, "test error");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    #[should_panic(expected = "does not contain")]
    fn test_assert_error_contains_wrong_message() {
        let result: crate::error::Result<()> =
            Err(ParleyError::Config("different error".to_string()).into());
        assert_error_contains(result, "not present");
    }

    #[test]
    fn test_test_config() {
        let dir = temp_dir();
        let config = test_config(&dir);
        assert_eq!(config.provider.provider_type, "anthropic");
        assert!(config.validate().is_ok());
        assert_eq!(
            config.conversations_dir().unwrap(),
            dir.path().join("conversations")
        );
        assert_eq!(
            config.pointer_path().unwrap(),
            dir.path().join("current_conversation.txt")
        );
    }

    #[test]
    fn test_test_config_yaml() {
        let yaml = test_config_yaml();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.provider.provider_type, "ollama");
        assert_eq!(config.chat.persona, "formal");
        assert_eq!(config.provider.anthropic.max_tokens, 2048);
        assert!(config.validate().is_ok());
    }
}
