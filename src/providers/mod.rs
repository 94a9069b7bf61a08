//! Provider module for Parley
//!
//! This module contains the AI provider abstraction and implementations
//! for the Anthropic Messages API and Ollama.

pub mod anthropic;
pub mod base;
pub mod ollama;

pub use anthropic::AnthropicProvider;
pub use base::{CompletionRequest, CompletionResponse, Provider, TokenUsage};
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{ParleyError, Result};
use std::sync::Arc;

/// Provider types accepted in configuration
pub const PROVIDER_TYPES: [&str; 2] = ["anthropic", "ollama"];

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of provider ("anthropic" or "ollama")
/// * `config` - Provider configuration
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
///
/// # Examples
///
/// ```
/// use parley::config::ProviderConfig;
/// use parley::providers::create_provider;
///
/// let provider = create_provider("ollama", &ProviderConfig::default()).unwrap();
/// assert_eq!(provider.name(), "ollama");
/// ```
pub fn create_provider(provider_type: &str, config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    match provider_type {
        "anthropic" => Ok(Arc::new(AnthropicProvider::new(config.anthropic.clone())?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.ollama.clone())?)),
        _ => Err(ParleyError::Config(format!("Unknown provider type: {}", provider_type)).into()),
    }
}
