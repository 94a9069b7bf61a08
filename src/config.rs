//! Configuration management for Parley
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::cli::{Cli, Commands};
use crate::error::{ParleyError, Result};
use crate::personas;
use crate::providers::PROVIDER_TYPES;
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Parley
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider configuration (Anthropic, Ollama)
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Chat and storage settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Specifies which AI provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Anthropic configuration
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "anthropic".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            anthropic: AnthropicConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Anthropic provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API base URL (overridable for tests and proxies)
    #[serde(default = "default_anthropic_api_base")]
    pub api_base: String,

    /// Inline API key; the environment variable is used when absent
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_anthropic_api_key_env")]
    pub api_key_env: String,

    /// Maximum tokens in a reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_anthropic_api_base() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout() -> u64 {
    120
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_base: default_anthropic_api_base(),
            api_key: None,
            api_key_env: default_anthropic_api_key_env(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Chat configuration
///
/// Model selection, persona, and where conversations and the active
/// conversation pointer are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model used for conversation replies
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used to name new conversations
    #[serde(default = "default_naming_model")]
    pub naming_model: String,

    /// Sampling temperature for replies
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Persona whose system text accompanies every request
    #[serde(default = "default_persona")]
    pub persona: String,

    /// Directory holding `<name>.json` conversation files
    #[serde(default)]
    pub conversations_directory: Option<PathBuf>,

    /// File holding the active conversation pointer
    #[serde(default)]
    pub pointer_file: Option<PathBuf>,
}

fn default_model() -> String {
    "claude-3-opus-20240229".to_string()
}

fn default_naming_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_persona() -> String {
    personas::DEFAULT_PERSONA.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            naming_model: default_naming_model(),
            temperature: default_temperature(),
            persona: default_persona(),
            conversations_directory: None,
            pointer_file: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ParleyError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ParleyError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("PARLEY_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(api_base) = std::env::var("PARLEY_ANTHROPIC_API_BASE") {
            self.provider.anthropic.api_base = api_base;
        }

        if let Ok(host) = std::env::var("PARLEY_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("PARLEY_MODEL") {
            self.chat.model = model;
        }

        if let Ok(model) = std::env::var("PARLEY_NAMING_MODEL") {
            self.chat.naming_model = model;
        }

        if let Ok(temperature) = std::env::var("PARLEY_TEMPERATURE") {
            match temperature.parse() {
                Ok(value) => self.chat.temperature = value,
                Err(_) => tracing::warn!("Invalid PARLEY_TEMPERATURE: {}", temperature),
            }
        }

        if let Ok(persona) = std::env::var("PARLEY_PERSONA") {
            self.chat.persona = persona;
        }

        if let Ok(dir) = std::env::var("PARLEY_CONVERSATIONS_DIR") {
            tracing::debug!(dir = %dir, "Env override: PARLEY_CONVERSATIONS_DIR");
            self.chat.conversations_directory = Some(PathBuf::from(dir));
        }

        if let Ok(pointer) = std::env::var("PARLEY_POINTER_FILE") {
            tracing::debug!(pointer = %pointer, "Env override: PARLEY_POINTER_FILE");
            self.chat.pointer_file = Some(PathBuf::from(pointer));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.conversations_directory {
            self.chat.conversations_directory = Some(dir.clone());
        }

        if let Commands::Chat {
            model,
            temperature,
            persona,
            ..
        } = &cli.command
        {
            if let Some(model) = model {
                self.chat.model = model.clone();
            }
            if let Some(temperature) = temperature {
                self.chat.temperature = *temperature;
            }
            if let Some(persona) = persona {
                self.chat.persona = persona.clone();
            }
        }
    }

    /// Directory holding conversation files
    ///
    /// Uses the configured directory (with `~/` expanded) or
    /// `<data dir>/conversations`.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` if no platform data directory can be determined
    pub fn conversations_dir(&self) -> Result<PathBuf> {
        match &self.chat.conversations_directory {
            Some(dir) => Ok(expand_home(dir)),
            None => Ok(data_dir()?.join("conversations")),
        }
    }

    /// File holding the active conversation pointer
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` if no platform data directory can be determined
    pub fn pointer_path(&self) -> Result<PathBuf> {
        match &self.chat.pointer_file {
            Some(path) => Ok(expand_home(path)),
            None => Ok(data_dir()?.join("current_conversation.txt")),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(ParleyError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !PROVIDER_TYPES.contains(&self.provider.provider_type.as_str()) {
            return Err(ParleyError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                PROVIDER_TYPES.join(", ")
            ))
            .into());
        }

        if self.chat.model.trim().is_empty() {
            return Err(ParleyError::Config("chat.model cannot be empty".to_string()).into());
        }

        if self.chat.naming_model.trim().is_empty() {
            return Err(
                ParleyError::Config("chat.naming_model cannot be empty".to_string()).into(),
            );
        }

        if !(0.0..=1.0).contains(&self.chat.temperature) {
            return Err(ParleyError::Config(
                "chat.temperature must be between 0.0 and 1.0".to_string(),
            )
            .into());
        }

        if personas::system_prompt(&self.chat.persona).is_none() {
            return Err(ParleyError::Config(format!(
                "Unknown persona: {}. Must be one of: {}",
                self.chat.persona,
                personas::names().join(", ")
            ))
            .into());
        }

        if self.provider.anthropic.max_tokens == 0 {
            return Err(ParleyError::Config(
                "provider.anthropic.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.provider.anthropic.timeout_seconds == 0 || self.provider.ollama.timeout_seconds == 0
        {
            return Err(ParleyError::Config(
                "provider timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "parley", "parley")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ParleyError::Config("Could not determine data directory".into()).into())
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
