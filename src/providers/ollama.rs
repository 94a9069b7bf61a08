//! Ollama provider implementation for Parley
//!
//! Sends the conversation to an Ollama server's `/api/chat` endpoint with
//! streaming disabled and returns the assistant message text.

use crate::config::OllamaConfig;
use crate::error::{ParleyError, Result};
use crate::providers::{CompletionRequest, CompletionResponse, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// # Examples
///
/// ```no_run
/// use parley::config::OllamaConfig;
/// use parley::providers::{CompletionRequest, OllamaProvider, Provider};
/// use parley::storage::Turn;
///
/// # async fn example() -> parley::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default())?;
/// let request = CompletionRequest::new(vec![Turn::user("Hello!")], "llama3.2:latest", 0.7);
/// let reply = provider.complete(&request).await?;
/// println!("{}", reply.text);
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Message structure for Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::config::OllamaConfig;
    /// use parley::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("parley/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ParleyError::Invocation(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized Ollama provider: host={}", config.host);

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    fn convert_messages(request: &CompletionRequest) -> Vec<OllamaMessage> {
        let system = request.system.as_ref().map(|s| OllamaMessage {
            role: "system".to_string(),
            content: s.clone(),
        });
        system
            .into_iter()
            .chain(request.turns.iter().map(|t| OllamaMessage {
                role: t.role.to_string(),
                content: t.content.clone(),
            }))
            .collect()
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));

        let ollama_request = OllamaRequest {
            model: request.model.clone(),
            messages: Self::convert_messages(request),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
            },
        };

        tracing::debug!(
            "Sending Ollama request: model={}, {} messages",
            ollama_request.model,
            ollama_request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                ParleyError::Invocation(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(ParleyError::Invocation(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            ParleyError::Invocation(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            ollama_response.done,
            ollama_response.prompt_eval_count,
            ollama_response.eval_count
        );

        let text = ollama_response.message.content;
        if text.trim().is_empty() {
            return Err(ParleyError::Invocation(
                "Ollama response contained no text content".to_string(),
            )
            .into());
        }

        let response = if ollama_response.prompt_eval_count > 0 || ollama_response.eval_count > 0 {
            CompletionResponse::with_usage(
                text,
                TokenUsage::new(ollama_response.prompt_eval_count, ollama_response.eval_count),
            )
        } else {
            CompletionResponse::new(text)
        };

        Ok(response)
    }
}
