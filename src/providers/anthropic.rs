//! Anthropic Messages API provider
//!
//! Posts the conversation to `/v1/messages` and joins the text blocks of the
//! reply. The API key is taken from the config or, failing that, from the
//! environment variable named in the config; it is only resolved when a
//! request is actually sent.

use crate::config::AnthropicConfig;
use crate::error::{ParleyError, Result};
use crate::providers::{CompletionRequest, CompletionResponse, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API provider
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    input_tokens: usize,
    #[serde(default)]
    output_tokens: usize,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::config::AnthropicConfig;
    /// use parley::providers::AnthropicProvider;
    ///
    /// assert!(AnthropicProvider::new(AnthropicConfig::default()).is_ok());
    /// ```
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("parley/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ParleyError::Invocation(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized Anthropic provider: api_base={}", config.api_base);

        Ok(Self { client, config })
    }

    fn api_key(&self) -> Result<String> {
        if let Some(key) = self.config.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ParleyError::MissingCredentials(format!(
                    "anthropic (set {})",
                    self.config.api_key_env
                ))
                .into()
            })
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let api_key = self.api_key()?;
        let url = format!("{}/v1/messages", self.config.api_base.trim_end_matches('/'));

        let body = MessagesRequest {
            model: &request.model,
            max_tokens: self.config.max_tokens,
            temperature: request.temperature,
            system: request.system.as_deref(),
            messages: request
                .turns
                .iter()
                .map(|t| ApiMessage {
                    role: t.role.to_string(),
                    content: &t.content,
                })
                .collect(),
        };

        tracing::debug!(
            "Sending Anthropic request: model={}, {} messages",
            body.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Anthropic request failed: {}", e);
                ParleyError::Invocation(format!("Anthropic request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Anthropic returned error {}: {}", status, error_text);
            return Err(ParleyError::Invocation(format!(
                "Anthropic returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Anthropic response: {}", e);
            ParleyError::Invocation(format!("Failed to parse Anthropic response: {}", e))
        })?;

        let text = parsed
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            return Err(ParleyError::Invocation(
                "Anthropic response contained no text content".to_string(),
            )
            .into());
        }

        Ok(match parsed.usage {
            Some(usage) => CompletionResponse::with_usage(
                text,
                TokenUsage::new(usage.input_tokens, usage.output_tokens),
            ),
            None => CompletionResponse::new(text),
        })
    }
}
