//! Base provider trait and common types for Parley
//!
//! This module defines the Provider trait that every AI backend implements,
//! along with the typed request and response exchanged with it. Session logic
//! only ever talks to this trait, so tests can substitute a scripted provider.

use crate::error::Result;
use crate::storage::Turn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single completion request
///
/// # Examples
///
/// ```
/// use parley::providers::CompletionRequest;
/// use parley::storage::Turn;
///
/// let request = CompletionRequest::new(vec![Turn::user("Hi")], "claude-3-haiku-20240307", 0.7)
///     .with_system("Be brief.");
/// assert_eq!(request.system.as_deref(), Some("Be brief."));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Ordered conversation history, ending with the latest user turn
    pub turns: Vec<Turn>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Persona or system instruction text
    pub system: Option<String>,
}

impl CompletionRequest {
    /// Create a request without system text
    pub fn new(turns: Vec<Turn>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            turns,
            model: model.into(),
            temperature,
            system: None,
        }
    }

    /// Attach system text
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        self.system = if system.trim().is_empty() {
            None
        } else {
            Some(system)
        };
        self
    }
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Response from a completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Completion text
    pub text: String,
    /// Token usage if the backend reported it
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a response without usage information
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Create a response with token usage
    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage: Some(usage),
        }
    }
}

/// AI provider port
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use parley::providers::{CompletionRequest, CompletionResponse, Provider};
/// use parley::error::Result;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Provider for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
///         let last = request.turns.last().map(|t| t.content.clone()).unwrap_or_default();
///         Ok(CompletionResponse::new(last))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider identifier used in logs
    fn name(&self) -> &str;

    /// Produce a single completion for the request
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Invocation` if the call fails or the reply is malformed
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;
}
