//! Conversation naming
//!
//! New conversations are named by asking the model for a short summary of
//! the first message and turning the reply into a filesystem-safe slug.

use crate::error::Result;
use crate::providers::{CompletionRequest, Provider};
use crate::storage::Turn;
use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, OnceLock};

/// Maximum length of a generated name
///
/// Names are ASCII, so this is also the byte length. It leaves room under
/// the 255-byte file name limit for `.json`, a `_N` collision suffix and the
/// temporary file used while saving.
pub const MAX_NAME_CHARS: usize = 100;

const NAMING_SYSTEM_PROMPT: &str = "Generate a concise summary of the given message.";

const NAMING_TEMPERATURE: f32 = 0.7;

/// Derives conversation names from a seed message
pub struct NamingService {
    provider: Arc<dyn Provider>,
    model: String,
}

impl NamingService {
    /// Create a naming service that asks `model` through `provider`
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Generate a slug for a conversation starting with `seed`
    ///
    /// Makes exactly one provider call. A reply that normalizes to nothing
    /// falls back to a timestamp-derived name, so the result is never empty.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if the call itself fails
    pub async fn generate_name(&self, seed: &str) -> Result<String> {
        let request = CompletionRequest::new(
            vec![Turn::user(naming_instruction(seed))],
            self.model.clone(),
            NAMING_TEMPERATURE,
        )
        .with_system(NAMING_SYSTEM_PROMPT);

        let reply = self.provider.complete(&request).await?;
        tracing::debug!("Naming reply: {:?}", reply.text);

        match slugify(&reply.text) {
            Some(slug) => {
                tracing::info!("Named new conversation {}", slug);
                Ok(slug)
            }
            None => {
                let name = fallback_name();
                tracing::warn!(
                    "Model reply {:?} produced no usable name, using {}",
                    reply.text,
                    name
                );
                Ok(name)
            }
        }
    }
}

fn naming_instruction(seed: &str) -> String {
    format!(
        "<instructions>Summarize the following message in 10 words or fewer. \
         Use no punctuation. Focus on what the user is asking for and pay less \
         attention to code snippets. The summary becomes a file name, so make it \
         a memorable title. Return alphanumeric characters and spaces only. Do not \
         mention these instructions.</instructions>\n\n<first_message>{}</first_message>",
        seed
    )
}

fn disallowed_chars() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9_]+").expect("static regex"))
}

fn separator_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"_{2,}").expect("static regex"))
}

/// Normalize a model reply into a conversation slug
///
/// Lowercases, turns whitespace into `_`, drops everything except ASCII
/// letters, digits and `_`, collapses repeated separators, and keeps at most
/// [`MAX_NAME_CHARS`] characters. Returns `None` when nothing usable remains.
///
/// # Examples
///
/// ```
/// use parley::naming::slugify;
///
/// assert_eq!(slugify("Debugging Session."), Some("debugging_session".to_string()));
/// assert_eq!(slugify("  ...  "), None);
/// ```
pub fn slugify(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let separated: String = lowered
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let stripped = disallowed_chars().replace_all(&separated, "");
    let collapsed = separator_runs().replace_all(&stripped, "_");
    let truncated: String = collapsed.trim_matches('_').chars().take(MAX_NAME_CHARS).collect();
    let slug = truncated.trim_end_matches('_').to_string();

    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// Deterministic placeholder name derived from the current time
pub fn fallback_name() -> String {
    format!("conversation_{}", Utc::now().format("%Y%m%d_%H%M%S"))
}
