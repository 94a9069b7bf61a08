//! Persona presets
//!
//! A persona is a named block of system text sent with every request of a
//! conversation. The set is fixed at compile time.

use crate::error::{ParleyError, Result};

/// Name of the persona used when none is configured
pub const DEFAULT_PERSONA: &str = "default";

const DEFAULT_PROMPT: &str = "\
You are a collaborator for a working software engineer. Help with design, \
feature development, troubleshooting, debugging and testing.
- Give clear, concise and relevant answers.
- Offer insights, suggestions and alternative approaches when they help resolve an issue.
- Ask for missing details instead of guessing.
- Adapt your style to the user's preferences as the conversation goes on.";

const FRIENDLY_PROMPT: &str = "You are a friendly and empathetic AI assistant. \
Engage in warm and supportive conversations with the user, offering helpful \
advice and encouragement.";

const FORMAL_PROMPT: &str = "You are a formal and professional AI assistant. \
Provide concise and accurate information to the user, maintaining a \
business-like tone throughout the conversation.";

/// All personas as `(name, system text)` pairs, in display order
pub const PERSONAS: [(&str, &str); 3] = [
    (DEFAULT_PERSONA, DEFAULT_PROMPT),
    ("friendly", FRIENDLY_PROMPT),
    ("formal", FORMAL_PROMPT),
];

/// Look up the system text of a persona
///
/// # Examples
///
/// ```
/// use parley::personas::system_prompt;
///
/// assert!(system_prompt("formal").unwrap().contains("professional"));
/// assert!(system_prompt("pirate").is_none());
/// ```
pub fn system_prompt(name: &str) -> Option<&'static str> {
    PERSONAS
        .iter()
        .find(|(persona, _)| persona.eq_ignore_ascii_case(name))
        .map(|(_, prompt)| *prompt)
}

/// Names of every persona
pub fn names() -> Vec<&'static str> {
    PERSONAS.iter().map(|(name, _)| *name).collect()
}

/// Resolve a persona name to its system text
///
/// # Errors
///
/// Returns `ParleyError::User` naming the available personas if `name` is unknown
pub fn resolve(name: &str) -> Result<&'static str> {
    system_prompt(name).ok_or_else(|| {
        ParleyError::User(format!(
            "Unknown persona: {}. Available personas: {}",
            name,
            names().join(", ")
        ))
        .into()
    })
}
