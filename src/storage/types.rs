use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the user
    User,
    /// Reply produced by the model
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in a conversation
///
/// Serialized as `{"role": "user", "content": "..."}`.
///
/// # Examples
///
/// ```
/// use parley::storage::{Role, Turn};
///
/// let turn = Turn::user("hello");
/// assert_eq!(turn.role, Role::User);
/// assert_eq!(turn.content, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who wrote the turn
    pub role: Role,
    /// Text of the turn
    pub content: String,
}

impl Turn {
    /// Creates a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Resolvable reference to a conversation file: `<directory>/<name>.json`
///
/// The directory is kept alongside the name so that conversations imported
/// from outside the canonical store remain addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRef {
    /// Directory holding the conversation file
    pub directory: PathBuf,
    /// Conversation slug, without extension
    pub name: String,
}

impl ConversationRef {
    /// Create a reference from a directory and a name
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
        }
    }

    /// Full path of the conversation file
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.name))
    }

    /// Rebuild a reference from a conversation file path
    ///
    /// Returns `None` unless the path ends in `<name>.json` with a non-empty name.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::storage::ConversationRef;
    /// use std::path::Path;
    ///
    /// let r = ConversationRef::from_file_path(Path::new("/data/chats/rust_help.json")).unwrap();
    /// assert_eq!(r.name, "rust_help");
    /// assert_eq!(r.directory, Path::new("/data/chats"));
    /// ```
    pub fn from_file_path(path: &Path) -> Option<Self> {
        if path.extension()? != "json" {
            return None;
        }
        let name = path.file_stem()?.to_str()?.to_string();
        if name.is_empty() {
            return None;
        }
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Some(Self { directory, name })
    }
}

impl fmt::Display for ConversationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_path().display())
    }
}

/// Listing metadata for a stored conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation slug
    pub name: String,
    /// Number of turns in the conversation
    pub turn_count: usize,
    /// Last modification time of the file
    pub updated_at: DateTime<Utc>,
}
