//! Durable pointer to the active conversation
//!
//! The pointer file holds a single line: the full path of the active
//! conversation file. An empty or missing file means no conversation is active.

use super::types::ConversationRef;
use super::write_atomic;
use crate::error::{ParleyError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Port for reading and writing the active-conversation pointer
pub trait SessionPointerStore: Send + Sync {
    /// Active conversation, or `None` if never set or cleared
    fn get(&self) -> Result<Option<ConversationRef>>;

    /// Durably point at `reference`
    fn set(&self, reference: &ConversationRef) -> Result<()>;

    /// Detach the pointer; conversation files are not touched
    fn clear(&self) -> Result<()>;
}

/// Pointer store backed by a small text file
#[derive(Debug, Clone)]
pub struct FilePointerStore {
    path: PathBuf,
}

impl FilePointerStore {
    /// Create a pointer store using the file at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Location of the pointer file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionPointerStore for FilePointerStore {
    fn get(&self) -> Result<Option<ConversationRef>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ParleyError::Storage(format!(
                    "Failed to read pointer file {}: {}",
                    self.path.display(),
                    e
                ))
                .into())
            }
        };

        let value = contents.trim();
        if value.is_empty() {
            return Ok(None);
        }

        // A bare "<name>.json" resolves against the working directory.
        ConversationRef::from_file_path(Path::new(value))
            .map(Some)
            .ok_or_else(|| {
                ParleyError::Storage(format!(
                    "Pointer file {} does not reference a conversation file: {}",
                    self.path.display(),
                    value
                ))
                .into()
            })
    }

    fn set(&self, reference: &ConversationRef) -> Result<()> {
        let line = format!("{}\n", reference.file_path().display());
        write_atomic(&self.path, line.as_bytes())?;
        tracing::debug!("Active conversation set to {}", reference);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        write_atomic(&self.path, b"")?;
        tracing::debug!("Active conversation pointer cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_without_file_is_none() {
        let dir = tempdir().unwrap();
        let store = FilePointerStore::new(dir.path().join("current_conversation.txt"));
        assert_eq!(store.get().expect("get failed"), None);
    }

    #[test]
    fn test_set_then_get_from_fresh_instance() {
        let dir = tempdir().unwrap();
        let pointer_path = dir.path().join("state").join("current_conversation.txt");
        let reference = ConversationRef::new(dir.path().join("conversations"), "rust_help");

        FilePointerStore::new(&pointer_path)
            .set(&reference)
            .expect("set failed");

        // A new instance stands in for a fresh process start
        let reopened = FilePointerStore::new(&pointer_path);
        assert_eq!(reopened.get().expect("get failed"), Some(reference));
    }

    #[test]
    fn test_clear_detaches_without_deleting_conversation() {
        let dir = tempdir().unwrap();
        let conversation = dir.path().join("kept.json");
        fs::write(&conversation, "[]").unwrap();

        let store = FilePointerStore::new(dir.path().join("pointer.txt"));
        store
            .set(&ConversationRef::new(dir.path(), "kept"))
            .unwrap();
        store.clear().expect("clear failed");

        assert_eq!(store.get().unwrap(), None);
        assert!(conversation.exists());
    }

    #[test]
    fn test_clear_without_file_is_noop() {
        let dir = tempdir().unwrap();
        let store = FilePointerStore::new(dir.path().join("pointer.txt"));
        store.clear().expect("clear failed");
        assert!(!store.path().exists());
    }

    #[test]
    fn test_whitespace_pointer_is_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pointer.txt");
        fs::write(&path, "  \n").unwrap();
        assert_eq!(FilePointerStore::new(&path).get().unwrap(), None);
    }

    #[test]
    fn test_garbage_pointer_is_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pointer.txt");
        fs::write(&path, "not-a-conversation.txt").unwrap();
        let err = FilePointerStore::new(&path).get().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParleyError>(),
            Some(ParleyError::Storage(_))
        ));
    }

    #[test]
    fn test_bare_file_name_pointer_resolves_relative() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pointer.txt");
        fs::write(&path, "old_chat.json").unwrap();
        let reference = FilePointerStore::new(&path).get().unwrap().unwrap();
        assert_eq!(reference.name, "old_chat");
        assert_eq!(reference.directory, PathBuf::from(""));
    }
}
