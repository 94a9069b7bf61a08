//! Directory-backed conversation storage
//!
//! Each conversation lives in its own `<name>.json` file holding an ordered
//! array of turns. Writes go through a temporary file in the same directory
//! followed by a rename, so readers see either the old or the new content.

use crate::error::{Result, ParleyError};
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub mod pointer;
pub mod types;

pub use pointer::{FilePointerStore, SessionPointerStore};
pub use types::{ConversationRef, ConversationSummary, Role, Turn};

const EXTENSION: &str = "json";

/// Storage backend for conversation histories
#[derive(Debug, Clone)]
pub struct ConversationStore {
    dir: PathBuf,
}

impl ConversationStore {
    /// Create a store rooted at `dir`
    ///
    /// The directory is created lazily on the first save.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley::storage::ConversationStore;
    ///
    /// let store = ConversationStore::new("/tmp/parley-doc-conversations");
    /// assert!(store.load("never_written").unwrap().is_empty());
    /// ```
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this store reads from and writes to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `name`
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, EXTENSION)))
    }

    /// Reference to `name` inside this store
    pub fn reference(&self, name: &str) -> ConversationRef {
        ConversationRef::new(self.dir.clone(), name)
    }

    /// Load the turns of a conversation
    ///
    /// A missing file is a new conversation and yields an empty history.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Storage` if the file cannot be read and
    /// `ParleyError::CorruptData` if it does not hold a turn array.
    pub fn load(&self, name: &str) -> Result<Vec<Turn>> {
        let path = self.path_for(name)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No conversation file at {}, starting empty", path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ParleyError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
                .into())
            }
        };

        let turns: Vec<Turn> = serde_json::from_str(&contents).map_err(|e| {
            tracing::error!("Conversation file {} is corrupt: {}", path.display(), e);
            ParleyError::CorruptData {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        tracing::debug!("Loaded {} turns from {}", turns.len(), path.display());
        Ok(turns)
    }

    /// Replace the persisted turns of a conversation
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Storage` if the directory or file cannot be written.
    /// The previous content stays intact on failure.
    pub fn save(&self, name: &str, turns: &[Turn]) -> Result<()> {
        let path = self.path_for(name)?;
        let json = serde_json::to_string_pretty(turns)
            .context("Failed to serialize conversation")?;
        write_atomic(&path, json.as_bytes())?;
        tracing::debug!("Saved {} turns to {}", turns.len(), path.display());
        Ok(())
    }

    /// Whether a file for `name` is present
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Names of all conversations in the store
    ///
    /// A store whose directory does not exist yet lists as empty.
    pub fn list(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .json_files()?
            .into_iter()
            .filter_map(|p| ConversationRef::from_file_path(&p).map(|r| r.name))
            .collect())
    }

    /// Listing metadata, most recently updated first
    ///
    /// Files that cannot be parsed are skipped with a warning rather than
    /// failing the whole listing.
    pub fn summaries(&self) -> Result<Vec<ConversationSummary>> {
        let mut summaries = Vec::new();
        for path in self.json_files()? {
            let Some(reference) = ConversationRef::from_file_path(&path) else {
                continue;
            };
            let turns = match self.load(&reference.name) {
                Ok(turns) => turns,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let updated_at = fs::metadata(&path)
                .and_then(|m| m.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            summaries.push(ConversationSummary {
                name: reference.name,
                turn_count: turns.len(),
                updated_at,
            });
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    fn json_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ParleyError::Storage(format!(
                    "Failed to read directory {}: {}",
                    self.dir.display(),
                    e
                ))
                .into())
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                ParleyError::Storage(format!(
                    "Failed to read directory {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with('.'))
                .unwrap_or(true);
            if !hidden && path.is_file() && path.extension().is_some_and(|e| e == EXTENSION) {
                files.push(path);
            }
        }
        Ok(files)
    }
}

/// Check that `name` can be used as a conversation file name
///
/// # Errors
///
/// Returns `ParleyError::User` for empty names, path separators, or names
/// that would escape the store directory.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(ParleyError::User(format!("Invalid conversation name: {:?}", name)).into());
    }
    Ok(())
}

/// Absolute form of `dir`, canonical when it exists
pub(crate) fn absolute_dir(dir: &Path) -> PathBuf {
    if let Ok(canonical) = dir.canonicalize() {
        return canonical;
    }
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .unwrap_or_else(|_| dir.to_path_buf())
}

/// Write `bytes` to `path` through a sibling temporary file and a rename
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| {
        ParleyError::Storage(format!(
            "Failed to create directory {}: {}",
            parent.display(),
            e
        ))
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ParleyError::Storage(format!("Invalid path: {}", path.display())))?;
    let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, std::process::id()));

    let written = File::create(&tmp_path)
        .and_then(|mut tmp_file| {
            tmp_file.write_all(bytes)?;
            tmp_file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp_path, path));

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(ParleyError::Storage(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        ))
        .into());
    }
    Ok(())
}
