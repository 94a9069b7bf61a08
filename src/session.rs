//! Conversation session lifecycle
//!
//! The [`ConversationManager`] ties the pointer store, the conversation
//! store, the naming service and the provider together. It has two states,
//! no active conversation or an active one, and every operation reads the
//! current state from the pointer store at call time.
//!
//! Turns are always persisted in user/assistant pairs: `send_message`
//! builds both turns in memory and writes the history once, after the
//! provider has replied.

use crate::error::{ParleyError, Result};
use crate::naming::NamingService;
use crate::providers::{CompletionRequest, Provider};
use crate::storage::{
    absolute_dir, validate_name, ConversationRef, ConversationStore, ConversationSummary,
    SessionPointerStore, Turn,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Whether a conversation is currently active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Pointer is unset; the next message starts a new conversation
    NoActiveConversation,
    /// Pointer references this conversation
    ActiveConversation(ConversationRef),
}

/// Per-invocation request settings
#[derive(Debug, Clone)]
pub struct ChatSettings {
    /// Model for replies
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Persona system text
    pub system_prompt: String,
}

/// Orchestrates conversation operations
pub struct ConversationManager {
    store: ConversationStore,
    pointer: Box<dyn SessionPointerStore>,
    provider: Arc<dyn Provider>,
    naming: NamingService,
    settings: ChatSettings,
}

impl ConversationManager {
    /// Create a manager
    ///
    /// # Arguments
    ///
    /// * `store` - Canonical store where new conversations are created
    /// * `pointer` - Active conversation pointer
    /// * `provider` - AI backend used for replies
    /// * `naming` - Naming service for new conversations
    /// * `settings` - Model, temperature, and persona text for replies
    pub fn new(
        store: ConversationStore,
        pointer: Box<dyn SessionPointerStore>,
        provider: Arc<dyn Provider>,
        naming: NamingService,
        settings: ChatSettings,
    ) -> Self {
        Self {
            store,
            pointer,
            provider,
            naming,
            settings,
        }
    }

    /// Canonical conversation store
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Current session state as recorded by the pointer
    pub fn state(&self) -> Result<SessionState> {
        Ok(match self.pointer.get()? {
            Some(reference) => SessionState::ActiveConversation(reference),
            None => SessionState::NoActiveConversation,
        })
    }

    /// Send a user message and return the assistant's reply
    ///
    /// Starts and names a new conversation when none is active. The user
    /// turn and the reply are saved together in a single write.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::User` for an empty message, the provider's
    /// error if naming or the reply fails (nothing is written in that case),
    /// and storage errors from loading or saving.
    pub async fn send_message(&self, text: &str) -> Result<Turn> {
        if text.trim().is_empty() {
            return Err(ParleyError::User("Message cannot be empty".to_string()).into());
        }

        let (reference, is_new) = match self.state()? {
            SessionState::ActiveConversation(reference) => (reference, false),
            SessionState::NoActiveConversation => {
                let name = self.naming.generate_name(text).await?;
                let name = self.unique_name(&name);
                (self.store.reference(&name), true)
            }
        };

        let store = store_for(&reference);
        let mut turns = store.load(&reference.name)?;
        turns.push(Turn::user(text));

        let request = CompletionRequest::new(
            turns.clone(),
            self.settings.model.clone(),
            self.settings.temperature,
        )
        .with_system(self.settings.system_prompt.clone());

        tracing::info!(
            "Sending {} turns to {} (model={}) for {}",
            turns.len(),
            self.provider.name(),
            self.settings.model,
            reference.name
        );
        let response = self.provider.complete(&request).await?;
        if let Some(usage) = response.usage {
            tracing::debug!(
                "Token usage: prompt={}, completion={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        let reply = Turn::assistant(response.text);
        turns.push(reply.clone());
        store.save(&reference.name, &turns)?;

        if is_new {
            let reference =
                ConversationRef::new(absolute_dir(&reference.directory), reference.name);
            self.pointer.set(&reference)?;
            tracing::info!("Started conversation {}", reference);
        }

        Ok(reply)
    }

    /// Detach from the active conversation
    ///
    /// Returns whether a conversation was active. The conversation file is
    /// left on disk.
    pub fn reset_conversation(&self) -> Result<bool> {
        let was_active = matches!(self.state()?, SessionState::ActiveConversation(_));
        self.pointer.clear()?;
        tracing::info!("Conversation reset (was active: {})", was_active);
        Ok(was_active)
    }

    /// Drop the last user/assistant exchange
    ///
    /// Returns `Ok(false)` without touching anything when no conversation is
    /// active or it holds fewer than two turns.
    ///
    /// # Errors
    ///
    /// Only storage failures (unreadable, corrupt, or unwritable files) are errors
    pub fn remove_last_interaction(&self) -> Result<bool> {
        let SessionState::ActiveConversation(reference) = self.state()? else {
            return Ok(false);
        };

        let store = store_for(&reference);
        let mut turns = store.load(&reference.name)?;
        if turns.len() < 2 {
            return Ok(false);
        }

        turns.truncate(turns.len() - 2);
        store.save(&reference.name, &turns)?;
        tracing::info!(
            "Removed last interaction from {} ({} turns left)",
            reference.name,
            turns.len()
        );
        Ok(true)
    }

    /// Copy the active conversation to `<target_dir>/<target_name>.json`
    ///
    /// Returns `None` when no conversation is active.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::User` for an invalid target name, and storage
    /// errors from reading the source or writing the copy.
    pub fn write_conversation(
        &self,
        target_name: &str,
        target_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        validate_name(target_name)?;
        let SessionState::ActiveConversation(reference) = self.state()? else {
            return Ok(None);
        };

        let turns = store_for(&reference).load(&reference.name)?;
        let target = ConversationStore::new(target_dir);
        target.save(target_name, &turns)?;
        let path = target.path_for(target_name)?;
        tracing::info!("Wrote {} to {}", reference.name, path.display());
        Ok(Some(path))
    }

    /// Make `<dir>/<name>.json` the active conversation
    ///
    /// The pointer is redirected to the file where it is; nothing is copied.
    /// Returns `None` and leaves the pointer alone when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::CorruptData` if the file exists but is not a
    /// conversation, and storage errors from the pointer store.
    pub fn import_conversation(&self, name: &str, dir: &Path) -> Result<Option<ConversationRef>> {
        validate_name(name)?;
        let source = ConversationStore::new(absolute_dir(dir));
        if !source.exists(name) {
            tracing::info!("Nothing to import: {} not found in {}", name, dir.display());
            return Ok(None);
        }

        let turns = source.load(name)?;
        let reference = source.reference(name);
        self.pointer.set(&reference)?;
        tracing::info!("Imported {} ({} turns)", reference, turns.len());
        Ok(Some(reference))
    }

    /// Names of conversations in the canonical store
    pub fn list_conversation_names(&self) -> Result<BTreeSet<String>> {
        self.store.list()
    }

    /// Listing metadata for conversations in the canonical store
    pub fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        self.store.summaries()
    }

    /// Active conversation and its turns, or `None` when none is active
    pub fn history(&self) -> Result<Option<(ConversationRef, Vec<Turn>)>> {
        match self.state()? {
            SessionState::ActiveConversation(reference) => {
                let turns = store_for(&reference).load(&reference.name)?;
                Ok(Some((reference, turns)))
            }
            SessionState::NoActiveConversation => Ok(None),
        }
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.store.exists(base) {
            return base.to_string();
        }
        let name = (2..)
            .map(|n| format!("{}_{}", base, n))
            .find(|candidate| !self.store.exists(candidate))
            .unwrap_or_else(|| base.to_string());
        tracing::debug!("Name {} already taken, using {}", base, name);
        name
    }
}

fn store_for(reference: &ConversationRef) -> ConversationStore {
    ConversationStore::new(reference.directory.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::CompletionResponse;
    use crate::storage::FilePointerStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse> {
            Ok(CompletionResponse::new(self.0))
        }
    }

    fn manager(dir: &TempDir, reply: &'static str) -> ConversationManager {
        let provider: Arc<dyn Provider> = Arc::new(FixedProvider(reply));
        ConversationManager::new(
            ConversationStore::new(dir.path().join("conversations")),
            Box::new(FilePointerStore::new(dir.path().join("pointer.txt"))),
            provider.clone(),
            NamingService::new(provider, "namer"),
            ChatSettings {
                model: "m".to_string(),
                temperature: 0.5,
                system_prompt: "sys".to_string(),
            },
        )
    }

    #[test]
    fn test_unique_name_suffixes_existing() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(&dir, "x");
        manager.store().save("topic", &[]).unwrap();
        manager.store().save("topic_2", &[]).unwrap();
        assert_eq!(manager.unique_name("topic"), "topic_3");
        assert_eq!(manager.unique_name("fresh"), "fresh");
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(&dir, "x");
        let err = manager.send_message("   ").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParleyError>(),
            Some(ParleyError::User(_))
        ));
        assert_eq!(manager.state().unwrap(), SessionState::NoActiveConversation);
    }

    #[test]
    fn test_write_rejects_invalid_target_name() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(&dir, "x");
        assert!(manager.write_conversation("../evil", dir.path()).is_err());
    }

    #[test]
    fn test_history_without_active_conversation() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager(&dir, "x");
        assert!(manager.history().unwrap().is_none());
    }
}
