use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use parley::error::{ParleyError, Result};
use parley::providers::{CompletionRequest, CompletionResponse, Provider};
use parley::session::{ChatSettings, ConversationManager};
use parley::storage::{ConversationStore, FilePointerStore};
use parley::NamingService;

/// Provider that replays scripted replies and records every request
///
/// `Err` entries are returned as invocation errors. When the script runs
/// out, every further call fails.
#[allow(dead_code)]
pub struct MockProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn new(script: Vec<std::result::Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Every reply succeeds, in order
    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(*r)).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse::new(text)),
            Some(Err(message)) => Err(ParleyError::Invocation(message).into()),
            None => Err(ParleyError::Invocation("no scripted reply left".to_string()).into()),
        }
    }
}

/// Temporary workspace holding a conversations directory and a pointer file
#[allow(dead_code)]
pub struct TestWorkspace {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create tempdir"),
        }
    }

    pub fn conversations_dir(&self) -> PathBuf {
        self.dir.path().join("conversations")
    }

    pub fn pointer_path(&self) -> PathBuf {
        self.dir.path().join("current_conversation.txt")
    }

    pub fn store(&self) -> ConversationStore {
        ConversationStore::new(self.conversations_dir())
    }

    /// Build a manager over this workspace
    ///
    /// Each call yields a fresh manager, mirroring a new CLI invocation.
    pub fn manager(&self, provider: Arc<MockProvider>) -> ConversationManager {
        manager_with_store(provider, self.conversations_dir(), &self.pointer_path())
    }

    pub fn read_conversation(&self, name: &str) -> serde_json::Value {
        let raw = fs::read_to_string(self.conversations_dir().join(format!("{}.json", name)))
            .expect("failed to read conversation file");
        serde_json::from_str(&raw).expect("conversation file is not JSON")
    }
}

/// Build a manager over an arbitrary store directory and pointer file
#[allow(dead_code)]
pub fn manager_with_store(
    provider: Arc<MockProvider>,
    conversations_dir: impl Into<PathBuf>,
    pointer_path: &Path,
) -> ConversationManager {
    let provider: Arc<dyn Provider> = provider;
    ConversationManager::new(
        ConversationStore::new(conversations_dir),
        Box::new(FilePointerStore::new(pointer_path)),
        provider.clone(),
        NamingService::new(provider, "naming-model"),
        ChatSettings {
            model: "reply-model".to_string(),
            temperature: 0.7,
            system_prompt: "You are a helpful assistant.".to_string(),
        },
    )
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
