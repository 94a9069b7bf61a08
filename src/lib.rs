//! Parley - persistent, named conversations with an AI model
//!
//! This library provides the core functionality behind the `parley` CLI:
//! conversation storage, the active-conversation pointer, conversation
//! naming, and the session lifecycle that ties them to an AI provider.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Conversation files and the session pointer
//! - `session`: Conversation manager and session state
//! - `naming`: Deriving filesystem-safe names for new conversations
//! - `providers`: AI provider abstraction and implementations (Anthropic, Ollama)
//! - `personas`: Built-in system prompts
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: CLI command handlers
//!
//! # Example
//!
//! ```no_run
//! use parley::cli::Cli;
//! use parley::commands::build_manager;
//! use parley::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse_args();
//!     let config = Config::load("config/config.yaml", &cli)?;
//!     config.validate()?;
//!
//!     let manager = build_manager(&config)?;
//!     let reply = manager.send_message("How do I read a file in Rust?").await?;
//!     println!("{}", reply.content);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod naming;
pub mod personas;
pub mod providers;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{ParleyError, Result};
pub use naming::NamingService;
pub use session::{ChatSettings, ConversationManager, SessionState};
pub use storage::{ConversationRef, ConversationStore, FilePointerStore, Role, Turn};

#[cfg(test)]
pub mod test_utils;
