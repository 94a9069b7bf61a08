//! Command-line interface definition for Parley
//!
//! This module defines the CLI structure using clap's derive API. Each
//! subcommand maps onto one conversation manager operation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parley - persistent, named conversations with an AI model
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the directory holding conversation files
    #[arg(long, global = true)]
    pub conversations_directory: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Parley
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Send a message in the active conversation (starting one if needed)
    Chat {
        /// Message to send
        #[arg(required_unless_present_any = ["remove_last", "list_personas"])]
        message: Option<String>,

        /// Persona to use for this message
        #[arg(short, long)]
        persona: Option<String>,

        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,

        /// Override the sampling temperature
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Remove the last user/assistant exchange instead of sending
        #[arg(long, conflicts_with = "message")]
        remove_last: bool,

        /// List available personas
        #[arg(long, conflicts_with = "message")]
        list_personas: bool,
    },

    /// Detach from the active conversation (its file is kept)
    Reset,

    /// Copy the active conversation to another file
    Write {
        /// Name of the new conversation file (without extension)
        #[arg(short, long)]
        name: String,

        /// Directory to write into
        #[arg(short, long)]
        directory: PathBuf,
    },

    /// Show the active conversation
    History {
        /// Print the stored JSON instead of formatted turns
        #[arg(long)]
        raw: bool,
    },

    /// Make a conversation file the active conversation
    Import {
        /// Conversation name (file name without `.json`)
        conversation_name: String,

        /// Directory containing the conversation file
        #[arg(short, long)]
        directory: PathBuf,
    },

    /// List stored conversations
    List,

    /// Start an interactive chat session
    Interactive,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
