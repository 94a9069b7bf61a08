/*!
Command handlers for the CLI

Each handler maps one CLI subcommand onto a conversation manager operation
and prints the outcome. No session logic lives here.
*/

use crate::config::Config;
use crate::error::Result;
use crate::naming::NamingService;
use crate::personas;
use crate::providers::create_provider;
use crate::session::{ChatSettings, ConversationManager};
use crate::storage::{ConversationStore, FilePointerStore, Role, Turn};
use colored::Colorize;
use prettytable::{format, Table};
use std::path::Path;

// Conversation listing and history display
pub mod history;

// Interactive chat loop
pub mod interactive;

/// Build a conversation manager from configuration
///
/// # Errors
///
/// Returns error if the persona is unknown, the provider cannot be created,
/// or no storage location can be determined
pub fn build_manager(config: &Config) -> Result<ConversationManager> {
    let system_prompt = personas::resolve(&config.chat.persona)?;
    let provider = create_provider(&config.provider.provider_type, &config.provider)?;
    let conversations_dir = config.conversations_dir()?;
    let pointer_path = config.pointer_path()?;

    tracing::debug!(
        "Conversations in {}, pointer at {}",
        conversations_dir.display(),
        pointer_path.display()
    );

    Ok(ConversationManager::new(
        ConversationStore::new(conversations_dir),
        Box::new(FilePointerStore::new(pointer_path)),
        provider.clone(),
        NamingService::new(provider, config.chat.naming_model.clone()),
        ChatSettings {
            model: config.chat.model.clone(),
            temperature: config.chat.temperature,
            system_prompt: system_prompt.to_string(),
        },
    ))
}

/// Send one message and print the reply
pub async fn chat(manager: &ConversationManager, message: &str) -> Result<()> {
    let reply = manager.send_message(message).await?;
    print_turn(&reply);
    Ok(())
}

/// Remove the last exchange of the active conversation
pub fn remove_last(manager: &ConversationManager) -> Result<()> {
    if manager.remove_last_interaction()? {
        println!("Last interaction removed from the conversation history.");
    } else {
        println!(
            "{}",
            "No interactions to remove from the conversation history.".yellow()
        );
    }
    Ok(())
}

/// Print the available personas
pub fn list_personas() {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(prettytable::row!["Persona".bold(), "Description".bold()]);
    for (name, prompt) in personas::PERSONAS {
        table.add_row(prettytable::row![name.cyan(), prompt]);
    }
    println!("\nAvailable Personas:");
    table.printstd();
}

/// Detach from the active conversation
pub fn reset(manager: &ConversationManager) -> Result<()> {
    manager.reset_conversation()?;
    eprintln!("Conversation reset.");
    Ok(())
}

/// Copy the active conversation to another file
pub fn write(manager: &ConversationManager, name: &str, directory: &Path) -> Result<()> {
    match manager.write_conversation(name, directory)? {
        Some(path) => println!("Conversation saved to: {}", path.display().to_string().green()),
        None => println!("{}", "No conversation history available to save.".yellow()),
    }
    Ok(())
}

/// Point at an existing conversation file
pub fn import(manager: &ConversationManager, name: &str, directory: &Path) -> Result<()> {
    match manager.import_conversation(name, directory)? {
        Some(reference) => println!("Imported conversation: {}", reference.to_string().green()),
        None => println!(
            "{}",
            format!("Conversation file not found: {}.json", name).yellow()
        ),
    }
    Ok(())
}

/// Print a single turn with a role label
pub fn print_turn(turn: &Turn) {
    match turn.role {
        Role::User => {
            println!("{}", "You:".magenta().bold());
            println!("{}\n", turn.content.magenta());
        }
        Role::Assistant => {
            println!("{}", "Assistant:".cyan().bold());
            println!("{}\n", turn.content);
        }
    }
}
