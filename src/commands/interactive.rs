//! Interactive chat mode
//!
//! A readline loop where every non-command line is sent with
//! `send_message`. Lines starting with `/` are session commands and are
//! case-insensitive.

use crate::commands::{print_turn, remove_last};
use crate::commands::history::show_history;
use crate::error::Result;
use crate::session::{ConversationManager, SessionState};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Commands recognized inside the interactive loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Detach and start fresh on the next message
    Reset,
    /// Remove the last exchange
    Undo,
    /// Print the active conversation
    History,
    /// Print command help
    Help,
    /// Leave the loop
    Exit,
    /// Unrecognized `/command`
    Unknown(String),
    /// Not a command; send as a message
    None,
}

/// Classify a line of input
///
/// # Examples
///
/// ```
/// use parley::commands::interactive::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/EXIT"), SpecialCommand::Exit);
/// assert_eq!(parse_special_command("hello"), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> SpecialCommand {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return SpecialCommand::None;
    }
    match trimmed.to_lowercase().as_str() {
        "/reset" | "/new" => SpecialCommand::Reset,
        "/undo" => SpecialCommand::Undo,
        "/history" => SpecialCommand::History,
        "/help" | "/?" => SpecialCommand::Help,
        "/exit" | "/quit" | "/q" => SpecialCommand::Exit,
        other => SpecialCommand::Unknown(other.to_string()),
    }
}

/// Print the interactive command reference
pub fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  /reset    Start a new conversation on the next message");
    println!("  /undo     Remove the last exchange");
    println!("  /history  Show the active conversation");
    println!("  /help     Show this help");
    println!("  /exit     Leave interactive mode");
    println!();
}

/// Run the interactive loop until the user exits
///
/// Failed sends are reported and the loop continues; nothing is persisted
/// for a failed exchange.
pub async fn run_interactive(manager: &ConversationManager) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    match manager.state()? {
        SessionState::ActiveConversation(reference) => {
            println!("Continuing conversation {}", reference.name.green().bold())
        }
        SessionState::NoActiveConversation => {
            println!("{}", "New conversation; it is named after your first message.".dimmed())
        }
    }
    println!("Type {} for commands.\n", "/help".cyan());

    loop {
        match rl.readline(&format!("{} ", ">".magenta().bold())) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                match parse_special_command(trimmed) {
                    SpecialCommand::Reset => {
                        manager.reset_conversation()?;
                        println!("Conversation reset.\n");
                    }
                    SpecialCommand::Undo => remove_last(manager)?,
                    SpecialCommand::History => show_history(manager, false)?,
                    SpecialCommand::Help => print_help(),
                    SpecialCommand::Exit => break,
                    SpecialCommand::Unknown(command) => {
                        println!(
                            "{}",
                            format!("Unknown command: {} (type /help)", command).yellow()
                        );
                    }
                    SpecialCommand::None => match manager.send_message(trimmed).await {
                        Ok(reply) => print_turn(&reply),
                        Err(e) => {
                            tracing::error!("Message failed: {:#}", e);
                            eprintln!("{} {:#}\n", "Error:".red().bold(), e);
                        }
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
