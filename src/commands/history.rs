use crate::commands::print_turn;
use crate::error::Result;
use crate::session::{ConversationManager, SessionState};
use crate::storage::{ConversationSummary, Turn};
use colored::Colorize;
use prettytable::{format, Table};

/// Show the active conversation
///
/// With `raw`, prints the turns as JSON in the stored file format; otherwise
/// prints labelled turns.
pub fn show_history(manager: &ConversationManager, raw: bool) -> Result<()> {
    let Some((reference, turns)) = manager.history()? else {
        println!("{}", "No active conversation.".yellow());
        return Ok(());
    };

    if raw {
        println!("{}", render_raw(&turns)?);
        return Ok(());
    }

    println!("Conversation history: {}", reference.name.green().bold());
    if turns.is_empty() {
        println!("{}", "No conversation history available.".yellow());
        return Ok(());
    }
    println!();
    for turn in &turns {
        print_turn(turn);
    }
    Ok(())
}

/// List conversations in the store
pub fn list_conversations(manager: &ConversationManager) -> Result<()> {
    let summaries = manager.list_conversations()?;

    if summaries.is_empty() {
        println!("{}", "No conversations found.".yellow());
        return Ok(());
    }

    let active = match manager.state()? {
        SessionState::ActiveConversation(r) if r.directory == manager.store().dir() => {
            Some(r.name)
        }
        _ => None,
    };

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "Name".bold(),
        "Turns".bold(),
        "Last Updated".bold()
    ]);

    for ConversationSummary {
        name,
        turn_count,
        updated_at,
    } in summaries
    {
        let label = if active.as_deref() == Some(name.as_str()) {
            format!("{} *", name).cyan()
        } else {
            name.normal()
        };
        table.add_row(prettytable::row![
            label,
            turn_count,
            updated_at.format("%Y-%m-%d %H:%M").to_string()
        ]);
    }

    println!("\nConversations:");
    table.printstd();
    println!();
    println!(
        "Use {} to switch conversations.",
        "parley import <NAME> -d <DIR>".cyan()
    );
    Ok(())
}

fn render_raw(turns: &[Turn]) -> Result<String> {
    Ok(serde_json::to_string_pretty(turns)?)
}
