//! Parley - persistent, named conversations with an AI model
//!
//! Main entry point for the parley CLI.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley::cli::{Cli, Commands};
use parley::commands;
use parley::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat {
            message,
            list_personas,
            remove_last,
            ..
        } => {
            if list_personas {
                commands::list_personas();
                return Ok(());
            }

            let manager = commands::build_manager(&config)?;
            if remove_last {
                tracing::info!("Removing last interaction");
                commands::remove_last(&manager)?;
                return Ok(());
            }

            // clap guarantees a message when neither flag is set
            let message = message.unwrap_or_default();
            tracing::info!("Sending message");
            commands::chat(&manager, &message).await?;
            Ok(())
        }
        Commands::Reset => {
            let manager = commands::build_manager(&config)?;
            commands::reset(&manager)?;
            Ok(())
        }
        Commands::Write { name, directory } => {
            tracing::info!("Writing conversation to {}", directory.display());
            let manager = commands::build_manager(&config)?;
            commands::write(&manager, &name, &directory)?;
            Ok(())
        }
        Commands::History { raw } => {
            let manager = commands::build_manager(&config)?;
            commands::history::show_history(&manager, raw)?;
            Ok(())
        }
        Commands::Import {
            conversation_name,
            directory,
        } => {
            tracing::info!(
                "Importing {} from {}",
                conversation_name,
                directory.display()
            );
            let manager = commands::build_manager(&config)?;
            commands::import(&manager, &conversation_name, &directory)?;
            Ok(())
        }
        Commands::List => {
            let manager = commands::build_manager(&config)?;
            commands::history::list_conversations(&manager)?;
            Ok(())
        }
        Commands::Interactive => {
            tracing::info!("Starting interactive chat mode");
            let manager = commands::build_manager(&config)?;
            commands::interactive::run_interactive(&manager).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs are written to stderr.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "parley=debug" } else { "parley=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
