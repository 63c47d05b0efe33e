//! Media catalog client
//!
//! Terminal client for the media catalog API: an interactive table view
//! (the default) plus one-shot subcommands for scripting.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use media_core::{Config, NewEntry};

mod client;
mod commands;
mod output;
mod prompt;
mod tui;

use client::ApiClient;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "media")]
#[command(about = "Media catalog - books, movies and magazines")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// API base URL (overrides config)
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui {
        /// Run the API server in this process as well
        #[arg(long)]
        embedded: bool,
    },
    /// List entries
    #[command(alias = "ls")]
    List {
        /// Only entries in this category ("All" lists everything)
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
    /// Find the first entry with a name (case-insensitive)
    Search {
        /// Name to look up
        name: String,
    },
    /// Show a single entry
    Show {
        /// Entry ID
        id: String,
    },
    /// Add an entry
    #[command(alias = "create")]
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        author: String,
        /// Release date (DD-MM-YYYY)
        #[arg(long)]
        date: String,
        #[arg(long)]
        category: String,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete {
        /// Entry ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_file, bind_addr, server_url, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need a server
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    let command = cli.command.unwrap_or(Commands::Tui { embedded: false });
    if let Commands::Tui { embedded } = command {
        return tui::run(&config, embedded).await;
    }

    let client = ApiClient::new(&config.server_url)?;

    match command {
        Commands::List { category } => commands::entry::list(&client, category, &output).await,
        Commands::Search { name } => commands::entry::search(&client, name, &output).await,
        Commands::Show { id } => commands::entry::show(&client, id, &output).await,
        Commands::Add {
            name,
            author,
            date,
            category,
        } => {
            let new = NewEntry::new(name, author, date, category);
            commands::entry::add(&client, new, &output).await
        }
        Commands::Delete { id, yes } => commands::entry::delete(&client, id, yes, &output).await,
        Commands::Tui { .. } | Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
