//! Quotebook CLI
//!
//! Command-line interface for Quotebook - show, collect and sync quotes.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quotebook_core::{App, Config, Resolution};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Quotebook - categorized quotes with remote sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote
    Show {
        /// Only pick from this category (defaults to the saved filter)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show the quote displayed last in this session
    Last,
    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Quote category
        category: String,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Only list this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories
    Categories,
    /// Show or set the saved category filter
    Filter {
        /// Category, or "all"
        value: Option<String>,
    },
    /// Export all quotes to quotes.json
    Export {
        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Import quotes from a JSON file
    Import {
        /// File containing a JSON array of quotes
        file: PathBuf,
    },
    /// Sync once with the remote server
    Sync {
        /// How to settle conflicts
        #[arg(short, long, value_enum, default_value_t = KeepChoice::Ask)]
        keep: KeepChoice,
    },
    /// Sync periodically until interrupted
    Watch {
        /// Seconds between syncs (defaults to sync_interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
        /// How to settle conflicts
        #[arg(short, long, value_enum, default_value_t = KeepChoice::Local)]
        keep: KeepChoice,
    },
    /// Send a quote to the remote server without storing it
    Post {
        /// Quote text
        text: String,
        /// Quote category
        category: String,
    },
    /// Show status
    Status,
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
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Conflict policy for sync commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeepChoice {
    /// Keep the local quote
    Local,
    /// Take the server quote
    Server,
    /// Ask for each conflict
    Ask,
}

impl KeepChoice {
    /// The fixed resolution, or `None` when the user must be asked
    pub fn resolution(self) -> Option<Resolution> {
        match self {
            KeepChoice::Local => Some(Resolution::KeepLocal),
            KeepChoice::Server => Some(Resolution::KeepServer),
            KeepChoice::Ask => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the collection
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    init_logging(&config);

    let app = App::open(&config)?;

    let is_read = matches!(
        &cli.command,
        Commands::Show { .. } | Commands::List { .. } | Commands::Categories
    );

    // Pull remote quotes before read commands (to show the latest data)
    if is_read && config.sync_enabled {
        commands::sync::auto_sync(&app, &output).await;
    }

    let result = match cli.command {
        Commands::Show { category } => commands::quote::show(&app, category, &output).await,
        Commands::Last => commands::quote::last(&app, &output),
        Commands::Add { text, category } => {
            commands::quote::add(&app, &text, &category, &output).await
        }
        Commands::List { category } => commands::quote::list(&app, category, &output).await,
        Commands::Categories => commands::category::list(&app, &output).await,
        Commands::Filter { value } => commands::category::filter(&app, value, &output).await,
        Commands::Export { dir } => commands::transfer::export(&app, &dir, &output).await,
        Commands::Import { file } => commands::transfer::import(&app, &file, &output).await,
        Commands::Sync { keep } => commands::sync::sync(&app, keep, &output).await,
        Commands::Watch { interval, keep } => {
            let interval = interval
                .map(|secs| std::time::Duration::from_secs(secs.max(1)))
                .unwrap_or_else(|| config.sync_interval());
            commands::sync::watch(&app, interval, keep, &output).await
        }
        Commands::Post { text, category } => {
            commands::post::post(&app, &text, &category, &output).await
        }
        Commands::Status => commands::status::show(&app, &config, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    app.shutdown();
    if let Some(hint) = result.as_ref().err().and_then(storage_hint) {
        eprintln!("hint: {}", hint);
    }
    result
}

/// Recovery hint for a storage failure anywhere in the error chain
fn storage_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| match cause.downcast_ref::<quotebook_core::Error>() {
            Some(quotebook_core::Error::Storage(e)) => e.hint(),
            _ => None,
        })
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

/// Initialize file logging when QUOTEBOOK_LOG is set
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("QUOTEBOOK_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "quotebook_core={},quotebook_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
