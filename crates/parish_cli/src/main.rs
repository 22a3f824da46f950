//! Parish CLI
//!
//! Operator console for Parish record stores.
//!
//! # Commands
//!
//! - `inspect` - Display record counts and backend metadata
//! - `list` - List records of one kind
//! - `show` - Show a single record
//! - `create` - Create a record from a JSON body
//! - `update` - Apply a JSON patch to a record
//! - `delete` - Delete a record
//! - `verify` - Check referential integrity

mod commands;

use clap::{Parser, Subcommand};
use parish_core::{Store, StoreConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Parish command-line record tools.
#[derive(Parser)]
#[command(name = "parish")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend (file, sqlite, memory); read from the
    /// environment when omitted
    #[arg(global = true, short, long)]
    backend: Option<String>,

    /// Path to the data file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display record counts and backend metadata
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List records of one kind
    List {
        /// Entity kind, e.g. member or financial_record
        kind: String,
    },

    /// Show a single record
    Show {
        /// Entity kind
        kind: String,
        /// Record id
        id: String,
    },

    /// Create a record from a JSON body
    Create {
        /// Entity kind
        kind: String,
        /// JSON object with the record's fields
        #[arg(short, long)]
        data: String,
    },

    /// Apply a JSON patch to a record
    Update {
        /// Entity kind
        kind: String,
        /// Record id
        id: String,
        /// JSON object with the fields to change
        #[arg(short, long)]
        data: String,
    },

    /// Delete a record
    Delete {
        /// Entity kind
        kind: String,
        /// Record id
        id: String,
    },

    /// Check referential integrity without mutating
    Verify,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { format } => {
            let config = resolve_config(cli.backend.as_deref(), cli.path)?;
            let description = config.describe();
            let store = Store::open(config)?;
            commands::inspect::run(&store, &description, &format)?;
        }
        Commands::List { kind } => {
            let config = resolve_config(cli.backend.as_deref(), cli.path)?;
            let store = Store::open(config)?;
            commands::list::run(&store, &kind)?;
        }
        Commands::Show { kind, id } => {
            let config = resolve_config(cli.backend.as_deref(), cli.path)?;
            let store = Store::open(config)?;
            commands::show::run(&store, &kind, &id)?;
        }
        Commands::Create { kind, data } => {
            let config = resolve_config(cli.backend.as_deref(), cli.path)?;
            let store = Store::open(config)?;
            commands::create::run(&store, &kind, &data)?;
        }
        Commands::Update { kind, id, data } => {
            let config = resolve_config(cli.backend.as_deref(), cli.path)?;
            let store = Store::open(config)?;
            commands::update::run(&store, &kind, &id, &data)?;
        }
        Commands::Delete { kind, id } => {
            let config = resolve_config(cli.backend.as_deref(), cli.path)?;
            let store = Store::open(config)?;
            commands::delete::run(&store, &kind, &id)?;
        }
        Commands::Verify => {
            let config = resolve_config(cli.backend.as_deref(), cli.path)?;
            let store = Store::open(config)?;
            commands::verify::run(&store)?;
        }
        Commands::Version => {
            println!("Parish CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Builds the store configuration from flags, falling back to the
/// environment when no backend flag is given.
fn resolve_config(
    backend: Option<&str>,
    path: Option<PathBuf>,
) -> Result<StoreConfig, Box<dyn std::error::Error>> {
    let Some(backend) = backend else {
        return Ok(StoreConfig::from_env()?);
    };
    let config = match backend {
        "file" => StoreConfig::file(path.ok_or("--path is required for the file backend")?),
        "sqlite" => StoreConfig::sqlite(path.ok_or("--path is required for the sqlite backend")?),
        "memory" => StoreConfig::memory(),
        other => return Err(format!("unknown backend '{other}'").into()),
    };
    Ok(config)
}
