//! Terra CLI
//!
//! Command-line tools for the Terra catalog cache.
//!
//! # Commands
//!
//! - `fetch` - Read the catalog under a cache policy
//! - `show` - Look up one record by code
//! - `search` - Search cached records by name or capital
//! - `suggest` - Prefix suggestions over cached names and capitals
//! - `stats` - Display cache and sync statistics
//! - `clear` - Remove every cached record
//! - `history` / `recent` - Manage saved preferences

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use terra_core::{Config, SortOrder};
use terra_sync::{CachePolicy, Catalog, SyncConfig, DEFAULT_BASE_URL};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Terra offline-first catalog tools.
#[derive(Parser)]
#[command(name = "terra")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the data directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Catalog endpoint base URL
    #[arg(global = true, long, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Request timeout in seconds
    #[arg(global = true, long, default_value = "30")]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the catalog under a cache policy
    Fetch {
        /// Cache policy (cache-first, network-first, force-refresh, cache-only)
        #[arg(long, default_value = "cache-first")]
        policy: CachePolicy,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Look up one record by 3-letter or 2-letter code
    Show {
        /// Record code
        code: String,

        /// Cache policy (cache-first, network-first, force-refresh, cache-only)
        #[arg(long, default_value = "cache-first")]
        policy: CachePolicy,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Search cached records by name or capital
    Search {
        /// Search text; empty matches everything
        #[arg(default_value = "")]
        query: String,

        /// Only records in this region (repeatable)
        #[arg(short, long)]
        region: Vec<String>,

        /// Sort order (name-asc, name-desc, population-asc, ...)
        #[arg(short, long)]
        sort: Option<SortOrder>,

        /// Do not record the query in the search history
        #[arg(long)]
        no_history: bool,
    },

    /// Prefix suggestions over cached names and capitals
    Suggest {
        /// Prefix to complete
        prefix: String,

        /// Maximum number of suggestions
        #[arg(short, long, default_value = "5")]
        max: usize,
    },

    /// Display cache and sync statistics
    Stats {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Remove every cached record (preferences are kept)
    Clear,

    /// Manage the search history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage recently viewed records
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved queries, newest first
    List,
    /// Save a query
    Add {
        /// Query text
        query: String,
    },
    /// Remove a saved query
    Remove {
        /// Query text
        query: String,
    },
    /// Remove every saved query
    Clear,
}

#[derive(Subcommand)]
enum RecentAction {
    /// List recently viewed codes, newest first
    List,
    /// Remove every recently viewed entry
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("Terra CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Terra Core v{}", terra_core::VERSION);
        return Ok(());
    }

    let path = cli.path.ok_or("Data directory required (--path)")?;
    debug!(path = %path.display(), url = %cli.url, "opening catalog");
    let sync = SyncConfig::new(cli.url).with_timeout(Duration::from_secs(cli.timeout_secs));
    let catalog = Catalog::open(&path, &Config::default(), &sync)?;

    match cli.command {
        Commands::Fetch { policy, format } => {
            commands::fetch::run(&catalog, policy, &format).await?;
        }
        Commands::Show {
            code,
            policy,
            format,
        } => {
            commands::show::run(&catalog, &code, policy, &format).await?;
        }
        Commands::Search {
            query,
            region,
            sort,
            no_history,
        } => {
            commands::search::run(&catalog, &query, region, sort, !no_history)?;
        }
        Commands::Suggest { prefix, max } => {
            for suggestion in catalog.suggest(&prefix, max) {
                println!("{suggestion}");
            }
        }
        Commands::Stats { format } => {
            commands::stats::run(&catalog, &path, &format)?;
        }
        Commands::Clear => {
            catalog.clear_cache()?;
            println!("Cache cleared.");
        }
        Commands::History { action } => match action {
            HistoryAction::List => commands::prefs::list_history(&catalog),
            HistoryAction::Add { query } => commands::prefs::add_history(&catalog, &query)?,
            HistoryAction::Remove { query } => {
                commands::prefs::remove_history(&catalog, &query)?;
            }
            HistoryAction::Clear => catalog.preferences().clear_search_history()?,
        },
        Commands::Recent { action } => match action {
            RecentAction::List => commands::prefs::list_recent(&catalog),
            RecentAction::Clear => catalog.preferences().clear_recent()?,
        },
        Commands::Version => {}
    }

    Ok(())
}
