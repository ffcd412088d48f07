//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::{OutputFormat, DEFAULT_EXPORT_FILE};

/// Quote Keeper - store, pick and sync quotes from the terminal.
#[derive(Parser, Debug)]
#[command(name = "quote-keeper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format: text, json, or table.
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,

    /// Path to a config file (defaults to ~/.quote-keeper/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a random quote.
    Random {
        /// Restrict to this category ("all" for none). Defaults to the remembered filter.
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add a new quote.
    Add {
        /// Quote text (at least 3 characters).
        text: String,

        /// Category (at least 2 characters).
        category: String,
    },

    /// Change the category of the first quote with exactly this text.
    SetCategory {
        /// Exact quote text.
        text: String,

        /// New category.
        category: String,
    },

    /// List quotes matching a category.
    List {
        /// Restrict to this category ("all" for none). Defaults to the remembered filter.
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List the distinct categories.
    Categories,

    /// Show or set the remembered category filter.
    Filter {
        /// New filter value ("all" to clear).
        value: Option<String>,
    },

    /// Export all quotes as pretty JSON.
    Export {
        /// Output file path.
        #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },

    /// Replace all quotes with the contents of a JSON file.
    Import {
        /// JSON file containing an array of quotes.
        file: PathBuf,
    },

    /// Sync once with the remote endpoint.
    Sync,

    /// Sync periodically until interrupted.
    Daemon {
        /// Seconds between syncs (overrides config).
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Show data and config paths being used.
    Paths,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
