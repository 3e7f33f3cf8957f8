//! CLI argument parsing for contactbook

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::error::BookError;

#[derive(Parser, Debug)]
#[command(name = "cb")]
#[command(author, version, about = "Personal contact book", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Contacts file (overrides the config file)
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// Subcommand to execute (interactive menu when omitted)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive menu
    Menu,

    /// List all contacts
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Add a contact
    Add {
        /// Contact name
        #[arg(short, long)]
        name: String,

        /// Phone number
        #[arg(short, long)]
        phone: String,

        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,
    },

    /// Edit a contact; omitted fields keep their current value
    Edit {
        /// Entry number as shown by `list` (starting at 1)
        #[arg(required = true, value_parser = clap::value_parser!(u64).range(1..))]
        number: u64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New phone number
        #[arg(short, long)]
        phone: Option<String>,

        /// New email address
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Delete a contact
    Delete {
        /// Entry number as shown by `list` (starting at 1)
        #[arg(required = true, value_parser = clap::value_parser!(u64).range(1..))]
        number: u64,
    },

    /// Search name, phone and email
    Search {
        /// Text to look for (case-insensitive for name and email)
        #[arg(required = true)]
        query: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

impl Command {
    /// Zero-based position for an entry number shown to the user
    pub fn position(number: u64) -> usize {
        usize::try_from(number.saturating_sub(1)).unwrap_or(usize::MAX)
    }
}

/// Restate a range error with the entry number the user typed
pub fn entry_error(number: u64, err: BookError) -> eyre::Report {
    match err {
        BookError::OutOfRange { len, .. } => eyre::eyre!("No entry {} (book has {})", number, len),
        other => other.into(),
    }
}
