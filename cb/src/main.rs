//! ContactBook - personal contact book
//!
//! CLI entry point: interactive menu by default, one-shot subcommands otherwise.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use contactbook::cli::{Cli, Command, OutputFormat, entry_error};
use contactbook::config::Config;
use contactbook::menu::{self, EditorSource};
use contactbook::{Contact, ContactBook, ContactFields};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contactbook")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    // Log to file only, the terminal belongs to the menu
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("contactbook.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

fn print_contacts<'a>(contacts: impl IntoIterator<Item = &'a Contact>, format: OutputFormat) -> Result<()> {
    let contacts: Vec<&Contact> = contacts.into_iter().collect();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&contacts)?),
        OutputFormat::Text if contacts.is_empty() => println!("No contacts found"),
        OutputFormat::Text => {
            for (i, contact) in contacts.iter().enumerate() {
                println!("{}) {}", (i + 1).to_string().dimmed(), contact);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log level first so config warnings below reach the log file
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    info!(store = %config.store_path.display(), "contactbook starting");

    let mut book = ContactBook::open(&config.store_path)
        .context(format!("Failed to open contacts at {}", config.store_path.display()))?;

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let mut input = EditorSource::new()?;
            menu::run(&mut book, &mut input, &mut std::io::stdout())?;
        }
        Command::List { format } => print_contacts(book.contacts(), format)?,
        Command::Add { name, phone, email } => {
            let added = book.add(ContactFields::new(name, phone, email))?;
            println!("{} Added contact: {}", "✓".green(), added.name.cyan());
        }
        Command::Edit {
            number,
            name,
            phone,
            email,
        } => {
            let position = Command::position(number);
            let current = book.get(position).map_err(|e| entry_error(number, e))?.clone();
            let fields = ContactFields::merged_with(&current, name.as_deref(), phone.as_deref(), email.as_deref());
            let updated = book.update(position, fields).map_err(|e| entry_error(number, e))?;
            println!("{} Updated contact: {}", "✓".green(), updated);
        }
        Command::Delete { number } => {
            let removed = book
                .remove(Command::position(number))
                .map_err(|e| entry_error(number, e))?;
            println!("{} Deleted contact: {}", "✓".green(), removed.name);
        }
        Command::Search { query, format } => {
            let hits = book.search(&query);
            if hits.is_empty() && format == OutputFormat::Text {
                println!("No matches found");
            } else {
                print_contacts(hits, format)?;
            }
        }
    }

    Ok(())
}
