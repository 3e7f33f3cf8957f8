//! Interactive numbered menu over a [`ContactBook`]
//!
//! Input comes from a [`LineSource`] so the same loop runs against a
//! readline editor or a scripted list of answers. Output goes to any writer.

use std::collections::VecDeque;
use std::io::Write;

use colored::*;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::error::BookError;
use crate::record::{Contact, ContactFields};
use crate::store::ContactBook;

/// A source of user input lines
pub trait LineSource {
    /// Show `prompt` and read one line; `None` means end of input
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Readline-backed input with history and line editing
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { editor })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Ok(Some(line));
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - ask again
                    println!("^C");
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
            }
        }
    }
}

/// Pre-recorded answers, consumed front to back
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    View,
    Add,
    Edit,
    Delete,
    Search,
    Exit,
}

impl MenuAction {
    fn parse(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::View),
            "2" => Some(Self::Add),
            "3" => Some(Self::Edit),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Search),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Run the menu until the user exits or input ends, then flush the book
pub fn run(book: &mut ContactBook, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
    loop {
        writeln!(out)?;
        writeln!(out, "{}", "=== Contact Manager ===".bright_cyan().bold())?;
        writeln!(
            out,
            "1. View Contacts\n2. Add Contact\n3. Edit Contact\n4. Delete Contact\n5. Search\n6. Exit"
        )?;

        let Some(choice) = input.read_line("Choose (1-6): ")? else {
            break;
        };
        debug!(choice = %choice.trim(), "menu: choice");

        match MenuAction::parse(&choice) {
            Some(MenuAction::View) => show_contacts(out, book.contacts(), "Contacts")?,
            Some(MenuAction::Add) => add_contact(book, input, out)?,
            Some(MenuAction::Edit) => edit_contact(book, input, out)?,
            Some(MenuAction::Delete) => delete_contact(book, input, out)?,
            Some(MenuAction::Search) => search_contacts(book, input, out)?,
            Some(MenuAction::Exit) => break,
            None => writeln!(out, "{}", "Invalid option.".yellow())?,
        }
    }

    match book.flush() {
        Ok(()) => writeln!(out, "Exiting... Contacts saved.")?,
        Err(e) => {
            warn!(error = %e, "menu: final save failed");
            report(out, &e)?;
        }
    }
    Ok(())
}

fn show_contacts(out: &mut dyn Write, contacts: &[Contact], title: &str) -> Result<()> {
    if contacts.is_empty() {
        writeln!(out, "\nNo contacts found.")?;
        return Ok(());
    }
    writeln!(out, "\n--- {} ---", title)?;
    write_numbered(out, contacts.iter())
}

fn write_numbered<'a>(out: &mut dyn Write, contacts: impl Iterator<Item = &'a Contact>) -> Result<()> {
    for (i, contact) in contacts.enumerate() {
        writeln!(out, "{}) {}", i + 1, contact)?;
    }
    Ok(())
}

fn add_contact(book: &mut ContactBook, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "\n--- Add Contact ---")?;
    let name = input.read_line("Name: ")?.unwrap_or_default();
    let phone = input.read_line("Phone: ")?.unwrap_or_default();
    let email = input.read_line("Email: ")?.unwrap_or_default();

    match book.add(ContactFields::new(name, phone, email)) {
        Ok(_) => writeln!(out, "{} Contact added.", "✓".green())?,
        Err(BookError::Validation(_)) => writeln!(out, "{}", "Name and phone cannot be empty!".yellow())?,
        Err(e) => report(out, &e)?,
    }
    Ok(())
}

fn edit_contact(book: &mut ContactBook, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
    show_contacts(out, book.contacts(), "Contacts")?;
    if book.is_empty() {
        return Ok(());
    }

    let Some(position) = read_position(book, input, out, "Enter number to edit: ")? else {
        return Ok(());
    };
    let current = book.get(position)?.clone();

    let name = input.read_line(&format!("New name [{}]: ", current.name))?;
    let phone = input.read_line(&format!("New phone [{}]: ", current.phone))?;
    let email = input.read_line(&format!("New email [{}]: ", current.email))?;
    let fields = ContactFields::merged_with(&current, name.as_deref(), phone.as_deref(), email.as_deref());

    match book.update(position, fields) {
        Ok(_) => writeln!(out, "{} Contact updated.", "✓".green())?,
        Err(e) => report(out, &e)?,
    }
    Ok(())
}

fn delete_contact(book: &mut ContactBook, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
    show_contacts(out, book.contacts(), "Contacts")?;
    if book.is_empty() {
        return Ok(());
    }

    let Some(position) = read_position(book, input, out, "Enter number to delete: ")? else {
        return Ok(());
    };

    match book.remove(position) {
        Ok(removed) => writeln!(out, "{} Deleted contact: {}", "✓".green(), removed.name)?,
        Err(e) => report(out, &e)?,
    }
    Ok(())
}

fn search_contacts(book: &ContactBook, input: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
    let query = input.read_line("\nSearch query: ")?.unwrap_or_default();
    let hits = book.search(&query);

    if hits.is_empty() {
        writeln!(out, "No matches found.")?;
    } else {
        writeln!(out, "\n--- Search Results ---")?;
        write_numbered(out, hits.into_iter())?;
    }
    Ok(())
}

/// Read a 1-based entry number and turn it into a position in the book
fn read_position(
    book: &ContactBook,
    input: &mut dyn LineSource,
    out: &mut dyn Write,
    prompt: &str,
) -> Result<Option<usize>> {
    let answer = input.read_line(prompt)?.unwrap_or_default();
    let position = parse_entry_number(&answer, book.len());
    if position.is_none() {
        writeln!(out, "{}", "No such entry.".yellow())?;
    }
    Ok(position)
}

fn parse_entry_number(answer: &str, len: usize) -> Option<usize> {
    let number: usize = answer.trim().parse().ok()?;
    let position = number.checked_sub(1)?;
    (position < len).then_some(position)
}

fn report(out: &mut dyn Write, err: &BookError) -> Result<()> {
    match std::error::Error::source(err) {
        Some(cause) => writeln!(out, "{} {}: {}", "✗".red(), err, cause)?,
        None => writeln!(out, "{} {}", "✗".red(), err)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_script(book: &mut ContactBook, answers: &[&str]) -> String {
        colored::control::set_override(false);
        let mut input = ScriptedSource::new(answers.iter().copied());
        let mut out = Vec::new();
        run(book, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn seeded_book(temp: &TempDir) -> ContactBook {
        let mut book = ContactBook::open(temp.path().join("contacts.csv")).unwrap();
        book.add(ContactFields::new("Alice", "555-1111", "a@x.com")).unwrap();
        book.add(ContactFields::new("Bob", "555-2222", "")).unwrap();
        book
    }

    #[test]
    fn test_parse_entry_number() {
        assert_eq!(parse_entry_number("1", 2), Some(0));
        assert_eq!(parse_entry_number(" 2 ", 2), Some(1));
        assert_eq!(parse_entry_number("0", 2), None);
        assert_eq!(parse_entry_number("-1", 2), None);
        assert_eq!(parse_entry_number("3", 2), None);
        assert_eq!(parse_entry_number("two", 2), None);
    }

    #[test]
    fn test_view_empty_book() {
        let temp = TempDir::new().unwrap();
        let mut book = ContactBook::open(temp.path().join("contacts.csv")).unwrap();

        let output = run_script(&mut book, &["1", "6"]);

        assert!(output.contains("No contacts found."));
        assert!(output.contains("Exiting... Contacts saved."));
    }

    #[test]
    fn test_add_then_view() {
        let temp = TempDir::new().unwrap();
        let mut book = ContactBook::open(temp.path().join("contacts.csv")).unwrap();

        let output = run_script(&mut book, &["2", "Alice", "555-1111", "a@x.com", "1", "6"]);

        assert!(output.contains("Contact added."));
        assert!(output.contains("1) Alice | 555-1111 | a@x.com"));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_add_rejects_missing_phone() {
        let temp = TempDir::new().unwrap();
        let mut book = ContactBook::open(temp.path().join("contacts.csv")).unwrap();

        let output = run_script(&mut book, &["2", "Alice", "  ", "", "6"]);

        assert!(output.contains("Name and phone cannot be empty!"));
        assert!(book.is_empty());
    }

    #[test]
    fn test_edit_keeps_blank_fields() {
        let temp = TempDir::new().unwrap();
        let mut book = seeded_book(&temp);

        let output = run_script(&mut book, &["3", "2", "", "555-9999", "", "6"]);

        assert!(output.contains("Contact updated."));
        assert_eq!(book.contacts()[1], Contact {
            name: "Bob".to_string(),
            phone: "555-9999".to_string(),
            email: String::new(),
        });
    }

    #[test]
    fn test_delete_reports_name() {
        let temp = TempDir::new().unwrap();
        let mut book = seeded_book(&temp);

        let output = run_script(&mut book, &["4", "1", "6"]);

        assert!(output.contains("Deleted contact: Alice"));
        assert_eq!(book.len(), 1);
        assert_eq!(book.contacts()[0].name, "Bob");
    }

    #[test]
    fn test_bad_entry_number_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let mut book = seeded_book(&temp);

        let output = run_script(&mut book, &["4", "9", "3", "abc", "6"]);

        assert_eq!(output.matches("No such entry.").count(), 2);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_search_results() {
        let temp = TempDir::new().unwrap();
        let mut book = seeded_book(&temp);

        let output = run_script(&mut book, &["5", "ALI", "5", "zzz", "6"]);

        assert!(output.contains("--- Search Results ---"));
        assert!(output.contains("1) Alice | 555-1111 | a@x.com"));
        assert!(output.contains("No matches found."));
    }

    #[test]
    fn test_report_includes_storage_cause() {
        colored::control::set_override(false);
        let err = BookError::Storage {
            path: "contacts.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into(),
        };
        let mut out = Vec::new();

        report(&mut out, &err).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Storage error for contacts.csv"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_invalid_option_and_end_of_input() {
        let temp = TempDir::new().unwrap();
        let mut book = seeded_book(&temp);

        // No explicit exit: running out of input behaves like choosing Exit
        let output = run_script(&mut book, &["9"]);

        assert!(output.contains("Invalid option."));
        assert!(output.contains("Exiting... Contacts saved."));
    }
}
