//! Comma-separated text codec for contact rows
//!
//! Rows hold `name,phone,email` in that order with no header. A field that
//! starts with `"` is quoted: commas and line breaks inside it are literal
//! and `""` stands for one quote character. On output a field is quoted only
//! when it contains a comma, a quote or a line break.

use thiserror::Error;

use crate::record::Contact;

const DELIMITER: char = ',';
const QUOTE: char = '"';
const LINE_TERMINATOR: &str = "\r\n";
const FIELD_COUNT: usize = 3;

/// Errors that can occur while decoding contact rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: expected at most 3 fields, found {count}")]
    TooManyFields { line: usize, count: usize },
}

/// Decode contact rows
///
/// Missing trailing fields decode as empty strings. Every field is trimmed
/// and rows that end up entirely blank are dropped.
pub fn decode(text: &str) -> Result<Vec<Contact>, CodecError> {
    let mut contacts = Vec::new();

    for (line, fields) in parse_rows(text)? {
        if fields.len() > FIELD_COUNT {
            return Err(CodecError::TooManyFields {
                line,
                count: fields.len(),
            });
        }

        let mut fields = fields.into_iter().map(|f| f.trim().to_string());
        let contact = Contact {
            name: fields.next().unwrap_or_default(),
            phone: fields.next().unwrap_or_default(),
            email: fields.next().unwrap_or_default(),
        };

        if !contact.is_blank() {
            contacts.push(contact);
        }
    }

    Ok(contacts)
}

/// Encode contacts as rows, one per contact
pub fn encode(contacts: &[Contact]) -> String {
    let mut out = String::new();

    for contact in contacts {
        for (i, field) in [&contact.name, &contact.phone, &contact.email].into_iter().enumerate() {
            if i > 0 {
                out.push(DELIMITER);
            }
            write_field(&mut out, field);
        }
        out.push_str(LINE_TERMINATOR);
    }

    out
}

fn write_field(out: &mut String, field: &str) {
    let needs_quotes = field.contains([DELIMITER, QUOTE, '\r', '\n']);
    if !needs_quotes {
        out.push_str(field);
        return;
    }

    out.push(QUOTE);
    for c in field.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field (row start or just after a delimiter)
    FieldStart,
    Unquoted,
    Quoted,
    /// Saw a quote inside a quoted field: either an escape or the closing quote
    QuoteInQuoted,
    /// Past the closing quote, still before the delimiter
    AfterQuoted,
}

/// Split text into rows of raw fields, tagged with the line each row starts on
///
/// Empty lines produce no row.
fn parse_rows(text: &str) -> Result<Vec<(usize, Vec<String>)>, CodecError> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut line = 1;
    let mut row_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let is_break = c == '\n' || c == '\r';

        if is_break && state != State::Quoted {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            // A bare line break with nothing before it is an empty line, not a row
            if !(state == State::FieldStart && fields.is_empty()) {
                fields.push(std::mem::take(&mut field));
                rows.push((row_line, std::mem::take(&mut fields)));
            }
            state = State::FieldStart;
            line += 1;
            row_line = line;
            continue;
        }

        // Line breaks inside a quoted field still advance the line count
        if c == '\n' || (c == '\r' && chars.peek() != Some(&'\n')) {
            line += 1;
        }

        state = match (state, c) {
            (State::FieldStart, QUOTE) => State::Quoted,
            (State::FieldStart | State::Unquoted | State::AfterQuoted | State::QuoteInQuoted, DELIMITER) => {
                fields.push(std::mem::take(&mut field));
                State::FieldStart
            }
            (State::FieldStart | State::Unquoted, _) => {
                field.push(c);
                State::Unquoted
            }
            (State::Quoted, QUOTE) => State::QuoteInQuoted,
            (State::Quoted, _) => {
                field.push(c);
                State::Quoted
            }
            (State::QuoteInQuoted, QUOTE) => {
                field.push(QUOTE);
                State::Quoted
            }
            // Text after a closing quote is kept verbatim
            (State::QuoteInQuoted | State::AfterQuoted, _) => {
                field.push(c);
                State::AfterQuoted
            }
        };
    }

    match state {
        State::Quoted => return Err(CodecError::UnterminatedQuote { line: row_line }),
        State::FieldStart if fields.is_empty() => {}
        _ => {
            fields.push(field);
            rows.push((row_line, fields));
        }
    }

    Ok(rows)
}
