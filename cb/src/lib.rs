//! ContactBook - personal contact book backed by a flat CSV file
//!
//! Keeps an ordered list of name/phone/email entries in memory and rewrites
//! the whole file after every change.
//!
//! # Architecture
//!
//! ```text
//! cb (menu / subcommands)
//!  └── ContactBook      # owns the in-memory sequence, validates, saves
//!       └── codec       # name,phone,email rows <-> Vec<Contact>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use contactbook::{ContactBook, ContactFields};
//!
//! let mut book = ContactBook::open("contacts.csv")?;
//! book.add(ContactFields::new("Alice", "555-1111", "a@x.com"))?;
//! let hits = book.search("alice");
//! let removed = book.remove(0)?;
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod menu;
pub mod record;
mod store;

pub use codec::{CodecError, decode, encode};
pub use error::{BookError, BookResult, RequiredField, StorageError};
pub use record::{Contact, ContactFields};
pub use store::{ContactBook, load, save};

/// Default store file, relative to the working directory
pub const DEFAULT_STORE_FILE: &str = "contacts.csv";
