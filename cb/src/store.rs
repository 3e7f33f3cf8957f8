//! Core ContactBook implementation

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::codec;
use crate::error::{BookError, BookResult};
use crate::record::{Contact, ContactFields};

/// Load every contact stored at `path`
///
/// A missing file is an empty book, not an error.
pub fn load(path: impl AsRef<Path>) -> BookResult<Vec<Contact>> {
    let path = path.as_ref();
    debug!(path = %path.display(), "load: called");

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "load: no store file yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(BookError::storage(path, e)),
    };

    let contacts = codec::decode(&text).map_err(|e| BookError::storage(path, e))?;
    debug!(count = contacts.len(), "load: decoded contacts");
    Ok(contacts)
}

/// Replace the file at `path` with `contacts`
///
/// Writes a temporary file next to the target and renames it into place,
/// so an interrupted save leaves the previous content intact.
pub fn save(path: impl AsRef<Path>, contacts: &[Contact]) -> BookResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), count = contacts.len(), "save: called");

    write_atomic(path, codec::encode(contacts).as_bytes()).map_err(|e| BookError::storage(path, e))?;

    info!(path = %path.display(), count = contacts.len(), "Saved contacts");
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;

    // The temp file starts out private; keep the mode of the file it replaces
    match fs::metadata(path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// The session's contact book
///
/// Owns the ordered contact sequence for the lifetime of the session. Every
/// mutation is saved to disk before it becomes visible in memory, so a
/// failed operation leaves the book unchanged.
#[derive(Debug)]
pub struct ContactBook {
    path: PathBuf,
    contacts: Vec<Contact>,
}

impl ContactBook {
    /// Open the book stored at `path`, loading whatever is already there
    pub fn open(path: impl AsRef<Path>) -> BookResult<Self> {
        let path = path.as_ref().to_path_buf();
        let contacts = load(&path)?;
        info!(path = %path.display(), count = contacts.len(), "Opened contact book");
        Ok(Self { path, contacts })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All contacts in insertion order
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Contact at a zero-based position
    pub fn get(&self, position: usize) -> BookResult<&Contact> {
        self.contacts.get(position).ok_or(BookError::OutOfRange {
            position,
            len: self.contacts.len(),
        })
    }

    /// Write the current sequence to disk
    pub fn flush(&self) -> BookResult<()> {
        save(&self.path, &self.contacts)
    }

    /// Append a new contact
    pub fn add(&mut self, fields: ContactFields) -> BookResult<&Contact> {
        debug!(?fields, "add: called");
        let contact = fields.validate()?;

        let mut next = self.contacts.clone();
        next.push(contact);
        self.commit(next)?;

        info!(count = self.contacts.len(), "Added contact");
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    /// Replace the contact at `position` with fully resolved values
    pub fn update(&mut self, position: usize, fields: ContactFields) -> BookResult<&Contact> {
        debug!(position, ?fields, "update: called");
        self.get(position)?;
        let contact = fields.validate()?;

        let mut next = self.contacts.clone();
        next[position] = contact;
        self.commit(next)?;

        info!(position, "Updated contact");
        Ok(&self.contacts[position])
    }

    /// Remove the contact at `position`, returning it
    pub fn remove(&mut self, position: usize) -> BookResult<Contact> {
        debug!(position, "remove: called");
        self.get(position)?;

        let mut next = self.contacts.clone();
        let removed = next.remove(position);
        self.commit(next)?;

        info!(position, name = %removed.name, "Removed contact");
        Ok(removed)
    }

    /// Contacts matching `query`, in insertion order
    ///
    /// The query is lower-cased and matched as a substring of the lower-cased
    /// name, the phone as stored, or the lower-cased email. An empty query
    /// matches every contact.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let needle = query.to_lowercase();
        let hits: Vec<&Contact> = self.contacts.iter().filter(|c| c.matches(&needle)).collect();
        debug!(query, hits = hits.len(), "search: done");
        hits
    }

    fn commit(&mut self, next: Vec<Contact>) -> BookResult<()> {
        save(&self.path, &next)?;
        self.contacts = next;
        Ok(())
    }
}
