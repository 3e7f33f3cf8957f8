//! Contact record and the field values used to create or replace one

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BookError, RequiredField};

/// A single contact entry
///
/// Every field is stored trimmed. `email` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Contact {
    /// True when every field is empty (a padding row, not a contact)
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.phone.is_empty() && self.email.is_empty()
    }

    /// Check a lower-cased query against this contact
    ///
    /// Name and email are case-folded, phone is compared as stored.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.phone.contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.name, self.phone, self.email)
    }
}

/// Fully resolved values for a new or replacement contact
///
/// Values are raw user input; [`ContactFields::validate`] trims them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactFields {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl ContactFields {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Resolve an edit against the current record
    ///
    /// A missing or blank replacement keeps the existing value.
    pub fn merged_with(existing: &Contact, name: Option<&str>, phone: Option<&str>, email: Option<&str>) -> Self {
        fn pick(new: Option<&str>, old: &str) -> String {
            match new.map(str::trim) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => old.to_string(),
            }
        }

        Self {
            name: pick(name, &existing.name),
            phone: pick(phone, &existing.phone),
            email: pick(email, &existing.email),
        }
    }

    /// Trim every field and check the required ones
    pub fn validate(&self) -> Result<Contact, BookError> {
        let name = self.name.trim();
        let phone = self.phone.trim();

        if name.is_empty() {
            return Err(BookError::Validation(RequiredField::Name));
        }
        if phone.is_empty() {
            return Err(BookError::Validation(RequiredField::Phone));
        }

        Ok(Contact {
            name: name.to_string(),
            phone: phone.to_string(),
            email: self.email.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Contact {
        Contact {
            name: "Alice".to_string(),
            phone: "555-1111".to_string(),
            email: "a@x.com".to_string(),
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let contact = ContactFields::new("  Alice ", "\t555-1111", " a@x.com  ").validate().unwrap();
        assert_eq!(contact, alice());
    }

    #[test]
    fn test_validate_allows_empty_email() {
        let contact = ContactFields::new("Bob", "555-2222", "   ").validate().unwrap();
        assert_eq!(contact.email, "");
    }

    #[test]
    fn test_validate_rejects_missing_required() {
        let err = ContactFields::new("   ", "555", "").validate().unwrap_err();
        assert!(matches!(err, BookError::Validation(RequiredField::Name)));

        let err = ContactFields::new("Alice", "", "a@x.com").validate().unwrap_err();
        assert!(matches!(err, BookError::Validation(RequiredField::Phone)));
    }

    #[test]
    fn test_merged_with_keeps_blank_fields() {
        let fields = ContactFields::merged_with(&alice(), Some("  "), Some("555-9999"), None);
        assert_eq!(fields, ContactFields::new("Alice", "555-9999", "a@x.com"));
    }

    #[test]
    fn test_matches_folds_name_and_email_only() {
        let mut contact = alice();
        contact.phone = "555 EXT 2".to_string();

        assert!(contact.matches("ali"));
        assert!(contact.matches("@x.c"));
        assert!(contact.matches("555 "));
        assert!(!contact.matches("ext"));
    }

    #[test]
    fn test_display() {
        assert_eq!(alice().to_string(), "Alice | 555-1111 | a@x.com");
    }
}
