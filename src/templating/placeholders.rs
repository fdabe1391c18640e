//! Mapping from request field names to template placeholder identifiers.
//!
//! The table is built once at startup and handed to the substitutor
//! explicitly; nothing reads it as ambient global state.

use std::collections::BTreeMap;

/// The field table compiled into the service: request field → placeholder.
const REPORT_PLACEHOLDERS: [(&str, &str); 9] = [
    ("firstName", "firstname"),
    ("lastName", "lastname"),
    ("company", "prospectname"),
    ("email", "email"),
    ("phone", "phone"),
    ("website", "website"),
    ("receptionists", "numreceptionists"),
    ("salary", "receptionistcost"),
    ("calls", "calls"),
];

/// Immutable lookup from external field names to placeholder identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTable {
    entries: BTreeMap<String, String>,
}

impl PlaceholderTable {
    /// Builds a table from `(field, placeholder)` pairs.
    pub fn new<I, F, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (F, P)>,
        F: Into<String>,
        P: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(f, p)| (f.into(), p.into())).collect(),
        }
    }

    /// The report table shipped with the service.
    #[must_use]
    pub fn report_defaults() -> Self {
        Self::new(REPORT_PLACEHOLDERS)
    }

    /// Placeholder identifier for `field`, or `None` when the field is unmapped.
    #[must_use]
    pub fn lookup(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    /// Number of mapped fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table maps no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(field, placeholder)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, p)| (f.as_str(), p.as_str()))
    }
}

impl Default for PlaceholderTable {
    fn default() -> Self {
        Self::report_defaults()
    }
}

/// How request fields are turned into placeholder identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMapping {
    /// Only fields in the table are substituted; everything else is dropped.
    AllowList(PlaceholderTable),
    /// Every field name is used as the placeholder identifier directly, as
    /// long as it is a valid control-sequence name (ASCII letters only).
    Passthrough,
}

impl FieldMapping {
    /// Resolves `field` to a placeholder identifier, or `None` when the field
    /// is not substituted.
    #[must_use]
    pub fn resolve<'a>(&'a self, field: &'a str) -> Option<&'a str> {
        match self {
            Self::AllowList(table) => table.lookup(field),
            Self::Passthrough => is_control_word(field).then_some(field),
        }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::AllowList(PlaceholderTable::default())
    }
}

/// TeX control words are one or more ASCII letters.
fn is_control_word(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphabetic())
}
