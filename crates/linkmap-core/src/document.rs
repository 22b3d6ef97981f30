//! Document identifiers.
//!
//! This module provides the [`DocumentRef`] type, the opaque identifier used
//! for every document that takes part in a link neighborhood.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

/// Opaque, path-like identifier of a document.
///
/// Two references are equal when their identifier strings are equal. The
/// identifier is usually a vault-relative path such as `notes/Rust.md`, but
/// nothing in the layout engine depends on that shape except
/// [`DocumentRef::display_name`].
///
/// # Examples
///
/// ```
/// use linkmap_core::document::DocumentRef;
///
/// let doc = DocumentRef::new("notes/Rust Ownership.md");
/// assert_eq!(doc.as_str(), "notes/Rust Ownership.md");
/// assert_eq!(doc.display_name(), "Rust Ownership");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(String);

impl DocumentRef {
    /// Creates a document reference from its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the human-facing name of the document.
    ///
    /// This is the last path component with its extension removed. Dotfiles
    /// such as `.hidden` keep their full name.
    pub fn display_name(&self) -> &str {
        let file_name = self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0);
        match file_name.rfind('.') {
            Some(0) | None => file_name,
            Some(dot) => &file_name[..dot],
        }
    }

    /// Orders two documents the way layers list them.
    ///
    /// Display names are collated like a locale collator would: compared
    /// case-insensitively first, so `apple` sorts before `Banana`, and on
    /// names differing only in case the lowercase one first, so `note` sorts
    /// before `Note`. Remaining ties fall back to the full identifier, which
    /// makes the ordering total and reproducible.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.display_name(), other.display_name());
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| lowercase_first(a, b))
            .then_with(|| self.0.cmp(&other.0))
    }
}

/// Breaks a tie between names equal up to case at their first differing
/// character.
fn lowercase_first(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map(|(x, y)| {
            y.is_lowercase()
                .cmp(&x.is_lowercase())
                .then_with(|| x.cmp(&y))
        })
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for DocumentRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
