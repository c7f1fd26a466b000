//! Document and passage type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque document identifier, unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One page of extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number, starting at 1
    pub number: u32,

    /// Raw page text as produced by the extractor
    pub text: String,
}

impl Page {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// An ingested contract document.
///
/// Immutable once ingested; derived state (passages, fields, index) lives
/// in [`crate::engine::IndexedDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: DocumentId,

    /// Display name, usually the source file name
    pub name: String,

    /// Pages in reading order
    pub pages: Vec<Page>,

    /// When this document was ingested
    pub created_at: DateTime<Utc>,

    /// SHA-256 over page numbers and texts
    pub content_hash: String,
}

impl Document {
    /// Create a document stamped with the current time.
    pub fn new(id: DocumentId, name: impl Into<String>, pages: Vec<Page>) -> Self {
        let content_hash = content_hash(&pages);
        Self {
            id,
            name: name.into(),
            pages,
            created_at: Utc::now(),
            content_hash,
        }
    }

    /// Total characters across all pages.
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            page_count: self.pages.len() as u32,
            created_at: self.created_at,
            content_hash: self.content_hash.clone(),
        }
    }
}

/// Calculate the content hash of a page sequence.
pub fn content_hash(pages: &[Page]) -> String {
    let mut hasher = Sha256::new();
    for page in pages {
        hasher.update(page.number.to_le_bytes());
        hasher.update(page.text.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// Listing entry for a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub name: String,
    pub page_count: u32,
    pub created_at: DateTime<Utc>,
    pub content_hash: String,
}

/// A paragraph-sized span of one page: the unit of indexing and citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Position in the document (0-based, dense)
    pub index: usize,

    /// Page the passage was cut from
    pub page: u32,

    /// Start offset within the page, in characters
    pub start_char: usize,

    /// End offset within the page (exclusive), in characters
    pub end_char: usize,

    /// Original passage text, for display and pattern matching
    pub text: String,

    /// Normalized tokens (lowercased, punctuation stripped, stop words kept)
    pub tokens: Vec<String>,
}

impl Passage {
    pub fn char_len(&self) -> usize {
        self.end_char - self.start_char
    }
}
