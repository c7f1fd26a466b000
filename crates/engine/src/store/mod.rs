//! Document storage.
//!
//! The engine only needs a narrow key-value contract keyed by document id:
//! insert, fetch, atomic replace. Durability is whatever the backend gives.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::types::{Document, DocumentId, DocumentSummary};
use clauseiq_core::{AppError, AppResult};

/// Key-value storage for ingested documents.
pub trait DocumentStore: Send + Sync {
    /// Store a new document; fails if the id is already taken.
    fn put(&self, document: &Document) -> AppResult<()>;

    /// Fetch a document, or `NotFound`.
    fn get(&self, id: &DocumentId) -> AppResult<Document>;

    /// Insert or atomically replace a document, returning the previous one.
    fn replace(&self, document: &Document) -> AppResult<Option<Document>>;

    /// Summaries of all stored documents, oldest first.
    fn list(&self) -> AppResult<Vec<DocumentSummary>>;

    /// Delete a document, returning it, or `NotFound`.
    fn remove(&self, id: &DocumentId) -> AppResult<Document>;

    fn contains(&self, id: &DocumentId) -> AppResult<bool> {
        match self.get(id) {
            Ok(_) => Ok(true),
            Err(AppError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

pub(crate) fn not_found(id: &DocumentId) -> AppError {
    AppError::NotFound(format!("document '{}'", id))
}

pub(crate) fn already_exists(id: &DocumentId) -> AppError {
    AppError::Storage(format!("document '{}' already exists", id))
}
