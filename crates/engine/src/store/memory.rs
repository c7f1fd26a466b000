//! In-process document store.

use super::{already_exists, not_found, DocumentStore};
use crate::types::{Document, DocumentId, DocumentSummary};
use clauseiq_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Documents held in memory; gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DocumentId, Arc<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, HashMap<DocumentId, Arc<Document>>>> {
        self.documents
            .read()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<DocumentId, Arc<Document>>>> {
        self.documents
            .write()
            .map_err(|_| AppError::Storage("memory store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn put(&self, document: &Document) -> AppResult<()> {
        let mut documents = self.write()?;
        if documents.contains_key(&document.id) {
            return Err(already_exists(&document.id));
        }
        documents.insert(document.id.clone(), Arc::new(document.clone()));
        Ok(())
    }

    fn get(&self, id: &DocumentId) -> AppResult<Document> {
        self.read()?
            .get(id)
            .map(|doc| doc.as_ref().clone())
            .ok_or_else(|| not_found(id))
    }

    fn replace(&self, document: &Document) -> AppResult<Option<Document>> {
        let previous = self
            .write()?
            .insert(document.id.clone(), Arc::new(document.clone()));
        Ok(previous.map(|doc| doc.as_ref().clone()))
    }

    fn list(&self) -> AppResult<Vec<DocumentSummary>> {
        let mut summaries: Vec<DocumentSummary> =
            self.read()?.values().map(|doc| doc.summary()).collect();
        summaries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(summaries)
    }

    fn remove(&self, id: &DocumentId) -> AppResult<Document> {
        self.write()?
            .remove(id)
            .map(|doc| doc.as_ref().clone())
            .ok_or_else(|| not_found(id))
    }
}
