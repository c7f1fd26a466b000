//! Engine facade: ingestion, the catalog of derived state, and queries.
//!
//! Derived state (passages, field record, index) is built completely and
//! then swapped into the catalog as one `Arc`, so a reader holding the old
//! `Arc` keeps a consistent view while a re-ingestion runs. Writes for the
//! same document id are serialized; different ids never wait on each other
//! beyond the brief catalog insert.

use crate::answer::{assemble, Answer};
use crate::audit::{audit, AuditFinding};
use crate::config::EngineConfig;
use crate::extract::{extract, FieldRecord};
use crate::index::InvertedIndex;
use crate::parser::PageExtractor;
use crate::rank::{rank, RankedPassage, RankingParams};
use crate::segment::{segment, SegmentConfig};
use crate::store::DocumentStore;
use crate::types::{content_hash, Document, DocumentId, DocumentSummary, Page, Passage};
use clauseiq_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

/// A document together with everything derived from it.
///
/// Immutable; shared between readers through `Arc`.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub document: Document,
    pub passages: Vec<Passage>,
    pub fields: FieldRecord,
    pub index: InvertedIndex,
}

impl IndexedDocument {
    /// Segment, extract and index a document.
    pub fn build(document: Document, config: &SegmentConfig) -> Self {
        let passages = segment(&document.pages, config);
        let fields = extract(&passages);
        let index = InvertedIndex::build(&passages);

        Self {
            document,
            passages,
            fields,
            index,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.document.id
    }

    pub fn rank(&self, query: &str, k: usize, params: &RankingParams) -> AppResult<Vec<RankedPassage>> {
        rank(query, &self.index, k, params)
    }

    /// Rank and assemble an answer.
    pub fn ask(&self, query: &str, k: usize, config: &EngineConfig) -> AppResult<Answer> {
        let ranked = self.rank(query, k, &config.ranking)?;
        Ok(assemble(
            self.id(),
            &self.passages,
            query,
            &ranked,
            config.answer.max_snippet_chars,
        ))
    }

    pub fn audit(&self) -> Vec<AuditFinding> {
        audit(&self.fields, &self.passages)
    }
}

/// Input for one ingestion.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Document id; a fresh one is generated when absent
    pub id: Option<DocumentId>,
    pub name: String,
    pub pages: Vec<Page>,
}

/// Totals over every stored document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub documents: usize,
    pub pages: usize,
    pub passages: usize,
    pub indexed_terms: usize,
    pub fields_set: usize,
}

/// The contract engine over a document store.
pub struct ContractEngine<S: DocumentStore> {
    store: S,
    config: EngineConfig,
    catalog: RwLock<HashMap<DocumentId, Arc<IndexedDocument>>>,
    writers: Mutex<HashMap<DocumentId, Arc<Mutex<()>>>>,
}

impl<S: DocumentStore> ContractEngine<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            catalog: RwLock::new(HashMap::new()),
            writers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest pages as a document, replacing any document with the same id.
    ///
    /// Re-ingesting identical content keeps the existing derived state.
    pub fn ingest(&self, request: IngestRequest) -> AppResult<Arc<IndexedDocument>> {
        let start = Instant::now();
        let id = request.id.unwrap_or_else(DocumentId::generate);

        self.with_writer(&id, || {
            let hash = content_hash(&request.pages);
            if let Some(current) = self.current(&id)? {
                if current.document.content_hash == hash {
                    tracing::info!("Document {} unchanged, keeping existing index", id);
                    return Ok(current);
                }
            }

            let document = Document::new(id.clone(), request.name, request.pages);
            let indexed = Arc::new(IndexedDocument::build(document, &self.config.segment));

            let previous = self.store.replace(&indexed.document)?;
            self.catalog
                .write()
                .map_err(|_| poisoned("catalog"))?
                .insert(id.clone(), Arc::clone(&indexed));

            tracing::info!(
                "{} document {} ({}): {} pages, {} passages, {} fields in {:.2}s",
                if previous.is_some() { "Re-ingested" } else { "Ingested" },
                id,
                indexed.document.name,
                indexed.document.pages.len(),
                indexed.passages.len(),
                indexed.fields.set_count(),
                start.elapsed().as_secs_f64()
            );

            Ok(indexed)
        })
    }

    /// Extract pages from raw bytes and ingest them.
    ///
    /// Extraction failures are reported against `name` and nothing is stored.
    pub fn ingest_bytes(
        &self,
        id: Option<DocumentId>,
        name: &str,
        bytes: &[u8],
        extractor: &dyn PageExtractor,
    ) -> AppResult<Arc<IndexedDocument>> {
        let pages = extractor.extract(bytes).map_err(|e| {
            let err = match e {
                AppError::Extraction { reason, .. } => AppError::extraction(name, reason),
                other => other,
            };
            tracing::warn!("Extraction failed for {}: {}", name, err);
            err
        })?;

        if pages.is_empty() {
            tracing::warn!("No text extracted from {}", name);
            return Err(AppError::extraction(name, "document contains no text"));
        }

        tracing::debug!(
            "Extracted {} pages from {} with {} extractor",
            pages.len(),
            name,
            extractor.name()
        );

        self.ingest(IngestRequest {
            id,
            name: name.to_string(),
            pages,
        })
    }

    /// Derived state for a document, built from the store on first use.
    ///
    /// Hydration holds the document's writer lock, so it cannot race a
    /// removal and bring a deleted document back.
    pub fn document(&self, id: &DocumentId) -> AppResult<Arc<IndexedDocument>> {
        if let Some(indexed) = self.cached(id)? {
            return Ok(indexed);
        }
        self.with_writer(id, || self.hydrate(id))
    }

    pub fn extract(&self, id: &DocumentId) -> AppResult<FieldRecord> {
        Ok(self.document(id)?.fields.clone())
    }

    /// Answer a question; `k` defaults to the configured `top_k`.
    pub fn ask(&self, id: &DocumentId, question: &str, k: Option<usize>) -> AppResult<Answer> {
        let start = Instant::now();
        let indexed = self.document(id)?;
        let k = k.unwrap_or(self.config.ranking.top_k);
        let answer = indexed.ask(question, k, &self.config)?;

        tracing::info!(
            "Answered question on {} (found: {}, context: {}) in {:.3}s",
            id,
            answer.found,
            answer.context.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(answer)
    }

    pub fn audit(&self, id: &DocumentId) -> AppResult<Vec<AuditFinding>> {
        let findings = self.document(id)?.audit();
        tracing::info!("Audit of {} produced {} findings", id, findings.len());
        Ok(findings)
    }

    pub fn documents(&self) -> AppResult<Vec<DocumentSummary>> {
        self.store.list()
    }

    /// Delete a document from the store and the catalog.
    pub fn remove(&self, id: &DocumentId) -> AppResult<DocumentSummary> {
        self.with_writer(id, || {
            let removed = self.store.remove(id)?;
            self.catalog
                .write()
                .map_err(|_| poisoned("catalog"))?
                .remove(id);

            tracing::info!("Removed document {}", id);
            Ok(removed.summary())
        })
    }

    pub fn stats(&self) -> AppResult<EngineStats> {
        let mut stats = EngineStats::default();
        for summary in self.store.list()? {
            let indexed = self.document(&summary.id)?;
            stats.documents += 1;
            stats.pages += indexed.document.pages.len();
            stats.passages += indexed.passages.len();
            stats.indexed_terms += indexed.index.vocabulary_size();
            stats.fields_set += indexed.fields.set_count();
        }
        Ok(stats)
    }

    fn cached(&self, id: &DocumentId) -> AppResult<Option<Arc<IndexedDocument>>> {
        Ok(self
            .catalog
            .read()
            .map_err(|_| poisoned("catalog"))?
            .get(id)
            .cloned())
    }

    /// Build and cache a stored document. Callers hold the writer lock.
    fn hydrate(&self, id: &DocumentId) -> AppResult<Arc<IndexedDocument>> {
        if let Some(indexed) = self.cached(id)? {
            return Ok(indexed);
        }

        let document = self.store.get(id)?;
        let built = Arc::new(IndexedDocument::build(document, &self.config.segment));
        tracing::debug!("Hydrated document {} from store", id);

        let mut catalog = self.catalog.write().map_err(|_| poisoned("catalog"))?;
        Ok(Arc::clone(catalog.entry(id.clone()).or_insert(built)))
    }

    /// Cached state, or the stored document if it was never loaded.
    fn current(&self, id: &DocumentId) -> AppResult<Option<Arc<IndexedDocument>>> {
        match self.hydrate(id) {
            Ok(indexed) => Ok(Some(indexed)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Run `f` under the writer lock for `id`.
    ///
    /// Locks nobody else holds or waits on are dropped from the table
    /// afterwards; clones are only taken under the table lock, so the
    /// count check cannot race.
    fn with_writer<T>(&self, id: &DocumentId, f: impl FnOnce() -> AppResult<T>) -> AppResult<T> {
        let writer = {
            let mut writers = self.writers.lock().map_err(|_| poisoned("writer table"))?;
            Arc::clone(writers.entry(id.clone()).or_default())
        };

        let result = {
            let _guard = writer.lock().map_err(|_| poisoned("document writer"))?;
            f()
        };
        drop(writer);

        let mut writers = self.writers.lock().map_err(|_| poisoned("writer table"))?;
        if writers.get(id).is_some_and(|w| Arc::strong_count(w) == 1) {
            writers.remove(id);
        }

        result
    }
}

fn poisoned(what: &str) -> AppError {
    AppError::Other(format!("{} lock poisoned", what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PlainTextExtractor;
    use crate::store::MemoryStore;

    fn engine() -> ContractEngine<MemoryStore> {
        ContractEngine::new(MemoryStore::new(), EngineConfig::default())
    }

    fn request(id: &str, text: &str) -> IngestRequest {
        IngestRequest {
            id: Some(DocumentId::new(id)),
            name: format!("{}.txt", id),
            pages: vec![Page::new(1, text)],
        }
    }

    #[test]
    fn test_ingest_and_query() {
        let engine = engine();
        let indexed = engine
            .ingest(request(
                "msa",
                "This Agreement shall be governed by the laws of Delaware.\n\n\
                 Payment is due within thirty days of the invoice date.",
            ))
            .unwrap();

        assert_eq!(indexed.passages.len(), 2);

        let id = DocumentId::new("msa");
        let answer = engine.ask(&id, "governing law", None).unwrap();
        assert!(answer.found);
        assert_eq!(answer.citations[0].passage, 0);

        let fields = engine.extract(&id).unwrap();
        assert!(fields.is_set(crate::extract::FieldName::GoverningLaw));
    }

    #[test]
    fn test_generated_id() {
        let engine = engine();
        let indexed = engine
            .ingest(IngestRequest {
                id: None,
                name: "anon.txt".to_string(),
                pages: vec![Page::new(1, "Some contract text goes here.")],
            })
            .unwrap();

        assert_eq!(indexed.id().as_str().len(), 36);
        assert_eq!(engine.documents().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_document() {
        let engine = engine();
        let id = DocumentId::new("nope");

        assert_eq!(engine.ask(&id, "law", None).unwrap_err().kind(), "not_found");
        assert_eq!(engine.audit(&id).unwrap_err().kind(), "not_found");
        assert_eq!(engine.extract(&id).unwrap_err().kind(), "not_found");
    }

    #[test]
    fn test_identical_reingest_keeps_state() {
        let engine = engine();
        let first = engine.ingest(request("msa", "Original contract text here.")).unwrap();
        let second = engine.ingest(request("msa", "Original contract text here.")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_changed_reingest_swaps_state() {
        let engine = engine();
        let id = DocumentId::new("msa");
        let old = engine.ingest(request("msa", "Governed by the laws of Delaware.")).unwrap();
        engine.ingest(request("msa", "Governed by the laws of England.")).unwrap();

        // Old readers keep their snapshot.
        assert!(old.passages[0].text.contains("Delaware"));
        let current = engine.document(&id).unwrap();
        assert!(current.passages[0].text.contains("England"));
        assert_eq!(engine.store().get(&id).unwrap().pages[0].text, "Governed by the laws of England.");
    }

    #[test]
    fn test_hydrates_from_store() {
        let store = MemoryStore::new();
        store
            .put(&Document::new(
                DocumentId::new("stored"),
                "stored.txt",
                vec![Page::new(1, "Either party may terminate this agreement for convenience.")],
            ))
            .unwrap();

        let engine = ContractEngine::new(store, EngineConfig::default());
        let indexed = engine.document(&DocumentId::new("stored")).unwrap();
        assert_eq!(indexed.passages.len(), 1);
        assert!(Arc::ptr_eq(&indexed, &engine.document(&DocumentId::new("stored")).unwrap()));
    }

    #[test]
    fn test_extraction_failure_stores_nothing() {
        let engine = engine();
        let err = engine
            .ingest_bytes(Some(DocumentId::new("bin")), "blob.txt", b"\0\0\0", &PlainTextExtractor)
            .unwrap_err();

        match err {
            AppError::Extraction { document, .. } => assert_eq!(document, "blob.txt"),
            other => panic!("unexpected error: {}", other),
        }
        assert!(engine.documents().unwrap().is_empty());
        assert_eq!(
            engine.document(&DocumentId::new("bin")).unwrap_err().kind(),
            "not_found"
        );

        let err = engine
            .ingest_bytes(None, "empty.txt", b"   ", &PlainTextExtractor)
            .unwrap_err();
        assert_eq!(err.kind(), "extraction");
    }

    #[test]
    fn test_writer_locks_are_released() {
        let engine = engine();
        engine.ingest(request("a", "Confidential information must be protected.")).unwrap();
        engine.document(&DocumentId::new("a")).unwrap();
        engine.remove(&DocumentId::new("a")).unwrap();
        assert!(engine.remove(&DocumentId::new("a")).is_err());

        assert!(engine.writers.lock().unwrap().is_empty());
    }

    #[test]
    fn test_remove_and_stats() {
        let engine = engine();
        engine.ingest(request("a", "Confidential information must be protected.")).unwrap();
        engine.ingest(request("b", "Fees are payable net 30 days from invoice.")).unwrap();

        let stats = engine.stats().unwrap();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.passages, 2);

        engine.remove(&DocumentId::new("a")).unwrap();
        assert_eq!(engine.stats().unwrap().documents, 1);
        assert_eq!(engine.document(&DocumentId::new("a")).unwrap_err().kind(), "not_found");
    }
}
