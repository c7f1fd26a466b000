//! Contract intelligence engine.
//!
//! Segments contract text into passages, extracts a structured field record,
//! answers questions with BM25 passage retrieval and audits contracts against
//! a battery of risk rules. Everything derived from a document is rebuilt
//! from its pages, so only pages are persisted.

pub mod answer;
pub mod audit;
pub mod config;
pub mod engine;
pub mod extract;
pub mod index;
pub mod ingest;
pub mod parser;
pub mod rank;
pub mod segment;
pub mod store;
pub mod text;
pub mod tokenize;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use answer::{answer_stream, Answer, AnswerConfig, AnswerEvent, Citation, ContextPassage};
pub use audit::{AuditFinding, AuditRule, Severity};
pub use config::EngineConfig;
pub use engine::{ContractEngine, EngineStats, IndexedDocument, IngestRequest};
pub use extract::{FieldName, FieldRecord, FieldValue};
pub use index::InvertedIndex;
pub use ingest::{ingest_paths, FileReport, IngestOptions, IngestReport, IngestStats};
pub use parser::{extractor_for_path, PageExtractor, PdfExtractor, PlainTextExtractor};
pub use rank::{RankedPassage, RankingParams};
pub use segment::SegmentConfig;
pub use store::{DocumentStore, MemoryStore, SqliteStore};
pub use types::{Document, DocumentId, DocumentSummary, Page, Passage};
