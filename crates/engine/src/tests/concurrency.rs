//! Concurrent ingestion and reading.

use crate::config::EngineConfig;
use crate::engine::{ContractEngine, IngestRequest};
use crate::extract::FieldName;
use crate::ingest::{ingest_paths, IngestOptions};
use crate::store::{DocumentStore, MemoryStore};
use crate::types::{Document, DocumentId, Page};
use clauseiq_core::AppError;
use std::sync::Arc;

fn version(place: &str) -> IngestRequest {
    IngestRequest {
        id: Some(DocumentId::new("shared")),
        name: "shared.txt".to_string(),
        pages: vec![
            Page::new(1, format!("This Agreement shall be governed by the laws of {}.", place)),
            Page::new(2, format!("Disputes shall be resolved by the courts of {}.", place)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readers_never_see_a_partial_reingest() {
        let engine = ContractEngine::new(MemoryStore::new(), EngineConfig::default());
        let id = DocumentId::new("shared");
        engine.ingest(version("Delaware")).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let indexed = engine.document(&id).unwrap();
                        let law = indexed
                            .fields
                            .get(FieldName::GoverningLaw)
                            .and_then(|e| e.value.as_text())
                            .unwrap()
                            .to_string();

                        // Fields, passages and pages always come from one version.
                        assert!(indexed.passages.iter().all(|p| p.text.contains(&law)));
                        assert!(indexed.document.pages.iter().all(|p| p.text.contains(&law)));
                        assert_eq!(indexed.index.passage_count(), indexed.passages.len());
                    }
                });
            }

            scope.spawn(|| {
                for i in 0..50 {
                    let place = if i % 2 == 0 { "England" } else { "Delaware" };
                    engine.ingest(version(place)).unwrap();
                }
            });
        });

        // The last write wins.
        let indexed = engine.document(&id).unwrap();
        assert!(indexed.passages[0].text.contains("Delaware"));
        assert_eq!(engine.documents().unwrap().len(), 1);
    }

    #[test]
    fn test_hydration_does_not_resurrect_removed_documents() {
        for _ in 0..20 {
            let engine = ContractEngine::new(MemoryStore::new(), EngineConfig::default());
            let id = DocumentId::new("shared");
            let stored = version("Delaware");
            engine
                .store()
                .replace(&Document::new(id.clone(), stored.name, stored.pages))
                .unwrap();

            std::thread::scope(|scope| {
                for _ in 0..4 {
                    scope.spawn(|| {
                        for _ in 0..50 {
                            match engine.document(&id) {
                                Ok(_) | Err(AppError::NotFound(_)) => {}
                                Err(e) => panic!("unexpected error: {}", e),
                            }
                        }
                    });
                }
                scope.spawn(|| engine.remove(&id).unwrap());
            });

            assert!(matches!(engine.document(&id), Err(AppError::NotFound(_))));
            assert!(engine.documents().unwrap().is_empty());
        }
    }

    #[test]
    fn test_distinct_ids_ingest_in_parallel() {
        let engine = ContractEngine::new(MemoryStore::new(), EngineConfig::default());

        std::thread::scope(|scope| {
            for n in 0..8 {
                let engine = &engine;
                scope.spawn(move || {
                    engine
                        .ingest(IngestRequest {
                            id: Some(DocumentId::new(format!("doc-{}", n))),
                            name: format!("doc-{}.txt", n),
                            pages: vec![Page::new(
                                1,
                                format!("Fees of {} dollars are payable within thirty days of invoice.", n),
                            )],
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(engine.documents().unwrap().len(), 8);
        for n in 0..8 {
            let answer = engine
                .ask(&DocumentId::new(format!("doc-{}", n)), "payable fees", None)
                .unwrap();
            assert!(answer.found);
        }
    }

    #[tokio::test]
    async fn test_batch_ingestion_skips_failing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("renewal.txt"),
            "This Agreement renews automatically unless either party gives 15 days written notice.",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("indemnity.txt"),
            "Party shall indemnify and hold harmless the other party from any and all claims.",
        )
        .unwrap();
        std::fs::write(dir.path().join("corrupt.txt"), b"\0\x01\x02binary").unwrap();
        std::fs::write(dir.path().join("skipped.log"), "not a contract").unwrap();

        let engine = Arc::new(ContractEngine::new(MemoryStore::new(), EngineConfig::default()));
        let report = ingest_paths(
            Arc::clone(&engine),
            IngestOptions {
                paths: vec![dir.path().to_path_buf()],
                include: vec![".txt".to_string()],
                concurrency: Some(2),
                ..IngestOptions::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(report.stats.files_seen, 3);
        assert_eq!(report.stats.ingested, 2);
        assert_eq!(report.stats.failed, 1);

        let failed: Vec<_> = report.files.iter().filter(|f| !f.is_ok()).collect();
        assert!(failed[0].path.ends_with("corrupt.txt"));
        assert!(failed[0].error.as_deref().unwrap().contains("corrupt.txt"));

        assert_eq!(engine.documents().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_explicit_id_needs_one_file() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "First contract text goes here.").unwrap();
        std::fs::write(dir.path().join("b.txt"), "Second contract text goes here.").unwrap();

        let engine = Arc::new(ContractEngine::new(MemoryStore::new(), EngineConfig::default()));
        let err = ingest_paths(
            Arc::clone(&engine),
            IngestOptions {
                paths: vec![dir.path().to_path_buf()],
                id: Some(DocumentId::new("msa")),
                ..IngestOptions::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), "config");

        let report = ingest_paths(
            Arc::clone(&engine),
            IngestOptions {
                paths: vec![dir.path().join("a.txt")],
                id: Some(DocumentId::new("msa")),
                ..IngestOptions::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(report.stats.ingested, 1);
        assert!(engine.document(&DocumentId::new("msa")).is_ok());
    }
}
