//! Batch ingestion of files and directories.
//!
//! Files are extracted and indexed on the blocking pool, several at a time.
//! A file that fails is reported and skipped; it never aborts the batch.

use crate::engine::ContractEngine;
use crate::parser::extractor_for_path;
use crate::store::DocumentStore;
use crate::types::{DocumentId, DocumentSummary};
use clauseiq_core::{AppError, AppResult};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use walkdir::WalkDir;

/// Options for a batch ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Files or directories to ingest
    pub paths: Vec<PathBuf>,

    /// Path substrings a walked file must contain (any of)
    #[serde(default)]
    pub include: Vec<String>,

    /// Path substrings that exclude a walked file
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Document id to use; only valid when exactly one file is ingested
    #[serde(default)]
    pub id: Option<DocumentId>,

    /// Files processed at once; defaults to available parallelism
    #[serde(default)]
    pub concurrency: Option<usize>,
}

/// Outcome for one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,

    /// The stored document, when ingestion succeeded
    pub document: Option<DocumentSummary>,

    pub passages: usize,

    pub fields_set: usize,

    /// Failure reason, when ingestion failed
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Statistics from a batch ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    /// Files attempted
    pub files_seen: u32,

    /// Files ingested successfully
    pub ingested: u32,

    /// Files that failed
    pub failed: u32,

    /// Passages across ingested files
    pub passages: u32,

    /// Duration in seconds
    pub duration_secs: f64,
}

/// Per-file reports plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub files: Vec<FileReport>,
    pub stats: IngestStats,
}

/// Ingest every file named by `options`, in parallel.
///
/// Reports come back sorted by path regardless of completion order.
pub async fn ingest_paths<S>(
    engine: Arc<ContractEngine<S>>,
    options: IngestOptions,
) -> AppResult<IngestReport>
where
    S: DocumentStore + 'static,
{
    let start = Instant::now();
    let files = collect_files(&options);

    if options.id.is_some() && files.len() != 1 {
        return Err(AppError::Config(format!(
            "an explicit document id needs exactly one file, found {}",
            files.len()
        )));
    }

    let concurrency = options
        .concurrency
        .filter(|n| *n > 0)
        .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1);

    tracing::info!(
        "Starting ingestion of {} files ({} at a time)",
        files.len(),
        concurrency
    );

    let mut files: Vec<FileReport> = stream::iter(files)
        .map(|path| {
            let engine = Arc::clone(&engine);
            let id = options.id.clone();
            async move {
                let task_path = path.clone();
                let joined = tokio::task::spawn_blocking(move || {
                    ingest_file(&engine, &task_path, id)
                })
                .await;

                match joined {
                    Ok(Ok(report)) => report,
                    Ok(Err(e)) => failed(path, e.to_string()),
                    Err(e) => failed(path, format!("ingestion task failed: {}", e)),
                }
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut stats = IngestStats {
        files_seen: files.len() as u32,
        ..IngestStats::default()
    };
    for report in &files {
        if report.is_ok() {
            stats.ingested += 1;
            stats.passages += report.passages as u32;
        } else {
            stats.failed += 1;
        }
    }
    stats.duration_secs = start.elapsed().as_secs_f64();

    tracing::info!(
        "Ingestion completed: {} ingested, {} failed, {} passages in {:.2}s",
        stats.ingested,
        stats.failed,
        stats.passages,
        stats.duration_secs
    );

    Ok(IngestReport { files, stats })
}

/// Read, extract and ingest one file.
pub fn ingest_file<S: DocumentStore>(
    engine: &ContractEngine<S>,
    path: &Path,
    id: Option<DocumentId>,
) -> AppResult<FileReport> {
    tracing::debug!("Processing file: {:?}", path);

    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    let indexed = engine.ingest_bytes(id, &name, &bytes, extractor_for_path(path))?;

    Ok(FileReport {
        path: path.to_path_buf(),
        document: Some(indexed.document.summary()),
        passages: indexed.passages.len(),
        fields_set: indexed.fields.set_count(),
        error: None,
    })
}

fn failed(path: PathBuf, error: String) -> FileReport {
    tracing::warn!("Failed to ingest {:?}: {}", path, error);
    FileReport {
        path,
        document: None,
        passages: 0,
        fields_set: 0,
        error: Some(error),
    }
}

/// Expand paths into files. Explicit files are always kept; files found by
/// walking a directory go through the include/exclude filters. Missing paths
/// are kept so they surface as failures.
fn collect_files(options: &IngestOptions) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in &options.paths {
        if path.is_dir() {
            let mut walked: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| should_include(p, options))
                .collect();
            walked.sort();
            files.extend(walked);
        } else {
            files.push(path.clone());
        }
    }

    files.dedup();
    files
}

/// Check if a file should be included based on patterns.
fn should_include(path: &Path, options: &IngestOptions) -> bool {
    let path_str = path.to_string_lossy();

    if options.exclude.iter().any(|p| path_str.contains(p.as_str())) {
        return false;
    }

    options.include.is_empty() || options.include.iter().any(|p| path_str.contains(p.as_str()))
}
