//! SQLite-backed document store.

use super::{already_exists, not_found, DocumentStore};
use crate::types::{Document, DocumentId, DocumentSummary, Page};
use chrono::{DateTime, SecondsFormat, Utc};
use clauseiq_core::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        created_at TEXT NOT NULL,
        content_hash TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS pages (
        document_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        number INTEGER NOT NULL,
        text TEXT NOT NULL,
        PRIMARY KEY (document_id, position),
        FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
    );
"#;

/// Documents persisted in a single SQLite file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the store at `path`.
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("Failed to create store directory: {}", e))
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Storage(format!("Failed to open SQLite store: {}", e)))?;
        let store = Self::with_connection(conn)?;

        tracing::debug!("Opened SQLite store at {:?}", path);
        Ok(store)
    }

    /// A throwaway store, mostly for tests.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Storage(format!("Failed to open SQLite store: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| AppError::Storage(format!("Failed to create tables: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Storage("SQLite store lock poisoned".to_string()))
    }
}

impl DocumentStore for SqliteStore {
    fn put(&self, document: &Document) -> AppResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage("begin transaction"))?;

        if load(&tx, &document.id)?.is_some() {
            return Err(already_exists(&document.id));
        }
        insert(&tx, document)?;

        tx.commit().map_err(storage("commit"))
    }

    fn get(&self, id: &DocumentId) -> AppResult<Document> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage("begin transaction"))?;
        load(&tx, id)?.ok_or_else(|| not_found(id))
    }

    fn replace(&self, document: &Document) -> AppResult<Option<Document>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage("begin transaction"))?;

        let previous = load(&tx, &document.id)?;
        if previous.is_some() {
            delete(&tx, &document.id)?;
        }
        insert(&tx, document)?;

        tx.commit().map_err(storage("commit"))?;
        Ok(previous)
    }

    fn list(&self) -> AppResult<Vec<DocumentSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT d.id, d.name, d.created_at, d.content_hash,
                        (SELECT COUNT(*) FROM pages p WHERE p.document_id = d.id)
                 FROM documents d
                 ORDER BY d.created_at, d.id",
            )
            .map_err(storage("prepare list"))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })
            .map_err(storage("list documents"))?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, name, created_at, content_hash, page_count) =
                row.map_err(storage("read document row"))?;
            summaries.push(DocumentSummary {
                id: DocumentId::new(id),
                name,
                page_count: page_count as u32,
                created_at: parse_timestamp(&created_at)?,
                content_hash,
            });
        }

        Ok(summaries)
    }

    fn remove(&self, id: &DocumentId) -> AppResult<Document> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage("begin transaction"))?;

        let document = load(&tx, id)?.ok_or_else(|| not_found(id))?;
        delete(&tx, id)?;

        tx.commit().map_err(storage("commit"))?;
        Ok(document)
    }
}

fn storage(context: &'static str) -> impl Fn(rusqlite::Error) -> AppError {
    move |e| AppError::Storage(format!("Failed to {}: {}", context, e))
}

fn insert(tx: &Transaction<'_>, document: &Document) -> AppResult<()> {
    tx.execute(
        "INSERT INTO documents (id, name, created_at, content_hash) VALUES (?1, ?2, ?3, ?4)",
        params![
            document.id.as_str(),
            document.name,
            document.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            document.content_hash,
        ],
    )
    .map_err(storage("insert document"))?;

    for (position, page) in document.pages.iter().enumerate() {
        tx.execute(
            "INSERT INTO pages (document_id, position, number, text) VALUES (?1, ?2, ?3, ?4)",
            params![document.id.as_str(), position as i64, page.number, page.text],
        )
        .map_err(storage("insert page"))?;
    }

    Ok(())
}

fn delete(tx: &Transaction<'_>, id: &DocumentId) -> AppResult<()> {
    tx.execute("DELETE FROM pages WHERE document_id = ?1", params![id.as_str()])
        .map_err(storage("delete pages"))?;
    tx.execute("DELETE FROM documents WHERE id = ?1", params![id.as_str()])
        .map_err(storage("delete document"))?;
    Ok(())
}

fn load(tx: &Transaction<'_>, id: &DocumentId) -> AppResult<Option<Document>> {
    let header = tx
        .query_row(
            "SELECT name, created_at, content_hash FROM documents WHERE id = ?1",
            params![id.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()
        .map_err(storage("load document"))?;

    let Some((name, created_at, content_hash)) = header else {
        return Ok(None);
    };

    let mut stmt = tx
        .prepare("SELECT number, text FROM pages WHERE document_id = ?1 ORDER BY position")
        .map_err(storage("prepare page query"))?;
    let pages = stmt
        .query_map(params![id.as_str()], |row| {
            Ok(Page::new(row.get::<_, u32>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(storage("load pages"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(storage("read page row"))?;

    Ok(Some(Document {
        id: id.clone(),
        name,
        pages,
        created_at: parse_timestamp(&created_at)?,
        content_hash,
    }))
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::Storage(format!("Invalid timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{check_contract, document};
    use tempfile::TempDir;

    #[test]
    fn test_sqlite_store_contract() {
        check_contract(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_documents_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("documents.sqlite");

        let doc = document("msa", "Persistent text");
        SqliteStore::open(&path).unwrap().put(&doc).unwrap();

        let reopened = SqliteStore::open(&path).unwrap();
        let loaded = reopened.get(&doc.id).unwrap();
        assert_eq!(loaded.pages, doc.pages);
        assert_eq!(loaded.created_at, doc.created_at);

        let summaries = reopened.list().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].page_count, 2);
    }
}
