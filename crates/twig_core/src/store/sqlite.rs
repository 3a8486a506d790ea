//! SQLite-backed collection handle.

use super::{DocumentStore, RawDocument, StoreError, StoreResult};
use crate::model::document::{DocumentId, Revision};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use uuid::Uuid;

const DOCUMENT_SELECT_SQL: &str = "SELECT
    internal_id,
    revision,
    name,
    body
FROM documents";

/// Collection view over a migrated tenant connection.
pub struct SqliteCollection<'conn> {
    conn: &'conn Connection,
    collection: &'static str,
}

impl<'conn> SqliteCollection<'conn> {
    pub fn new(conn: &'conn Connection, collection: &'static str) -> Self {
        Self { conn, collection }
    }

    fn current_revision(&self, id: DocumentId) -> StoreResult<Option<Revision>> {
        let revision = self
            .conn
            .query_row(
                "SELECT revision FROM documents WHERE internal_id = ?1 AND collection = ?2;",
                params![id.to_string(), self.collection],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(revision.map(Revision::new))
    }

    /// Turns a zero-row CAS statement into the matching failure.
    fn cas_failure(&self, id: DocumentId) -> StoreError {
        match self.current_revision(id) {
            Ok(Some(current)) => StoreError::Conflict { current },
            Ok(None) => StoreError::NotFound(id),
            Err(err) => err,
        }
    }
}

impl DocumentStore for SqliteCollection<'_> {
    fn fetch_all(&self) -> StoreResult<Vec<RawDocument>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE collection = ?1;"))?;
        let mut rows = stmt.query([self.collection])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }
        Ok(documents)
    }

    fn fetch(&self, id: DocumentId) -> StoreResult<Option<RawDocument>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} WHERE internal_id = ?1 AND collection = ?2;"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), self.collection])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }
        Ok(None)
    }

    fn fetch_by_name(&self, name: &str) -> StoreResult<Option<RawDocument>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL}
             WHERE collection = ?1 AND name = ?2
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![self.collection, name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }
        Ok(None)
    }

    fn create(&self, name: &str, body: &Value) -> StoreResult<(DocumentId, Revision)> {
        let id = Uuid::new_v4();
        let revision = next_revision(None);
        self.conn.execute(
            "INSERT INTO documents (internal_id, collection, name, revision, body)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                self.collection,
                name,
                revision.as_str(),
                body.to_string(),
            ],
        )?;
        Ok((id, revision))
    }

    fn put(&self, doc: &RawDocument) -> StoreResult<Revision> {
        let revision = next_revision(Some(&doc.revision));
        let changed = self.conn.execute(
            "UPDATE documents
             SET
                name = ?1,
                body = ?2,
                revision = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE internal_id = ?4
               AND collection = ?5
               AND revision = ?6;",
            params![
                doc.name.as_str(),
                doc.body.to_string(),
                revision.as_str(),
                doc.internal_id.to_string(),
                self.collection,
                doc.revision.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(self.cas_failure(doc.internal_id));
        }
        Ok(revision)
    }

    fn remove(&self, id: DocumentId, revision: &Revision) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM documents
             WHERE internal_id = ?1
               AND collection = ?2
               AND revision = ?3;",
            params![id.to_string(), self.collection, revision.as_str()],
        )?;

        if changed == 0 {
            return Err(self.cas_failure(id));
        }
        Ok(())
    }
}

/// Builds `<generation>-<hex>`; generation is one past the previous token's.
fn next_revision(previous: Option<&Revision>) -> Revision {
    let generation = previous
        .and_then(|rev| rev.as_str().split_once('-'))
        .and_then(|(head, _)| head.parse::<u64>().ok())
        .map_or(1, |value| value.saturating_add(1));
    Revision::new(format!("{generation}-{}", Uuid::new_v4().simple()))
}

fn parse_document_row(row: &Row<'_>) -> StoreResult<RawDocument> {
    let id_text: String = row.get("internal_id")?;
    let internal_id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid uuid value `{id_text}` in documents.internal_id"
        ))
    })?;

    let body_text: String = row.get("body")?;
    let body = serde_json::from_str(&body_text).map_err(|err| {
        StoreError::InvalidData(format!("documents.body of {internal_id} is not JSON: {err}"))
    })?;

    Ok(RawDocument {
        internal_id,
        revision: Revision::new(row.get::<_, String>("revision")?),
        name: row.get("name")?,
        body,
    })
}
