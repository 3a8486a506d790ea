//! Document Store Adapter: raw create/read/list/update/delete per collection.
//!
//! # Responsibility
//! - Expose a narrow capability surface over the storage engine.
//! - Assign internal ids and revision tokens.
//!
//! # Invariants
//! - `put` and `remove` succeed only when the supplied revision equals the
//!   stored one (compare-and-swap); otherwise they fail with `Conflict`.
//! - Every successful write produces a fresh revision; the old one is dead.
//! - No domain logic lives here.

use crate::db::DbError;
use crate::model::document::{DocumentId, Revision};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;
mod tenant;

pub use sqlite::SqliteCollection;
pub use tenant::TenantCollection;

pub type StoreResult<T> = Result<T, StoreError>;

/// Document as the store sees it: identity plus an uninterpreted JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub internal_id: DocumentId,
    pub revision: Revision,
    /// Mirrored from the body for keyed lookup.
    pub name: String,
    pub body: Value,
}

#[derive(Debug)]
pub enum StoreError {
    /// No document with this internal id.
    NotFound(DocumentId),
    /// Supplied revision is stale; carries the one currently stored.
    Conflict { current: Revision },
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::Conflict { current } => {
                write!(f, "revision conflict (current={current})")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted document data: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One collection of one tenant.
pub trait DocumentStore {
    /// Every document in store iteration order. No ordering guarantee.
    fn fetch_all(&self) -> StoreResult<Vec<RawDocument>>;
    fn fetch(&self, id: DocumentId) -> StoreResult<Option<RawDocument>>;
    /// Keyed lookup by mirrored name. When several documents share a name
    /// the oldest one wins.
    fn fetch_by_name(&self, name: &str) -> StoreResult<Option<RawDocument>>;
    fn create(&self, name: &str, body: &Value) -> StoreResult<(DocumentId, Revision)>;
    /// Writes `doc` if `doc.revision` is still current; returns the new revision.
    fn put(&self, doc: &RawDocument) -> StoreResult<Revision>;
    fn remove(&self, id: DocumentId, revision: &Revision) -> StoreResult<()>;
}
