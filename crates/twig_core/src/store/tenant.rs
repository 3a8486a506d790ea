//! Collection handle over a shared tenant connection.
//!
//! The tenant lock is taken per store call and released before returning, so
//! requests against one tenant interleave between calls. Lost updates are
//! caught by the compare-and-swap in `put`/`remove`, not by this lock.

use super::{DocumentStore, RawDocument, SqliteCollection, StoreResult};
use crate::db::TenantHandle;
use crate::model::document::{DocumentId, Revision};
use serde_json::Value;

pub struct TenantCollection<'h> {
    handle: &'h TenantHandle,
    collection: &'static str,
}

impl<'h> TenantCollection<'h> {
    pub fn new(handle: &'h TenantHandle, collection: &'static str) -> Self {
        Self { handle, collection }
    }

    fn with_conn<T>(
        &self,
        op: impl FnOnce(&SqliteCollection<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = self.handle.lock()?;
        let store = SqliteCollection::new(&conn, self.collection);
        op(&store)
    }
}

impl DocumentStore for TenantCollection<'_> {
    fn fetch_all(&self) -> StoreResult<Vec<RawDocument>> {
        self.with_conn(|store| store.fetch_all())
    }

    fn fetch(&self, id: DocumentId) -> StoreResult<Option<RawDocument>> {
        self.with_conn(|store| store.fetch(id))
    }

    fn fetch_by_name(&self, name: &str) -> StoreResult<Option<RawDocument>> {
        self.with_conn(|store| store.fetch_by_name(name))
    }

    fn create(&self, name: &str, body: &Value) -> StoreResult<(DocumentId, Revision)> {
        self.with_conn(|store| store.create(name, body))
    }

    fn put(&self, doc: &RawDocument) -> StoreResult<Revision> {
        self.with_conn(|store| store.put(doc))
    }

    fn remove(&self, id: DocumentId, revision: &Revision) -> StoreResult<()> {
        self.with_conn(|store| store.remove(id, revision))
    }
}

#[cfg(test)]
mod tests {
    use super::TenantCollection;
    use crate::db::{StoreRoot, TenantPool};
    use crate::store::{DocumentStore, StoreError};
    use serde_json::json;

    #[test]
    fn lock_is_released_between_calls() {
        let pool = TenantPool::new(StoreRoot::Memory);
        let handle = pool.handle("acme").unwrap();
        let store = TenantCollection::new(&handle, "models");

        let (id, first) = store.create("m", &json!({ "name": "m" })).unwrap();
        let raw = store.fetch(id).unwrap().unwrap();
        // A second writer slips in between this caller's read and write.
        let other = TenantCollection::new(&handle, "models");
        other.put(&raw).unwrap();

        let err = store.put(&raw).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { ref current } if *current != first));
        assert!(handle.lock().is_ok());
    }
}
