//! Revision Guard: read-verify-write for every mutation.
//!
//! # Invariants
//! - The supplied revision is compared to the stored one by exact equality.
//! - A mismatch fails with `StaleRevision` carrying the stored revision; no
//!   merge is attempted.
//! - A store-level CAS failure between read and write propagates as the same
//!   conflict, without retry.
//! - Successful writes return the re-fetched canonical document.

use super::codec::{decode, encode};
use super::error::{RepoError, RepoResult};
use crate::model::document::{Document, DocumentId, DocumentPayload, Revision};
use crate::store::DocumentStore;
use log::debug;

/// Loads the live document named `name`.
pub fn resolve<S: DocumentStore, P: DocumentPayload>(
    store: &S,
    name: &str,
) -> RepoResult<Document<P>> {
    let raw = store
        .fetch_by_name(name)
        .map_err(|err| RepoError::from_store(err, P::KIND, name))?
        .ok_or_else(|| RepoError::NotFound {
            kind: P::KIND,
            name: name.to_string(),
        })?;
    decode(raw)
}

/// Loads a document by internal id after a write.
pub fn refetch<S: DocumentStore, P: DocumentPayload>(
    store: &S,
    id: DocumentId,
    name: &str,
) -> RepoResult<Document<P>> {
    let raw = store
        .fetch(id)
        .map_err(|err| RepoError::from_store(err, P::KIND, name))?
        .ok_or_else(|| RepoError::NotFound {
            kind: P::KIND,
            name: name.to_string(),
        })?;
    decode(raw)
}

/// Applies `mutate` to the document named `name` if `supplied` is current.
pub fn guarded_update<S, P, F>(
    store: &S,
    name: &str,
    supplied: &Revision,
    mutate: F,
) -> RepoResult<Document<P>>
where
    S: DocumentStore,
    P: DocumentPayload,
    F: FnOnce(&mut Document<P>) -> RepoResult<()>,
{
    let mut document: Document<P> = resolve(store, name)?;
    if document.revision != *supplied {
        debug!(
            "event=revision_guard module=repo status=conflict kind={} name={} supplied={} current={}",
            P::KIND,
            name,
            supplied,
            document.revision
        );
        return Err(RepoError::StaleRevision {
            kind: P::KIND,
            name: name.to_string(),
            current: document.revision,
        });
    }

    mutate(&mut document)?;
    let raw = encode(&document)?;
    store
        .put(&raw)
        .map_err(|err| RepoError::from_store(err, P::KIND, name))?;

    refetch(store, document.internal_id, &document.name)
}

/// Resolves `name` and removes it at the revision just observed.
pub fn guarded_delete<S, P>(store: &S, name: &str) -> RepoResult<()>
where
    S: DocumentStore,
    P: DocumentPayload,
{
    let document: Document<P> = resolve(store, name)?;
    store
        .remove(document.internal_id, &document.revision)
        .map_err(|err| RepoError::from_store(err, P::KIND, name))
}
