//! Model and twiglet repositories.
//!
//! # Responsibility
//! - Provide name-addressed CRUD over one collection.
//! - Enforce name uniqueness at create and rename time.
//!
//! # Invariants
//! - Name checks are read-then-write: two racing creates of one name can
//!   both succeed. The store carries no unique constraint on names.
//! - `changelog` is never empty after `create`.

use super::changelog::{append_entry, record};
use super::codec::encode_body;
use super::error::{RepoError, RepoResult};
use super::guard::{guarded_delete, guarded_update, refetch, resolve};
use crate::model::changelog::ChangelogEntry;
use crate::model::document::{Document, DocumentKind, DocumentPayload, Revision};
use crate::model::schema::ModelPayload;
use crate::model::twiglet::TwigletPayload;
use crate::db::TenantHandle;
use crate::store::{DocumentStore, SqliteCollection, TenantCollection};
use log::info;
use rusqlite::Connection;
use std::marker::PhantomData;

pub type ModelRepository<S> = EntityRepository<S, ModelPayload>;
pub type TwigletRepository<S> = EntityRepository<S, TwigletPayload>;

/// Caller-supplied identity and payload for a create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDraft<P> {
    pub name: String,
    pub payload: P,
}

impl<P> DocumentDraft<P> {
    pub fn new(name: impl Into<String>, payload: P) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// List item; the transport adds the resource URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub name: String,
}

/// Name-addressed repository over one collection.
pub struct EntityRepository<S, P> {
    store: S,
    _payload: PhantomData<fn() -> P>,
}

impl<'conn, P: DocumentPayload> EntityRepository<SqliteCollection<'conn>, P> {
    /// Repository over the `P` collection of a tenant connection.
    pub fn sqlite(conn: &'conn Connection) -> Self {
        Self::new(SqliteCollection::new(conn, P::KIND.collection()))
    }
}

impl<'h, P: DocumentPayload> EntityRepository<TenantCollection<'h>, P> {
    /// Repository over a shared tenant handle; locks per store call.
    pub fn tenant(handle: &'h TenantHandle) -> Self {
        Self::new(TenantCollection::new(handle, P::KIND.collection()))
    }
}

impl<S: DocumentStore, P: DocumentPayload> EntityRepository<S, P> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _payload: PhantomData,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        P::KIND
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fails with `NotFound` if no live document has this name.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Document<P>> {
        resolve(&self.store, name)
    }

    /// Whether a live document currently uses `name`.
    pub fn exists(&self, name: &str) -> RepoResult<bool> {
        match self.find_by_name(name) {
            Ok(_) => Ok(true),
            Err(RepoError::NotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Summaries in store iteration order.
    pub fn list_all(&self) -> RepoResult<Vec<DocumentSummary>> {
        let documents = self.store.fetch_all()?;
        Ok(documents
            .into_iter()
            .map(|raw| DocumentSummary { name: raw.name })
            .collect())
    }

    /// Persists a new document whose changelog holds one entry.
    pub fn create(
        &self,
        draft: DocumentDraft<P>,
        commit_message: &str,
        actor: &str,
    ) -> RepoResult<Document<P>> {
        let DocumentDraft { name, payload } = draft;
        if self.exists(&name)? {
            return Err(RepoError::DuplicateName {
                kind: P::KIND,
                name,
            });
        }

        let mut changelog: Vec<ChangelogEntry> = Vec::with_capacity(1);
        record(&mut changelog, commit_message, actor);
        let body = encode_body(&name, &changelog, &payload)?;
        let (id, revision) = self.store.create(&name, &body)?;
        info!(
            "event=document_create module=repo status=ok kind={} name={} revision={}",
            P::KIND,
            name,
            revision
        );

        refetch(&self.store, id, &name)
    }

    /// Replaces name and payload of `name` if `supplied` is still current.
    pub fn update(
        &self,
        name: &str,
        supplied: &Revision,
        draft: DocumentDraft<P>,
        commit_message: &str,
        actor: &str,
    ) -> RepoResult<Document<P>> {
        let updated = guarded_update(&self.store, name, supplied, |document: &mut Document<P>| {
            if draft.name != document.name && self.exists(&draft.name)? {
                return Err(RepoError::DuplicateName {
                    kind: P::KIND,
                    name: draft.name,
                });
            }
            document.name = draft.name;
            document.payload = draft.payload;
            append_entry(document, commit_message, actor);
            Ok(())
        })?;
        info!(
            "event=document_update module=repo status=ok kind={} name={} revision={}",
            P::KIND,
            updated.name,
            updated.revision
        );
        Ok(updated)
    }

    /// Permanently removes the live document named `name`.
    pub fn delete(&self, name: &str) -> RepoResult<()> {
        guarded_delete::<S, P>(&self.store, name)?;
        info!(
            "event=document_delete module=repo status=ok kind={} name={}",
            P::KIND,
            name
        );
        Ok(())
    }

    /// Changelog of `name`, newest first.
    pub fn changelog(&self, name: &str) -> RepoResult<Vec<ChangelogEntry>> {
        Ok(self.find_by_name(name)?.changelog)
    }
}
