//! Twiglet creation use-case.
//!
//! # Responsibility
//! - Route creation through the clone engine when a clone source is given.
//! - Otherwise seed an empty graph bound to an existing model.
//!
//! # Invariants
//! - A seeded twiglet always references a model that existed at creation.
//! - Clones copy the model reference verbatim without re-checking it.

use super::clone_engine::{clone_from, CloneRequest};
use crate::model::document::Document;
use crate::model::twiglet::TwigletPayload;
use crate::repo::entity_repo::{DocumentDraft, ModelRepository, TwigletRepository};
use crate::repo::error::{RepoError, RepoResult};
use crate::store::DocumentStore;

/// Create request as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwigletCreateRequest {
    pub name: String,
    pub description: String,
    /// Model to seed from. Ignored when `clone_source` is set.
    pub model: String,
    pub clone_source: Option<String>,
    pub commit_message: String,
}

/// Twiglet use-cases spanning the model and twiglet collections.
pub struct TwigletService<M: DocumentStore, T: DocumentStore> {
    models: ModelRepository<M>,
    twiglets: TwigletRepository<T>,
}

impl<M: DocumentStore, T: DocumentStore> TwigletService<M, T> {
    pub fn new(models: ModelRepository<M>, twiglets: TwigletRepository<T>) -> Self {
        Self { models, twiglets }
    }

    pub fn twiglets(&self) -> &TwigletRepository<T> {
        &self.twiglets
    }

    /// Creates a twiglet, cloning when the request names a source.
    pub fn create(
        &self,
        request: TwigletCreateRequest,
        actor: &str,
    ) -> RepoResult<Document<TwigletPayload>> {
        let TwigletCreateRequest {
            name,
            description,
            model,
            clone_source,
            commit_message,
        } = request;

        if let Some(source_name) = clone_source {
            let clone = CloneRequest {
                source_name,
                new_name: name,
                new_description: description,
                commit_message,
            };
            return clone_from(&self.twiglets, &clone, actor);
        }

        if !self.models.exists(&model)? {
            return Err(RepoError::NotFound {
                kind: self.models.kind(),
                name: model,
            });
        }

        self.twiglets.create(
            DocumentDraft::new(name, TwigletPayload::seeded(model, description)),
            &commit_message,
            actor,
        )
    }
}
