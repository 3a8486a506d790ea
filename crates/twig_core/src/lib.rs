//! Core domain logic for twig: named, versioned models and twiglets.
//! This crate is the single source of truth for the revision protocol.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use db::{DbError, StoreRoot, TenantHandle, TenantPool};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::changelog::ChangelogEntry;
pub use model::document::{Document, DocumentId, DocumentKind, DocumentPayload, Revision};
pub use model::schema::{EntityDefinition, ModelPayload};
pub use model::twiglet::TwigletPayload;
pub use repo::entity_repo::{
    DocumentDraft, DocumentSummary, EntityRepository, ModelRepository, TwigletRepository,
};
pub use repo::error::{FailureClass, RepoError, RepoResult};
pub use service::clone_engine::{clone_from, CloneRequest};
pub use service::twiglet_service::{TwigletCreateRequest, TwigletService};
pub use store::{
    DocumentStore, RawDocument, SqliteCollection, StoreError, StoreResult, TenantCollection,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
