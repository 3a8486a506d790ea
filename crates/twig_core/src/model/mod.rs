//! Domain model for named, versioned documents.
//!
//! # Responsibility
//! - Define the document envelope shared by models and twiglets.
//! - Define the per-kind payloads and the changelog entry shape.
//!
//! # Invariants
//! - Every document is identified internally by a stable `DocumentId`.
//! - Externally, documents are addressed by `name`, which may change.
//! - Deletion is permanent; there is no tombstone state.

pub mod changelog;
pub mod document;
pub mod schema;
pub mod twiglet;
