//! Document envelope and identity types.
//!
//! # Responsibility
//! - Carry store identity (`internal_id`, `revision`) next to the
//!   externally visible `name`, the changelog and a kind-specific payload.
//!
//! # Invariants
//! - `internal_id` never changes for the lifetime of a document.
//! - `revision` is opaque: only equality is meaningful.

use crate::model::changelog::ChangelogEntry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned identifier. Never exposed through the public API.
pub type DocumentId = Uuid;

/// Opaque version token assigned by the store on every write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    /// Wraps a token produced by a store or received from a caller.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Revision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document families. Each kind lives in its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Model,
    Twiglet,
}

impl DocumentKind {
    /// Collection name used by the store and by resource paths.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Model => "models",
            Self::Twiglet => "twiglets",
        }
    }

    /// Singular label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Twiglet => "twiglet",
        }
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-specific structured data stored alongside the envelope fields.
pub trait DocumentPayload: Clone + Serialize + DeserializeOwned {
    const KIND: DocumentKind;
}

/// A live document as observed at one revision.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<P> {
    pub internal_id: DocumentId,
    pub revision: Revision,
    pub name: String,
    /// Newest entry first. Never empty once created.
    pub changelog: Vec<ChangelogEntry>,
    pub payload: P,
}
