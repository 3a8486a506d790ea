//! Repository error taxonomy.

use crate::model::document::{DocumentKind, Revision};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Coarse failure classes callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    NotFound,
    Conflict,
    StoreFailure,
}

#[derive(Debug)]
pub enum RepoError {
    /// No live document of `kind` is named `name`.
    NotFound { kind: DocumentKind, name: String },
    /// Another live document of `kind` already uses `name`.
    DuplicateName { kind: DocumentKind, name: String },
    /// Caller's revision is not the stored one.
    StaleRevision {
        kind: DocumentKind,
        name: String,
        current: Revision,
    },
    Store(StoreError),
    /// Stored body does not decode into the expected payload.
    InvalidData(String),
}

impl RepoError {
    pub fn class(&self) -> FailureClass {
        match self {
            Self::NotFound { .. } => FailureClass::NotFound,
            Self::DuplicateName { .. } | Self::StaleRevision { .. } => FailureClass::Conflict,
            Self::Store(_) | Self::InvalidData(_) => FailureClass::StoreFailure,
        }
    }

    /// HTTP-style status for direct translation by the transport.
    pub fn status_code(&self) -> u16 {
        match self.class() {
            FailureClass::NotFound => 404,
            FailureClass::Conflict => 409,
            FailureClass::StoreFailure => 500,
        }
    }

    /// Stable token for logs and response bodies.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::DuplicateName { .. } => "name_taken",
            Self::StaleRevision { .. } => "stale_revision",
            Self::Store(_) => "store_failure",
            Self::InvalidData(_) => "invalid_data",
        }
    }

    /// Stored revision a retrying caller should send next.
    pub fn current_revision(&self) -> Option<&Revision> {
        match self {
            Self::StaleRevision { current, .. } => Some(current),
            _ => None,
        }
    }

    /// Attaches document context to a store failure.
    pub(crate) fn from_store(err: StoreError, kind: DocumentKind, name: &str) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound {
                kind,
                name: name.to_string(),
            },
            StoreError::Conflict { current } => Self::StaleRevision {
                kind,
                name: name.to_string(),
                current,
            },
            other => Self::Store(other),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, name } => write!(f, "{kind} not found: `{name}`"),
            Self::DuplicateName { kind, name } => {
                write!(f, "{kind} with name `{name}` already exists")
            }
            Self::StaleRevision {
                kind,
                name,
                current,
            } => write!(
                f,
                "{kind} `{name}` was modified concurrently (current revision {current})"
            ),
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid document data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<crate::db::DbError> for RepoError {
    fn from(value: crate::db::DbError) -> Self {
        Self::Store(StoreError::Db(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureClass, RepoError};
    use crate::model::document::{DocumentKind, Revision};
    use crate::store::StoreError;
    use uuid::Uuid;

    #[test]
    fn store_conflict_keeps_current_revision() {
        let err = RepoError::from_store(
            StoreError::Conflict {
                current: Revision::new("3-abc"),
            },
            DocumentKind::Model,
            "m",
        );
        assert_eq!(err.class(), FailureClass::Conflict);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.current_revision(), Some(&Revision::new("3-abc")));
    }

    #[test]
    fn store_not_found_maps_to_named_not_found() {
        let err = RepoError::from_store(
            StoreError::NotFound(Uuid::new_v4()),
            DocumentKind::Twiglet,
            "gone",
        );
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "twiglet not found: `gone`");
        assert!(err.current_revision().is_none());
    }

    #[test]
    fn unclassified_store_errors_are_internal() {
        let err = RepoError::from(StoreError::InvalidData("bad".to_string()));
        assert_eq!(err.class(), FailureClass::StoreFailure);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "store_failure");
    }
}
