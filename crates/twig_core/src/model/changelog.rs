//! Changelog entry shape and timestamp source.
//!
//! # Invariants
//! - Entries are immutable once recorded.
//! - Timestamps never go backwards within one process, even if the wall
//!   clock does; equal timestamps are allowed.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

static LAST_STAMP_NANOS: AtomicI64 = AtomicI64::new(i64::MIN);

/// One recorded mutation of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub message: String,
    /// Authenticated identity that performed the change.
    pub actor: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

impl ChangelogEntry {
    /// Builds an entry stamped with the current time.
    pub fn now(message: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            actor: actor.into(),
            timestamp: changelog_timestamp(),
        }
    }
}

/// Returns the current UTC time as RFC 3339, clamped to the last value handed out.
pub fn changelog_timestamp() -> String {
    let wall = i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos()).unwrap_or(i64::MAX);
    let previous = LAST_STAMP_NANOS.fetch_max(wall, Ordering::SeqCst);
    let nanos = previous.max(wall);

    OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
