//! Changelog Recorder.
//!
//! # Invariants
//! - Exactly one entry per successful create or update; none on delete.
//! - Entries are prepended, so index 0 is always the newest.

use crate::model::changelog::ChangelogEntry;
use crate::model::document::Document;

/// Prepends a freshly stamped entry to `changelog`.
pub fn record(changelog: &mut Vec<ChangelogEntry>, message: &str, actor: &str) {
    changelog.insert(0, ChangelogEntry::now(message, actor));
}

/// Puts a new entry at the head of `document`'s changelog.
pub fn append_entry<P>(document: &mut Document<P>, message: &str, actor: &str) {
    record(&mut document.changelog, message, actor);
}
