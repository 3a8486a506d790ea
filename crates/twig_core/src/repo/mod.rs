//! Entity repositories and the write protocol they share.
//!
//! # Responsibility
//! - Resolve documents by external `name` instead of internal id.
//! - Route every update/delete through the revision guard.
//! - Record exactly one changelog entry per successful create/update.
//!
//! # Invariants
//! - A stale revision never overwrites newer state.
//! - Failures are returned as `RepoError`, never swallowed.
//! - Changelog entries are only ever prepended.

pub mod changelog;
mod codec;
pub mod entity_repo;
pub mod error;
pub mod guard;
