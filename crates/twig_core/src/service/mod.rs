//! Use-case services composed from repositories.
//!
//! # Responsibility
//! - Seed new twiglets from a model or clone them from another twiglet.
//! - Keep transport layers decoupled from collection plumbing.

pub mod clone_engine;
pub mod twiglet_service;
