//! SQLite storage bootstrap, schema migrations and per-tenant handles.
//!
//! # Responsibility
//! - Open and configure SQLite connections for twig core.
//! - Apply schema migrations in deterministic order.
//! - Own the lifecycle of per-tenant connection handles.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write documents before migrations succeed.
//! - One tenant maps to exactly one database.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod pool;

pub use open::{open_db, open_db_in_memory};
pub use pool::{validate_tenant, StoreRoot, TenantHandle, TenantPool};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    InvalidTenant(String),
    Io(std::io::Error),
    LockPoisoned(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidTenant(tenant) => write!(f, "invalid tenant name `{tenant}`"),
            Self::Io(err) => write!(f, "io: {err}"),
            Self::LockPoisoned(tenant) => {
                write!(f, "store handle for tenant `{tenant}` is poisoned")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::InvalidTenant(_) | Self::LockPoisoned(_) => {
                None
            }
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
