//! Lazily opened per-tenant connection handles.
//!
//! # Responsibility
//! - Resolve a tenant name to its database (file or private in-memory).
//! - Open each tenant database once and hand out shared handles afterwards.
//!
//! # Invariants
//! - Tenant names are validated before any path is derived from them.
//! - A handle, once opened, lives as long as the pool.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

static TENANT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]{0,62}$").expect("valid tenant regex"));

const TENANT_DB_EXTENSION: &str = "sqlite3";

/// Where tenant databases live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRoot {
    /// One `<tenant>.sqlite3` file per tenant under this directory.
    Directory(PathBuf),
    /// One private in-memory database per tenant. Data dies with the pool.
    Memory,
}

/// Shared handle to one tenant database.
#[derive(Clone)]
pub struct TenantHandle {
    tenant: String,
    conn: Arc<Mutex<Connection>>,
}

impl TenantHandle {
    /// Locks the tenant connection for one store call.
    pub fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DbError::LockPoisoned(self.tenant.clone()))
    }
}

/// Registry of per-tenant handles, opened on first use.
pub struct TenantPool {
    root: StoreRoot,
    handles: Mutex<HashMap<String, TenantHandle>>,
}

impl TenantPool {
    /// Creates an empty pool. No database is opened until a tenant is requested.
    pub fn new(root: StoreRoot) -> Self {
        Self {
            root,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the handle for `tenant`, opening its database if needed.
    ///
    /// # Errors
    /// - `InvalidTenant` when the name does not match the tenant pattern.
    /// - Any bootstrap/migration failure of a first open.
    pub fn handle(&self, tenant: &str) -> DbResult<TenantHandle> {
        validate_tenant(tenant)?;

        let mut handles = self
            .handles
            .lock()
            .map_err(|_| DbError::LockPoisoned(tenant.to_string()))?;
        if let Some(handle) = handles.get(tenant) {
            return Ok(handle.clone());
        }

        let conn = match &self.root {
            StoreRoot::Directory(dir) => {
                std::fs::create_dir_all(dir)?;
                open_db(dir.join(format!("{tenant}.{TENANT_DB_EXTENSION}")))?
            }
            StoreRoot::Memory => open_db_in_memory()?,
        };
        info!("event=tenant_open module=db status=ok tenant={tenant}");

        let handle = TenantHandle {
            tenant: tenant.to_string(),
            conn: Arc::new(Mutex::new(conn)),
        };
        handles.insert(tenant.to_string(), handle.clone());
        Ok(handle)
    }

    /// Number of tenant databases opened so far.
    pub fn open_tenants(&self) -> usize {
        self.handles.lock().map_or(0, |handles| handles.len())
    }
}

/// Checks a tenant name against the accepted pattern.
pub fn validate_tenant(tenant: &str) -> DbResult<()> {
    if TENANT_RE.is_match(tenant) {
        Ok(())
    } else {
        Err(DbError::InvalidTenant(tenant.to_string()))
    }
}
