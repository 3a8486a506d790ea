//! Transport configuration.
//!
//! # Invariants
//! - `public_url` never ends with `/`.
//! - `default_tenant` is a valid tenant name.

use twig_core::db::validate_tenant;

pub const DEFAULT_TENANT: &str = "default";
pub const TENANT_HEADER: &str = "x-twig-tenant";
pub const ACTOR_HEADER: &str = "x-twig-user";

/// Settings the router needs beyond the store pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base for `url` and `changelog_url` fields, e.g. `https://twig.example.com`.
    pub public_url: String,
    /// Tenant used when a request carries no tenant header.
    pub default_tenant: String,
}

impl ApiConfig {
    /// Validates and normalizes transport settings.
    ///
    /// # Errors
    /// - `public_url` is blank.
    /// - `default_tenant` is not a valid tenant name.
    pub fn new(public_url: &str, default_tenant: &str) -> Result<Self, String> {
        let public_url = public_url.trim().trim_end_matches('/');
        if public_url.is_empty() {
            return Err("public_url cannot be empty".to_string());
        }
        validate_tenant(default_tenant).map_err(|err| err.to_string())?;

        Ok(Self {
            public_url: public_url.to_string(),
            default_tenant: default_tenant.to_string(),
        })
    }
}
