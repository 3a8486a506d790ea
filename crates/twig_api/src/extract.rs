//! Request-context extractors: tenant and authenticated actor.
//!
//! Authentication itself happens upstream; the proxy forwards the verified
//! identity in `x-twig-user`.

use crate::config::{ACTOR_HEADER, TENANT_HEADER};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Tenant the request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant(pub String);

impl FromRequestParts<AppState> for Tenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let tenant = header_value(parts, TENANT_HEADER)
            .unwrap_or_else(|| state.config.default_tenant.clone());
        Ok(Self(tenant))
    }
}

/// Identity recorded in changelog entries. Required on mutating routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_value(parts, ACTOR_HEADER)
            .map(Self)
            .ok_or(ApiError::Unauthorized)
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
