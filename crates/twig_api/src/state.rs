//! Shared router state and the blocking bridge into the core.

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::url::UrlBuilder;
use std::sync::Arc;
use twig_core::{TenantHandle, TenantPool};

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<TenantPool>,
    pub config: Arc<ApiConfig>,
    pub urls: UrlBuilder,
}

impl AppState {
    pub fn new(pool: TenantPool, config: ApiConfig) -> Self {
        let urls = UrlBuilder::new(config.public_url.clone());
        Self {
            pool: Arc::new(pool),
            config: Arc::new(config),
            urls,
        }
    }

    /// Runs `op` against the tenant's handle on the blocking pool.
    ///
    /// The async worker only awaits the join handle; storage I/O never runs on it.
    /// The tenant connection is locked per store call inside `op`, not for its
    /// whole duration.
    pub async fn with_tenant<T, F>(&self, tenant: String, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&TenantHandle) -> ApiResult<T> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let handle = pool.handle(&tenant)?;
            op(&handle)
        })
        .await
        .map_err(|err| ApiError::Task(err.to_string()))?
    }
}
