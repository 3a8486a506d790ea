//! `twigd`: serves the twig HTTP API.
//!
//! # Responsibility
//! - Turn flags/environment into core and transport configuration.
//! - Initialize logging before anything else logs.
//! - Bind the listener and run until ctrl-c.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use twig_api::{ApiConfig, AppState};
use twig_core::{StoreRoot, TenantPool};

#[derive(Parser, Debug)]
#[command(author, version, about = "Versioned models and twiglets over HTTP")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "TWIG_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Directory holding one database per tenant. In-memory when omitted.
    #[arg(long, env = "TWIG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Public base URL used in `url` and `changelog_url` fields.
    /// Defaults to `http://<bind>`.
    #[arg(long, env = "TWIG_PUBLIC_URL")]
    public_url: Option<String>,

    /// Tenant used when a request carries no `x-twig-tenant` header.
    #[arg(long, env = "TWIG_DEFAULT_TENANT", default_value = twig_api::config::DEFAULT_TENANT)]
    default_tenant: String,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "TWIG_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs to stderr when omitted.
    #[arg(long, env = "TWIG_LOG_DIR")]
    log_dir: Option<String>,
}

impl Args {
    fn store_root(&self) -> StoreRoot {
        self.data_dir
            .clone()
            .map_or(StoreRoot::Memory, StoreRoot::Directory)
    }

    fn api_config(&self) -> Result<ApiConfig> {
        let public_url = self
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.bind));
        ApiConfig::new(&public_url, &self.default_tenant).map_err(|err| anyhow!(err))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| twig_core::default_log_level().to_string());
    twig_core::init_logging(&level, args.log_dir.as_deref())
        .map_err(|err| anyhow!(err))
        .context("logging init failed")?;
    if let Some((level, dir)) = twig_core::logging_status() {
        info!("event=logging_ready module=cli status=ok level={level} dir={dir:?}");
    }

    let config = args.api_config()?;
    let root = args.store_root();
    info!(
        "event=twigd_config module=cli status=ok core_version={} bind={} root={:?} public_url={} default_tenant={}",
        twig_core::core_version(),
        args.bind,
        root,
        config.public_url,
        config.default_tenant
    );

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    let state = AppState::new(TenantPool::new(root), config);
    let pool = Arc::clone(&state.pool);
    twig_api::serve(listener, state)
        .await
        .context("server failed")?;
    info!(
        "event=twigd_stop module=cli status=ok open_tenants={}",
        pool.open_tenants()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use twig_core::StoreRoot;

    #[test]
    fn defaults_to_memory_store_and_bind_derived_url() {
        let args = Args::try_parse_from(["twigd"]).unwrap();
        assert_eq!(args.store_root(), StoreRoot::Memory);
        let config = args.api_config().unwrap();
        assert_eq!(config.public_url, "http://127.0.0.1:3000");
        assert_eq!(config.default_tenant, "default");
    }

    #[test]
    fn data_dir_selects_file_store() {
        let args = Args::try_parse_from([
            "twigd",
            "--data-dir",
            "/var/lib/twig",
            "--public-url",
            "https://twig.example.com/",
        ])
        .unwrap();
        assert_eq!(
            args.store_root(),
            StoreRoot::Directory("/var/lib/twig".into())
        );
        assert_eq!(
            args.api_config().unwrap().public_url,
            "https://twig.example.com"
        );
    }

    #[test]
    fn bad_default_tenant_is_a_config_error() {
        let args = Args::try_parse_from(["twigd", "--default-tenant", "Bad Name"]).unwrap();
        assert!(args.api_config().is_err());
    }
}
