//! HTTP surface for twig: models and twiglets over a per-tenant store pool.
//!
//! # Responsibility
//! - Map the REST routes onto core repositories and services.
//! - Validate payloads and resolve tenant/actor before the core runs.
//! - Translate core failures into status codes at the boundary.
//!
//! # Invariants
//! - Core calls run on the blocking pool, never on an async worker.
//! - Read routes allow anonymous access; mutating routes require an actor.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;
pub mod url;
pub mod validation;
pub mod view;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use handlers::{models, twiglets};
use log::{error, info};
use std::time::Instant;
use tokio::net::TcpListener;

/// Builds the full route table over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/models", get(models::list).post(models::create))
        .route(
            "/models/{name}",
            get(models::get).put(models::update).delete(models::delete),
        )
        .route("/models/{name}/changelog", get(models::changelog))
        .route("/twiglets", get(twiglets::list).post(twiglets::create))
        .route(
            "/twiglets/{name}",
            get(twiglets::get)
                .put(twiglets::update)
                .delete(twiglets::delete),
        )
        .route("/twiglets/{name}/changelog", get(twiglets::changelog))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Serves until ctrl-c.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("event=server_start module=api status=ok addr={addr}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_install module=api status=error error={err}");
        std::future::pending::<()>().await;
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    info!(
        "event=http_request module=api status=done method={} path={} http_status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
