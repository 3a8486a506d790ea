//! Route handlers. Each one validates, hops onto the blocking pool for the
//! core call, then renders the canonical view.

pub mod models;
pub mod twiglets;

use crate::view::PingView;
use axum::Json;

pub async fn ping() -> Json<PingView> {
    Json(PingView {
        ping: twig_core::ping(),
        version: twig_core::core_version(),
    })
}
