//! API Routes
//!
//! - `GET /` - Liveness check
//! - `POST /search` - arXiv paper search

pub mod health;
pub mod search;

use axum::Router;
use crate::middleware::apply_cors;
use crate::models::AppState;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
///
/// CORS is restricted to the configured front-end origin; every request
/// gets a tracing span.
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    info!("Creating application router");

    let allowed_origin = state.config.server.cors_allowed_origin.clone();

    let router = Router::new()
        .merge(health::router())
        .merge(search::router(state));

    let router = apply_cors(router, &allowed_origin)?;

    Ok(router.layer(TraceLayer::new_for_http()))
}
