// arXiv Search Gateway - searches arXiv and serves a simplified JSON contract

pub mod config;
pub mod models;
pub mod types;
pub mod search;    // Provider abstraction, arXiv client, record mapping
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> anyhow::Result<axum::Router> {
    routes::create_router(state)
}
