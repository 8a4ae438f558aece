use axum::{
    Router,
    routing::post,
    Json,
    extract::{State, rejection::JsonRejection},
    response::Json as ResponseJson,
};
use crate::models::{AppState, SearchRequest, SearchResponse};
use crate::types::{AppError, AppResult};
use tracing::{info, warn};
use validator::Validate;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", post(search_papers))
        .with_state(state)
}

/// POST /search - Search arXiv, newest submissions first
pub async fn search_papers(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> AppResult<ResponseJson<SearchResponse>> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected malformed search request");
        AppError::InvalidRequest(e.body_text())
    })?;

    request.validate().map_err(|e| {
        warn!(error = %e, "Rejected invalid search request");
        AppError::InvalidRequest(e.to_string())
    })?;

    info!(query = %request.query, max_results = request.max_results, "Received search request");

    let response = state.gateway.search(&request).await?;

    Ok(Json(response))
}
