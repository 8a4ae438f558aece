// CORS configuration
// Browsers may call the API from exactly one origin, with credentials.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build the CORS layer for the front-end origin.
///
/// The allow-origin header is only sent back when the request's `Origin`
/// matches. Wildcard methods/headers are not allowed together with
/// credentials, so both are mirrored from the preflight request instead.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin)
        .with_context(|| format!("invalid CORS origin: {}", allowed_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

pub fn apply_cors(router: Router, allowed_origin: &str) -> Result<Router> {
    Ok(router.layer(cors_layer(allowed_origin)?))
}
