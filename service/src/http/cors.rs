//! CORS layer built from the configured origin list.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// `"*"` anywhere in the list allows any origin; an empty list blocks
/// cross-origin requests. Unparseable origins are dropped.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        tracing::info!("CORS allows any origin");
        AllowOrigin::any()
    } else if origins.is_empty() {
        tracing::info!("CORS origins empty, cross-origin requests will be blocked");
        AllowOrigin::list(Vec::<HeaderValue>::new())
    } else {
        tracing::info!(?origins, "CORS allowed origins configured");
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(allow_origin)
}
