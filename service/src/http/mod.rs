//! Router assembly and shared middleware.
//!
//! [`app`] is the production router: `/health`, the `/api` routes, optional
//! Swagger UI, then the state extension, CORS, and security headers as the
//! outermost layer.

pub mod cors;
pub mod security;

use axum::{http::StatusCode, middleware, routing::get, Extension, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::rest::{self, ApiDoc};
use crate::state::AppState;

pub use cors::cors_layer;
pub use security::{security_headers_middleware, SecurityHeaders};

#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Full application router for a loaded config and wired state.
pub fn app(config: &Config, state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", rest::router());

    if config.swagger.enabled {
        tracing::info!("Swagger UI enabled at /swagger-ui");
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app = app
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors.allowed_origins));

    if config.security_headers.enabled {
        let headers = SecurityHeaders::from_config(&config.security_headers);
        app = app.layer(middleware::from_fn_with_state(
            headers,
            security_headers_middleware,
        ));
    } else {
        tracing::info!("Security headers disabled");
    }

    app
}
