use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    adapters::{
        controllers::{
            content_controller::ContentController, file_controller::FileController,
            health_controller::HealthController,
        },
        state::AppState,
    },
    domain::config::{local::LocalConfig, ConfigError},
};

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

async fn hello_world() -> &'static str {
    "Hello, world!"
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = usize::try_from(state.global_config.max_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(hello_world))
        .route("/api/v1/health", get(HealthController::health_check))
        .route(
            "/api/v1/uploads",
            post(FileController::upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/api/v1/sections/{section}",
            get(ContentController::get_section),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn cors_layer(local_config: &LocalConfig) -> Result<CorsLayer, ConfigError> {
    let Some(allowed_origins) = &local_config.cors_allowed_origins else {
        // Allow all origins if not specified (only for development)
        return Ok(CorsLayer::permissive());
    };

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ConfigError::Invalid {
                    name: "CORS_ALLOWED_ORIGINS",
                    value: origin.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
