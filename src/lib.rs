pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::TranscribeConfig;
use crate::services::storage::StorageService;
use crate::services::transcribe_service::TranscribeService;
use axum::{
    Router,
    http::{HeaderValue, header},
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::transcribe::transcribe_audio,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::transcribe::TranscribeUpload,
            api::handlers::transcribe::TranscriptResponse,
            api::handlers::transcribe::ErrorResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "transcribe", description = "Audio upload and transcription"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageService>,
    pub transcriber: Arc<TranscribeService>,
    pub config: TranscribeConfig,
}

pub fn create_app(state: AppState) -> Router {
    let transcribe_route = post(api::handlers::transcribe::transcribe_audio)
        .fallback(api::handlers::transcribe::method_not_allowed);

    // CorsLayer answers every OPTIONS itself, so the transcribe routes stay
    // outside it and only get the allow-origin header a simple POST needs.
    let transcribe_routes = Router::new()
        .route("/api/transcribe", transcribe_route.clone())
        .route("/transcribe", transcribe_route)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ));

    let system_routes = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        );

    Router::new()
        .merge(transcribe_routes)
        .merge(system_routes)
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_upload_size,
        ))
        .with_state(state)
}
