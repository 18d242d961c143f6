//! HTTP gateway (Axum) for article verdicts.
//!
//! This module is primarily used by the `veritas` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub use handler::predict_handler;
pub use state::AppState;

pub const VERITAS_STATUS_HEADER: &str = "X-Veritas-Status";
pub const VERITAS_STATUS_HEALTHY: &str = "healthy";
pub const VERITAS_STATUS_READY: &str = "ready";
pub const VERITAS_STATUS_VERDICT: &str = "verdict";
pub const VERITAS_STATUS_ERROR: &str = "error";

pub fn create_router_with_state(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/predict", post(predict_handler));

    // The landing page is optional; the JSON API works without it.
    if state.static_path.is_dir() {
        router = router
            .route_service("/", ServeFile::new(state.static_path.join("index.html")))
            .nest_service("/static", ServeDir::new(&state.static_path));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub encoder: &'static str,
    pub classifier: &'static str,
    pub static_assets: &'static str,
    pub encoder_mode: &'static str,
    pub embedding_dim: usize,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        VERITAS_STATUS_HEADER,
        HeaderValue::from_static(VERITAS_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

use axum::extract::State;

#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let encoder = state.pipeline.encoder();

    // Artifact paths are re-checked on disk, not cached from startup.
    let encoder_status = if encoder.is_stub() || encoder.config().model_available() {
        VERITAS_STATUS_READY
    } else {
        VERITAS_STATUS_ERROR
    };

    let classifier_status = if encoder.is_stub() || state.classifier_path.is_file() {
        VERITAS_STATUS_READY
    } else {
        VERITAS_STATUS_ERROR
    };

    let static_status = if state.static_path.is_dir() {
        VERITAS_STATUS_READY
    } else {
        "missing"
    };

    let encoder_mode = if encoder.is_stub() { "stub" } else { "real" };

    let components = ComponentStatus {
        http: VERITAS_STATUS_READY,
        encoder: encoder_status,
        classifier: classifier_status,
        static_assets: static_status,
        encoder_mode,
        embedding_dim: state.pipeline.embedding_dim(),
    };

    // The landing page never gates readiness.
    let is_ready = components.encoder == VERITAS_STATUS_READY
        && components.classifier == VERITAS_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(
        VERITAS_STATUS_HEADER,
        HeaderValue::from_str(status_msg).unwrap_or(HeaderValue::from_static(VERITAS_STATUS_ERROR)),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
