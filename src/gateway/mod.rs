//! HTTP gateway (Axum) for grading requests.
//!
//! This module is primarily used by the `autograde` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{BatchRequest, BatchResponse, grade_batch_handler, grade_handler};
pub use state::GatewayState;

/// Response header naming the pipeline path that produced a score.
pub const AUTOGRADE_METHOD_HEADER: &str = "x-autograde-method";
/// Response header with a short machine-readable status.
pub const AUTOGRADE_STATUS_HEADER: &str = "x-autograde-status";
/// Correlation id, echoed back or generated when absent.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

pub fn create_router_with_state(state: GatewayState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/grade", post(grade_handler))
        .route("/v1/grade/batch", post(grade_batch_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub backend: String,
    pub mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(AUTOGRADE_STATUS_HEADER, HeaderValue::from_static("healthy"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Always ready: without a backend the engine still grades through the heuristic.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<GatewayState>) -> Response {
    let (backend, mode) = match state.engine.backend_name() {
        Some(name) if state.engine.has_remote_backend() => (name.to_string(), "remote"),
        Some(name) => (name.to_string(), "local"),
        None => ("none".to_string(), "heuristic_only"),
    };

    let mut headers = HeaderMap::new();
    headers.insert(AUTOGRADE_STATUS_HEADER, HeaderValue::from_static("ready"));

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: "ok",
            backend,
            mode,
        }),
    )
        .into_response()
}

async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
