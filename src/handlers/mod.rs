pub mod practical;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Liveness probe.
///
/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// All routes, ready to serve
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/practical/shape", post(practical::shape))
        .route("/api/practical/grade", post(practical::grade))
        .route("/api/practical/draft/encode", post(practical::encode_draft))
        .route("/api/practical/draft/decode", post(practical::decode_draft))
        .route("/api/practical/audit", post(practical::audit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
