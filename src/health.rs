use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::error;

use crate::{error::invalid_endpoint, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health).fallback(invalid_endpoint))
}

/// Round-trips to the store.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "database connection ok" })),
        ),
        Err(e) => {
            error!(error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "database connection failed",
                    "error": e.to_string(),
                })),
            )
        }
    }
}
