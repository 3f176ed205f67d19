use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::state::SharedState;

/// GET /api/health
///
/// Reports the health of the service and its message store.
pub async fn health_check(State(state): State<SharedState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339(),
            "uptime_secs": state.start_time.elapsed().as_secs()
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");

            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy" })),
            )
                .into_response()
        }
    }
}
