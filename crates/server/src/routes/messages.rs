use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use postbox_store::StoreError;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::is_authorized;
use crate::state::SharedState;

/// Query parameters for the delete endpoint.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: Option<String>,
}

/// GET /api/messages
///
/// Admin-gated listing of stored messages, newest first.
pub async fn list_messages(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers, admin_token(&state).as_deref()) {
        return unauthorized();
    }

    match state.store.list().await {
        Ok(messages) => Json(json!({
            "total": messages.len(),
            "messages": messages
        }))
        .into_response(),
        Err(e) => {
            state.metrics.store_errors.inc();
            tracing::error!(error = %e, "failed to list messages");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

/// DELETE /api/messages?id=<uuid>
///
/// Admin-gated deletion of a single stored message.
pub async fn delete_message(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<DeleteQuery>,
) -> Response {
    if !is_authorized(&headers, admin_token(&state).as_deref()) {
        return unauthorized();
    }

    let Some(raw_id) = params.id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing ID" })),
        )
            .into_response();
    };

    let Ok(id) = Uuid::parse_str(&raw_id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid ID" })),
        )
            .into_response();
    };

    match state.store.delete(id).await {
        Ok(()) => {
            state.metrics.messages_deleted.inc();
            tracing::info!(%id, "message deleted via admin API");

            Json(json!({ "success": true })).into_response()
        }
        Err(StoreError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Message not found" })),
        )
            .into_response(),
        Err(e) => {
            state.metrics.store_errors.inc();
            tracing::error!(error = %e, %id, "failed to delete message");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

fn admin_token(state: &SharedState) -> Option<String> {
    let config = state.config.read().expect("config lock poisoned");
    config.server.admin.token.clone()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}
