use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use postbox_admission::Decision;
use serde_json::json;

use crate::client_key::extract_client_key;
use crate::state::SharedState;
use crate::validate::{validate_form, ContactForm};

/// POST /api/contact
///
/// Public contact form intake. Admission control runs first, before any
/// validation or persistence work; a rejected request costs one map lookup.
pub async fn submit_message(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(form): Json<ContactForm>,
) -> Response {
    state.metrics.requests_total.inc();

    let client_key = extract_client_key(&headers);

    let admission_enabled = {
        let config = state.config.read().expect("config lock poisoned");
        config.admission.enabled
    };

    if admission_enabled {
        if let Decision::Rejected { retry_after_secs } =
            state.admission.check_and_account(&client_key, Utc::now())
        {
            state.metrics.rate_limited_total.inc();
            tracing::warn!(client = %client_key, retry_after_secs, "contact submission rate limited");

            return (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", retry_after_secs.to_string())],
                Json(json!({ "error": "Too many requests. Please try again later." })),
            )
                .into_response();
        }
    }

    let new_message = match validate_form(&form) {
        Ok(message) => message,
        Err(reason) => {
            state.metrics.validation_failures.inc();
            tracing::debug!(client = %client_key, reason, "contact submission failed validation");

            return (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response();
        }
    };

    match state.store.insert(new_message).await {
        Ok(receipt) => {
            state.metrics.messages_stored.inc();
            tracing::info!(id = %receipt.id, client = %client_key, "contact message stored");

            (
                StatusCode::CREATED,
                Json(json!({ "message": "Message sent successfully" })),
            )
                .into_response()
        }
        Err(e) => {
            state.metrics.store_errors.inc();
            tracing::error!(error = %e, "failed to store contact message");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}
