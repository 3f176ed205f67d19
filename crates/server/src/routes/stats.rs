use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::SharedState;

/// GET /api/stats
///
/// Returns aggregated intake statistics derived from Prometheus counters,
/// the admission controller, and the server's uptime.
pub async fn get_stats(State(state): State<SharedState>) -> Json<Value> {
    let uptime_secs = state.start_time.elapsed().as_secs();
    let total_requests = state.metrics.requests_total.get() as u64;
    let rate_limited_requests = state.metrics.rate_limited_total.get() as u64;
    let messages_stored = state.metrics.messages_stored.get() as u64;
    let tracked_clients = state.admission.tracked_clients();

    Json(json!({
        "total_requests": total_requests,
        "rate_limited_requests": rate_limited_requests,
        "messages_stored": messages_stored,
        "tracked_clients": tracked_clients,
        "uptime_secs": uptime_secs
    }))
}
