pub mod auth;
pub mod client_key;
pub mod headers;
pub mod routes;
pub mod state;
pub mod validate;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use postbox_admission::AdmissionController;
use postbox_store::MessageStore;
use tower_http::cors::{Any, CorsLayer};

use crate::state::SharedState;

pub use state::{AppState, ContactMetrics, SharedState as SharedStateType};

/// Build the Axum router with all API routes and middleware.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Public contact form intake
        .route("/api/contact", post(routes::contact::submit_message))
        // Admin message management
        .route(
            "/api/messages",
            get(routes::messages::list_messages).delete(routes::messages::delete_message),
        )
        // Health check
        .route("/api/health", get(routes::health::health_check))
        // Prometheus metrics
        .route("/api/metrics", get(routes::metrics::get_metrics))
        // Traffic statistics
        .route("/api/stats", get(routes::stats::get_stats))
        // Attach shared state and middleware
        .with_state(state)
        .layer(middleware::from_fn(headers::security_headers))
        .layer(cors)
}

/// Start the API server on the specified address.
///
/// This function will block until the server is shut down.
pub async fn run_server(state: SharedState, listen_addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("postbox API server listening on {}", listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Convenience function to create a SharedState from the service's parts.
pub fn new_shared_state(
    config: postbox_common::AppConfig,
    admission: AdmissionController,
    store: Arc<dyn MessageStore>,
) -> SharedState {
    Arc::new(AppState::new(config, admission, store))
}
