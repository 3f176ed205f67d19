use std::sync::Arc;

use anyhow::Result;
use postbox_admission::AdmissionController;
use postbox_common::{AppConfig, PostboxError};
use postbox_store::{InMemoryStore, MessageStore};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    // Parse command-line args for config path
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/postbox.yaml".to_string());

    info!(config_path = %config_path, "starting postbox");

    // Load configuration
    let config = AppConfig::load(&config_path)?;

    // Admission controller guarding the contact endpoint
    let admission =
        AdmissionController::new(config.admission.window_secs, config.admission.max_requests);
    if config.admission.enabled {
        admission.start_sweep_task(config.admission.sweep_interval_secs);
    } else {
        tracing::warn!("admission control disabled; contact endpoint is unthrottled");
    }

    // Message store collaborator
    let store: Arc<dyn MessageStore> = Arc::new(InMemoryStore::new());
    store
        .ping()
        .await
        .map_err(|e| PostboxError::Store(e.to_string()))?;

    if config.server.admin.token.is_none() {
        tracing::warn!("no admin token configured; message listing and deletion are disabled");
    }

    let listen_addr = config.server.listen.clone();
    let state = postbox_server::new_shared_state(config, admission, store);

    info!("postbox started successfully");
    postbox_server::run_server(state, &listen_addr).await
}
