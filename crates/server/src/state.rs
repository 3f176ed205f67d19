use std::sync::{Arc, RwLock};

use postbox_admission::AdmissionController;
use postbox_common::AppConfig;
use postbox_store::MessageStore;
use prometheus::{IntCounter, Opts, Registry};

/// Shared state type alias used across all route handlers.
pub type SharedState = Arc<AppState>;

/// Central application state holding configuration, collaborators, and metrics.
pub struct AppState {
    pub config: RwLock<AppConfig>,
    pub admission: AdmissionController,
    pub store: Arc<dyn MessageStore>,
    pub metrics: ContactMetrics,
    pub start_time: std::time::Instant,
}

/// Prometheus metrics collected by the intake service.
pub struct ContactMetrics {
    pub registry: Registry,
    pub requests_total: IntCounter,
    pub rate_limited_total: IntCounter,
    pub validation_failures: IntCounter,
    pub messages_stored: IntCounter,
    pub messages_deleted: IntCounter,
    pub store_errors: IntCounter,
}

impl ContactMetrics {
    /// Create a new ContactMetrics instance with all counters registered
    /// against a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests_total = IntCounter::with_opts(Opts::new(
            "postbox_contact_requests_total",
            "Total number of contact submissions received",
        ))
        .expect("failed to create requests_total counter");

        let rate_limited_total = IntCounter::with_opts(Opts::new(
            "postbox_rate_limited_total",
            "Total number of submissions rejected by admission control",
        ))
        .expect("failed to create rate_limited_total counter");

        let validation_failures = IntCounter::with_opts(Opts::new(
            "postbox_validation_failures_total",
            "Total number of submissions rejected by input validation",
        ))
        .expect("failed to create validation_failures counter");

        let messages_stored = IntCounter::with_opts(Opts::new(
            "postbox_messages_stored_total",
            "Total number of messages accepted into the store",
        ))
        .expect("failed to create messages_stored counter");

        let messages_deleted = IntCounter::with_opts(Opts::new(
            "postbox_messages_deleted_total",
            "Total number of messages deleted via the admin API",
        ))
        .expect("failed to create messages_deleted counter");

        let store_errors = IntCounter::with_opts(Opts::new(
            "postbox_store_errors_total",
            "Total number of message store failures",
        ))
        .expect("failed to create store_errors counter");

        registry
            .register(Box::new(requests_total.clone()))
            .expect("failed to register requests_total");
        registry
            .register(Box::new(rate_limited_total.clone()))
            .expect("failed to register rate_limited_total");
        registry
            .register(Box::new(validation_failures.clone()))
            .expect("failed to register validation_failures");
        registry
            .register(Box::new(messages_stored.clone()))
            .expect("failed to register messages_stored");
        registry
            .register(Box::new(messages_deleted.clone()))
            .expect("failed to register messages_deleted");
        registry
            .register(Box::new(store_errors.clone()))
            .expect("failed to register store_errors");

        Self {
            registry,
            requests_total,
            rate_limited_total,
            validation_failures,
            messages_stored,
            messages_deleted,
            store_errors,
        }
    }
}

impl AppState {
    /// Create a new AppState from the given configuration and collaborators.
    pub fn new(
        config: AppConfig,
        admission: AdmissionController,
        store: Arc<dyn MessageStore>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            admission,
            store,
            metrics: ContactMetrics::new(),
            start_time: std::time::Instant::now(),
        }
    }
}
