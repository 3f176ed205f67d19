//! Admission control for the contact intake endpoint.
//!
//! This crate implements a per-client fixed window counter behind the
//! [`AdmissionController`] facade: each client key gets a budget of
//! `max_requests` admissions per `window_secs`-long window, anchored to that
//! client's own first request rather than to globally aligned boundaries.
//!
//! The record map uses [`DashMap`](dashmap::DashMap) so checks for one key
//! are atomic without serializing unrelated clients, and a periodic sweep
//! evicts expired records to keep memory bounded under high key cardinality.
//!
//! All accounting is process-local and in-memory. A restart resets every
//! budget, and parallel instances each enforce the limit independently;
//! enforcing one global limit would require an external shared counter
//! store, which this crate deliberately does not attempt.

pub mod fixed_window;

use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use fixed_window::FixedWindowLimiter;

/// Outcome of an admission check.
///
/// `Rejected` is an expected result communicating budget exhaustion, not an
/// error; the controller never fails per-call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request may proceed and has been counted against the budget.
    Admitted,
    /// The window budget is exhausted. `retry_after_secs` is the time until
    /// the window resets, floored at one second.
    Rejected { retry_after_secs: u64 },
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admitted)
    }
}

/// The admission controller consulted by the request handler before any
/// downstream work.
///
/// Cheaply cloneable (backed by `Arc`) and safe to share across tasks and
/// threads. It exclusively owns the record map; nothing else reads or
/// mutates it.
#[derive(Clone)]
pub struct AdmissionController {
    inner: Arc<FixedWindowLimiter>,
}

impl AdmissionController {
    /// Create an admission controller with the given window and budget.
    ///
    /// Both values are fixed for the lifetime of the process.
    pub fn new(window_secs: u64, max_requests: u32) -> Self {
        tracing::info!(window_secs, max_requests, "creating fixed window admission controller");
        Self {
            inner: Arc::new(FixedWindowLimiter::new(window_secs, max_requests)),
        }
    }

    /// Decide whether the request identified by `client_key` at `now` may
    /// proceed, counting it if admitted.
    pub fn check_and_account(&self, client_key: &str, now: DateTime<Utc>) -> Decision {
        self.inner.check_and_account(client_key, now)
    }

    /// Number of client keys currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.inner.tracked_clients()
    }

    /// Spawn a background task that evicts expired records every
    /// `interval_secs` seconds.
    ///
    /// The task holds an `Arc` to the limiter and runs until the runtime
    /// shuts down. Sweeping is an optimization only; admit/reject outcomes
    /// are identical with or without it.
    pub fn start_sweep_task(&self, interval_secs: u64) {
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs));
            // The first tick completes immediately; skip it so sweeps start
            // one full interval after launch.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                inner.sweep(Utc::now());
                tracing::trace!("admission sweep tick completed");
            }
        });
    }
}
