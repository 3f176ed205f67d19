use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::Decision;

/// Per-client accounting record for the current window.
struct ClientWindow {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// A concurrent fixed window counter.
///
/// Each client key gets up to `max_requests` admissions per window, with the
/// window anchored to that client's first request in it rather than to
/// globally aligned boundaries. The algorithm is O(1) per request and O(1)
/// memory per key; the price is that a client straddling a window boundary
/// can fit up to `2 * max_requests` requests into one window-length span.
///
/// The caller supplies `now` on every check, so the whole state machine is
/// deterministic under test. Clock reads stay at the call boundary.
pub struct FixedWindowLimiter {
    windows: DashMap<String, ClientWindow>,
    window: Duration,
    max_requests: u32,
}

impl FixedWindowLimiter {
    /// Create a new fixed window limiter.
    ///
    /// * `window_secs`  - window duration in seconds
    /// * `max_requests` - maximum admissions per key per window
    pub fn new(window_secs: u64, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window: Duration::seconds(window_secs as i64),
            max_requests,
        }
    }

    /// Check whether a request from `client_key` observed at `now` may
    /// proceed, and count it against the window budget if so.
    ///
    /// The entry guard is held across the whole read-modify-write, so two
    /// concurrent calls for one key can never both observe the same
    /// pre-increment count. Calls for distinct keys do not serialize against
    /// each other beyond the map's shard locking.
    pub fn check_and_account(&self, client_key: &str, now: DateTime<Utc>) -> Decision {
        let mut entry = self
            .windows
            .entry(client_key.to_string())
            .or_insert_with(|| ClientWindow {
                count: 0,
                reset_at: now + self.window,
            });

        let record = entry.value_mut();

        // An expired record counts as empty whether or not the sweep has
        // physically removed it yet. `>=` so a request landing exactly on the
        // boundary starts the new window.
        if now >= record.reset_at {
            record.count = 1;
            record.reset_at = now + self.window;
            return Decision::Admitted;
        }

        if record.count < self.max_requests {
            record.count += 1;
            return Decision::Admitted;
        }

        // Rejection leaves the record untouched, so the ban never extends
        // past the original reset time.
        let retry_after_secs = (record.reset_at - now).num_seconds().max(1) as u64;
        Decision::Rejected { retry_after_secs }
    }

    /// Remove records whose window has expired as of `now`.
    ///
    /// This should be called periodically to keep memory bounded under
    /// high client-key cardinality. Skipping it never changes admit/reject
    /// outcomes; expired records are reset lazily on next access.
    pub fn sweep(&self, now: DateTime<Utc>) {
        self.windows.retain(|_key, record| now < record.reset_at);

        tracing::debug!(remaining = self.windows.len(), "admission sweep complete");
    }

    /// Number of client keys currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_ms(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn admits_up_to_the_ceiling() {
        let limiter = FixedWindowLimiter::new(900, 50);

        for i in 0..50 {
            assert!(
                limiter.check_and_account("1.2.3.4", at_ms(i * 1000)).is_admitted(),
                "request {} should be admitted",
                i
            );
        }
    }

    #[test]
    fn rejects_once_exhausted_without_extending_the_window() {
        let limiter = FixedWindowLimiter::new(900, 3);

        for _ in 0..3 {
            assert!(limiter.check_and_account("a", at_ms(0)).is_admitted());
        }

        // Repeated rejections do not push the reset time out; the client is
        // re-admitted at the original boundary no matter how often it retried.
        for t in [1_000, 100_000, 899_999] {
            assert!(!limiter.check_and_account("a", at_ms(t)).is_admitted());
        }
        assert!(limiter.check_and_account("a", at_ms(900_000)).is_admitted());
    }

    #[test]
    fn boundary_instant_starts_a_new_window() {
        let limiter = FixedWindowLimiter::new(900, 1);

        assert!(limiter.check_and_account("edge", at_ms(0)).is_admitted());
        assert!(!limiter.check_and_account("edge", at_ms(899_999)).is_admitted());

        // now == reset_at is already the next window, not the tail of the old one.
        assert!(limiter.check_and_account("edge", at_ms(900_000)).is_admitted());
    }

    #[test]
    fn independent_keys() {
        let limiter = FixedWindowLimiter::new(900, 2);

        assert!(limiter.check_and_account("a", at_ms(0)).is_admitted());
        assert!(limiter.check_and_account("a", at_ms(0)).is_admitted());
        assert!(!limiter.check_and_account("a", at_ms(0)).is_admitted());

        // Key B never made a request; A's exhaustion is invisible to it.
        assert!(limiter.check_and_account("b", at_ms(0)).is_admitted());
    }

    #[test]
    fn fifty_per_fifteen_minutes_scenario() {
        // 900_000 ms window, 50 requests: the documented production defaults.
        let limiter = FixedWindowLimiter::new(900, 50);
        let key = "1.2.3.4";

        for _ in 0..50 {
            assert!(limiter.check_and_account(key, at_ms(0)).is_admitted());
        }

        match limiter.check_and_account(key, at_ms(500_000)) {
            Decision::Rejected { retry_after_secs } => assert_eq!(retry_after_secs, 400),
            Decision::Admitted => panic!("51st request within the window must be rejected"),
        }

        // At the reset instant the window restarts and runs to t=1_800_000.
        assert!(limiter.check_and_account(key, at_ms(900_000)).is_admitted());
        for _ in 0..49 {
            assert!(limiter.check_and_account(key, at_ms(1_000_000)).is_admitted());
        }
        assert!(!limiter.check_and_account(key, at_ms(1_799_999)).is_admitted());
        assert!(limiter.check_and_account(key, at_ms(1_800_000)).is_admitted());
    }

    #[test]
    fn rejection_reports_time_until_reset() {
        let limiter = FixedWindowLimiter::new(60, 1);

        assert!(limiter.check_and_account("r", at_ms(0)).is_admitted());

        match limiter.check_and_account("r", at_ms(59_900)) {
            // 100 ms left rounds up to the 1-second floor.
            Decision::Rejected { retry_after_secs } => assert_eq!(retry_after_secs, 1),
            Decision::Admitted => panic!("should be rejected"),
        }
    }

    #[test]
    fn sweep_removes_only_expired_records() {
        let limiter = FixedWindowLimiter::new(900, 50);

        limiter.check_and_account("fresh", at_ms(800_000));
        limiter.check_and_account("stale", at_ms(0));

        limiter.sweep(at_ms(900_000));

        assert_eq!(limiter.tracked_clients(), 1);
        assert!(limiter.windows.contains_key("fresh"));
        assert!(!limiter.windows.contains_key("stale"));
    }

    #[test]
    fn sweep_does_not_change_outcomes() {
        let limiter = FixedWindowLimiter::new(900, 2);

        limiter.check_and_account("a", at_ms(0));
        limiter.check_and_account("a", at_ms(0));
        limiter.sweep(at_ms(900_000));

        // The swept client starts a fresh window, same as lazy expiry.
        assert!(limiter.check_and_account("a", at_ms(900_000)).is_admitted());
    }

    #[test]
    fn concurrent_calls_admit_exactly_one_at_the_edge() {
        use std::sync::Arc;
        use std::thread;

        let limiter = Arc::new(FixedWindowLimiter::new(900, 50));
        let key = "1.2.3.4";

        for _ in 0..49 {
            limiter.check_and_account(key, at_ms(0));
        }

        // count == 49: of N simultaneous calls exactly one may take slot 50.
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || limiter.check_and_account(key, at_ms(1_000)).is_admitted())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&a| a)
            .count();

        assert_eq!(admitted, 1);
    }

    #[test]
    fn concurrent_hammering_never_exceeds_the_ceiling() {
        use std::sync::Arc;
        use std::thread;

        let limiter = Arc::new(FixedWindowLimiter::new(900, 100));
        let key = "hammer";

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || {
                    (0..200)
                        .filter(|_| limiter.check_and_account(key, at_ms(0)).is_admitted())
                        .count()
                })
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        assert_eq!(total, 100);
    }
}
