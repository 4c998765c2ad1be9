use std::sync::{
    atomic::{AtomicI64, AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Sentinel for "never happened" in the timestamp slots.
const NEVER: i64 = i64::MIN;

/// Retrieval counters shared between the poller and the HTTP handlers
/// (thread-safe, lock-free).
#[derive(Clone)]
pub struct PollStats {
    inner: Arc<Counters>,
}

struct Counters {
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    /// unix millis of the last committed snapshot
    last_success: AtomicI64,
    /// unix millis of the last logged failure
    last_failure: AtomicI64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatsReport {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
}

impl Default for PollStats {
    fn default() -> Self {
        Self {
            inner: Arc::new(Counters {
                attempts: AtomicU64::new(0),
                successes: AtomicU64::new(0),
                failures: AtomicU64::new(0),
                last_success: AtomicI64::new(NEVER),
                last_failure: AtomicI64::new(NEVER),
            }),
        }
    }
}

impl PollStats {
    /* ───────────── public API ───────────── */

    pub fn record_attempt(&self) {
        self.inner.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, at: DateTime<Utc>) {
        self.inner.successes.fetch_add(1, Ordering::Relaxed);
        self.inner
            .last_success
            .store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn record_failure(&self, at: DateTime<Utc>) {
        self.inner.failures.fetch_add(1, Ordering::Relaxed);
        self.inner
            .last_failure
            .store(at.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::Relaxed)
    }

    pub fn successes(&self) -> u64 {
        self.inner.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.inner.failures.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> StatsReport {
        StatsReport {
            attempts: self.attempts(),
            successes: self.successes(),
            failures: self.failures(),
            last_success: Self::timestamp(&self.inner.last_success),
            last_failure: Self::timestamp(&self.inner.last_failure),
        }
    }

    /* ──────────── internals ──────────── */

    fn timestamp(slot: &AtomicI64) -> Option<DateTime<Utc>> {
        match slot.load(Ordering::Relaxed) {
            NEVER => None,
            ms => DateTime::from_timestamp_millis(ms),
        }
    }
}
