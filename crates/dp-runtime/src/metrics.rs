use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dp_core::FilterOutcome;

/// Shared pipeline counters. Lock-free; updated from the filter workers.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    events_total: AtomicU64,
    matched_total: AtomicU64,
    failed_total: AtomicU64,
    decode_errors_total: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&self, outcome: &FilterOutcome) {
        self.events_total.fetch_add(1, Ordering::Relaxed);
        if outcome.is_matched() {
            self.matched_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn decode_error(&self) {
        self.decode_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RunReport {
        RunReport {
            events: self.events_total.load(Ordering::Relaxed),
            matched: self.matched_total.load(Ordering::Relaxed),
            failed: self.failed_total.load(Ordering::Relaxed),
            decode_errors: self.decode_errors_total.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`PipelineMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Events that reached the filter.
    pub events: u64,
    pub matched: u64,
    /// Events tagged with the error tags.
    pub failed: u64,
    /// Input lines skipped because they were not JSON objects.
    pub decode_errors: u64,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "events={} matched={} failed={} decode_errors={}",
            self.events, self.matched, self.failed, self.decode_errors
        )
    }
}
