//! Slow-call classification.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Threshold used when none is configured.
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(500);

/// How a finished round trip is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Normal,
    Slow,
}

/// Shared, runtime-adjustable slow-call threshold.
///
/// Loads and stores are `Relaxed`: a call reads the value once on entry, and
/// an update is only guaranteed to reach calls that start after it.
#[derive(Debug)]
pub struct SlowThreshold {
    nanos: AtomicU64,
}

impl SlowThreshold {
    pub fn new(threshold: Duration) -> Self {
        Self {
            nanos: AtomicU64::new(saturating_nanos(threshold)),
        }
    }

    pub fn load(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }

    pub fn set(&self, threshold: Duration) {
        self.nanos.store(saturating_nanos(threshold), Ordering::Relaxed);
    }

    /// Classify against the current threshold.
    pub fn classify(&self, elapsed: Duration) -> CallKind {
        classify(elapsed, self.load())
    }
}

impl Default for SlowThreshold {
    fn default() -> Self {
        Self::new(DEFAULT_SLOW_THRESHOLD)
    }
}

/// Strictly longer than `threshold` is slow.
pub fn classify(elapsed: Duration, threshold: Duration) -> CallKind {
    if elapsed > threshold {
        CallKind::Slow
    } else {
        CallKind::Normal
    }
}

/// Emit the per-call trace record.
pub(crate) fn log_call(sql: &str, elapsed: Duration, threshold: Duration) -> CallKind {
    let kind = classify(elapsed, threshold);
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    match kind {
        CallKind::Slow => tracing::warn!(elapsed_ms, sql, "[SQL] taos query: slowcall"),
        CallKind::Normal => tracing::info!(elapsed_ms, sql, "sql taos query"),
    }
    kind
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
