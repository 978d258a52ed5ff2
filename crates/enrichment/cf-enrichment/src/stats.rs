//! Per-instance enrichment statistics.

use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one stage instance.
///
/// Updated by the thread driving the stage and readable from any other
/// thread through the shared handle returned by
/// [`AddContextualData::stats`](crate::AddContextualData::stats).
#[derive(Debug, Default)]
pub struct EnrichmentStats {
    /// Messages passed to `process`
    processed: AtomicU64,

    /// Messages that received at least one field
    enriched: AtomicU64,

    /// Messages that fell back to the default selector
    default_hits: AtomicU64,

    /// Messages with no matching records
    unmatched: AtomicU64,

    /// Total fields written into messages
    fields_injected: AtomicU64,
}

impl EnrichmentStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_default_hit(&self) {
        self.default_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_outcome(&self, fields: u64) {
        if fields == 0 {
            self.unmatched.fetch_add(1, Ordering::Relaxed);
        } else {
            self.enriched.fetch_add(1, Ordering::Relaxed);
            self.fields_injected.fetch_add(fields, Ordering::Relaxed);
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn enriched(&self) -> u64 {
        self.enriched.load(Ordering::Relaxed)
    }

    pub fn default_hits(&self) -> u64 {
        self.default_hits.load(Ordering::Relaxed)
    }

    pub fn unmatched(&self) -> u64 {
        self.unmatched.load(Ordering::Relaxed)
    }

    pub fn fields_injected(&self) -> u64 {
        self.fields_injected.load(Ordering::Relaxed)
    }

    /// Create a snapshot of the current counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            processed: self.processed(),
            enriched: self.enriched(),
            default_hits: self.default_hits(),
            unmatched: self.unmatched(),
            fields_injected: self.fields_injected(),
        }
    }
}

/// Point-in-time copy of [`EnrichmentStats`]. Snapshots from several
/// instances can be summed with `+=`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub processed: u64,
    pub enriched: u64,
    pub default_hits: u64,
    pub unmatched: u64,
    pub fields_injected: u64,
}

impl StatsSnapshot {
    /// Fraction of processed messages that were enriched.
    pub fn hit_rate(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            self.enriched as f64 / self.processed as f64
        }
    }
}

impl AddAssign for StatsSnapshot {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.enriched += other.enriched;
        self.default_hits += other.default_hits;
        self.unmatched += other.unmatched;
        self.fields_injected += other.fields_injected;
    }
}
