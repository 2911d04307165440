//! Counter bookkeeping for the record store

use super::StoreStats;

/// Accumulates [`StoreStats`] while the store runs.
#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: StoreStats,

    /// Rebalances seen since `begin_update`
    cascade: u64,
}

impl StatsTracker {
    /// Create new tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accounting for one update.
    pub fn begin_update(&mut self) {
        self.cascade = 0;
    }

    /// Close the current update and return its cascade length.
    pub fn end_update(&mut self) -> u64 {
        self.stats.updates += 1;
        self.stats.max_cascade = self.stats.max_cascade.max(self.cascade);
        self.cascade
    }

    /// A delta was written; `grew` is false for same-slot overwrites.
    pub fn record_delta(&mut self, grew: bool) {
        if grew {
            self.stats.deltas_appended += 1;
        }
    }

    /// A record was replaced by a fresh one.
    pub fn record_rebalance(&mut self) {
        self.stats.rebalances += 1;
        self.cascade += 1;
    }

    /// Snapshot of the counters. The arena size is only known by the
    /// caller, so it is filled in here.
    pub fn stats(&self, records_allocated: usize) -> StoreStats {
        StoreStats {
            records_allocated: records_allocated as u64,
            ..self.stats
        }
    }
}
