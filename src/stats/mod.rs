//! Update cost accounting
//!
//! Tracks what updates actually cost so the amortized O(1) claim can be
//! checked instead of assumed.
//!
//! Each rebalance retires a record whose log holds exactly `MAX_DELTAS`
//! grown entries, and a record rebalances at most once, so
//!   rebalances · MAX_DELTAS ≤ deltas_appended

mod tracker;

pub use tracker::StatsTracker;

/// Counters accumulated over the lifetime of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Completed `set` calls
    pub updates: u64,

    /// Deltas that grew a log (same-slot overwrites excluded)
    pub deltas_appended: u64,

    /// Records created by wrapping or rebalancing
    pub records_allocated: u64,

    /// Records whose log filled and were replaced
    pub rebalances: u64,

    /// Most rebalances triggered by a single update
    pub max_cascade: u64,
}

impl StoreStats {
    /// Check the log-accounting bound against `max_deltas`.
    pub fn satisfies_log_bound(&self, max_deltas: usize) -> bool {
        self.rebalances.saturating_mul(max_deltas as u64) <= self.deltas_appended
    }

    /// Average rebalances per update (0 before the first update).
    pub fn amortized_rebalances(&self) -> f64 {
        if self.updates == 0 {
            return 0.0;
        }
        self.rebalances as f64 / self.updates as f64
    }

    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "updates: {}\ndeltas appended: {}\nrecords allocated: {}\nrebalances: {} ({:.3} per update)\nlongest cascade: {}",
            self.updates,
            self.deltas_appended,
            self.records_allocated,
            self.rebalances,
            self.amortized_rebalances(),
            self.max_cascade
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_bound() {
        let stats = StoreStats {
            updates: 10,
            deltas_appended: 12,
            records_allocated: 5,
            rebalances: 3,
            max_cascade: 2,
        };
        assert!(stats.satisfies_log_bound(4));
        assert!(!stats.satisfies_log_bound(5));
        assert!((stats.amortized_rebalances() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report() {
        let stats = StoreStats::default();
        assert_eq!(stats.amortized_rebalances(), 0.0);
        assert!(stats.report().contains("rebalances: 0"));
    }
}
