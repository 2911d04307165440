//! Append-only delta log
//!
//! Entries arrive with non-decreasing version stamps, so a read at `t`
//! is one linear scan that stops at the first entry newer than `t`.

use super::Slot;
use crate::Version;

/// One recorded change: slot `index` holds `value` from `version` on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Delta<T> {
    /// Version stamp.
    pub version: Version,
    /// Slot index in the owning record.
    pub index: usize,
    /// New slot contents.
    pub value: Slot<T>,
}

impl<T> Delta<T> {
    /// Create a delta.
    pub fn new(version: Version, index: usize, value: Slot<T>) -> Self {
        Self {
            version,
            index,
            value,
        }
    }
}

/// Ordered-by-arrival change log of a single record.
#[derive(Debug, Clone)]
pub struct DeltaLog<T> {
    entries: Vec<Delta<T>>,
}

impl<T: Clone> DeltaLog<T> {
    /// Empty log
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Delta<T>> {
        self.entries.iter()
    }

    /// Stamp of the newest entry.
    pub fn last_version(&self) -> Option<Version> {
        self.entries.last().map(|delta| delta.version)
    }

    /// Record a change.
    ///
    /// A second write to the same slot at the same version replaces the
    /// earlier entry instead of adding one. Returns `true` if the log grew.
    pub fn record(&mut self, delta: Delta<T>) -> bool {
        debug_assert!(
            self.last_version().map_or(true, |last| last <= delta.version),
            "delta versions must be non-decreasing"
        );

        // Same-version entries can only sit at the tail.
        let existing = self
            .entries
            .iter_mut()
            .rev()
            .take_while(|entry| entry.version == delta.version)
            .find(|entry| entry.index == delta.index);

        match existing {
            Some(entry) => {
                entry.value = delta.value;
                false
            }
            None => {
                self.entries.push(delta);
                true
            }
        }
    }

    /// Overlay every entry stamped `<= version` onto `values`.
    pub fn apply_to(&self, values: &mut [Slot<T>], version: Version) {
        for delta in self.visible(version) {
            if let Some(slot) = values.get_mut(delta.index) {
                *slot = delta.value.clone();
            }
        }
    }

    /// Newest value written to `index` at or before `version`.
    pub fn latest_for(&self, index: usize, version: Version) -> Option<&Slot<T>> {
        self.visible(version)
            .filter(|delta| delta.index == index)
            .last()
            .map(|delta| &delta.value)
    }

    fn visible(&self, version: Version) -> impl Iterator<Item = &Delta<T>> {
        self.entries
            .iter()
            .take_while(move |delta| delta.version <= version)
    }
}

impl<T: Clone> Default for DeltaLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_version_same_slot_overwrites() {
        let mut log = DeltaLog::new();
        assert!(log.record(Delta::new(1, 0, Slot::Scalar(1))));
        assert!(log.record(Delta::new(2, 0, Slot::Scalar(2))));
        assert!(!log.record(Delta::new(2, 0, Slot::Scalar(3))));

        assert_eq!(log.len(), 2);
        assert_eq!(log.latest_for(0, 2), Some(&Slot::Scalar(3)));
        assert_eq!(log.latest_for(0, 1), Some(&Slot::Scalar(1)));
    }

    #[test]
    fn test_same_version_other_slot_appends() {
        let mut log = DeltaLog::new();
        assert!(log.record(Delta::new(4, 0, Slot::Scalar(1))));
        assert!(log.record(Delta::new(4, 1, Slot::Scalar(2))));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_scan_stops_at_newer_entries() {
        let mut log = DeltaLog::new();
        log.record(Delta::new(3, 1, Slot::Scalar(7)));
        log.record(Delta::new(5, 0, Slot::Scalar(9)));

        let mut values = vec![Slot::Scalar(0), Slot::Scalar(0)];
        log.apply_to(&mut values, 4);
        assert_eq!(values, vec![Slot::Scalar(0), Slot::Scalar(7)]);
        assert_eq!(log.latest_for(0, 4), None);
        assert_eq!(log.last_version(), Some(5));
    }
}
