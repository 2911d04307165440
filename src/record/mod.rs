//! Versioned records
//!
//! A record is an immutable base vector plus a bounded delta log.
//! Reading at version `t` replays the log over the base up to `t`:
//!
//!   values_at(t) = base ⊕ { d ∈ deltas | d.version ≤ t }   (arrival order)
//!
//! Records never own each other. Slots hold arena handles, and every
//! handle stored in a live record is mirrored by a backlink on the child.

mod backlink;
mod delta;

pub use backlink::{Backlink, BacklinkSet, Holder};
pub use delta::{Delta, DeltaLog};

use std::fmt;

use crate::Version;

/// Stable handle into the record arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct RecordId(usize);

impl RecordId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the arena (allocation order).
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Contents of one record slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Slot<T> {
    /// Opaque scalar.
    Scalar(T),

    /// Reference to a nested record. Never the root.
    Ref(RecordId),
}

impl<T> Slot<T> {
    /// The referenced record, if this slot holds one.
    #[inline]
    pub fn record(&self) -> Option<RecordId> {
        match self {
            Slot::Scalar(_) => None,
            Slot::Ref(id) => Some(*id),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Scalar(value) => write!(f, "{}", value),
            Slot::Ref(id) => write!(f, "->{}", id),
        }
    }
}

/// Unit of versioned storage.
#[derive(Debug, Clone)]
pub struct Record<T> {
    /// Fixed at construction
    base: Vec<Slot<T>>,

    deltas: DeltaLog<T>,

    /// Every (holder, slot) currently pointing at this record
    backlinks: BacklinkSet,

    /// Set once the log filled and a replacement took over
    successor: Option<RecordId>,
}

impl<T: Clone> Record<T> {
    /// Create a record with an empty log and no backlinks.
    pub fn new(base: Vec<Slot<T>>) -> Self {
        Self {
            base,
            deltas: DeltaLog::new(),
            backlinks: BacklinkSet::new(),
            successor: None,
        }
    }

    /// Number of slots. Never changes.
    #[inline]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// True for a record built from an empty list.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Immutable base values.
    pub fn base(&self) -> &[Slot<T>] {
        &self.base
    }

    /// Delta log, in arrival order.
    pub fn deltas(&self) -> &DeltaLog<T> {
        &self.deltas
    }

    /// Current referrers.
    pub fn backlinks(&self) -> &BacklinkSet {
        &self.backlinks
    }

    /// Replacement record, once this one has been rebalanced away.
    pub fn successor(&self) -> Option<RecordId> {
        self.successor
    }

    /// A frozen record only serves historical reads.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.successor.is_some()
    }

    /// Full slot vector as of `version`.
    ///
    /// Cost: O(len + MAX_DELTAS)
    pub fn values_at(&self, version: Version) -> Vec<Slot<T>> {
        let mut values = self.base.clone();
        self.deltas.apply_to(&mut values, version);
        values
    }

    /// Single slot as of `version`, without copying the rest.
    pub fn slot_at(&self, version: Version, index: usize) -> Option<&Slot<T>> {
        self.deltas
            .latest_for(index, version)
            .or_else(|| self.base.get(index))
    }

    /// Append to the log. Returns `true` if the log grew.
    pub(crate) fn push_delta(&mut self, delta: Delta<T>) -> bool {
        debug_assert!(!self.is_frozen(), "frozen records take no new deltas");
        self.deltas.record(delta)
    }

    pub(crate) fn backlinks_mut(&mut self) -> &mut BacklinkSet {
        &mut self.backlinks
    }

    pub(crate) fn freeze(&mut self, successor: RecordId) {
        debug_assert!(self.successor.is_none(), "record frozen twice");
        self.successor = Some(successor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalars(values: &[i64]) -> Vec<Slot<i64>> {
        values.iter().copied().map(Slot::Scalar).collect()
    }

    #[test]
    fn test_values_at_applies_deltas_up_to_version() {
        let mut record = Record::new(scalars(&[1, 2, 3]));
        record.push_delta(Delta::new(1, 0, Slot::Scalar(10)));
        record.push_delta(Delta::new(3, 2, Slot::Scalar(30)));
        record.push_delta(Delta::new(3, 0, Slot::Scalar(11)));

        assert_eq!(record.values_at(0), scalars(&[1, 2, 3]));
        assert_eq!(record.values_at(1), scalars(&[10, 2, 3]));
        assert_eq!(record.values_at(2), scalars(&[10, 2, 3]));
        assert_eq!(record.values_at(3), scalars(&[11, 2, 30]));
        assert_eq!(record.values_at(99), scalars(&[11, 2, 30]));
    }

    #[test]
    fn test_slot_at_matches_values_at() {
        let mut record = Record::new(scalars(&[5, 6]));
        record.push_delta(Delta::new(2, 1, Slot::Scalar(60)));
        record.push_delta(Delta::new(4, 1, Slot::Scalar(61)));

        for version in 0..6 {
            let values = record.values_at(version);
            for index in 0..record.len() {
                assert_eq!(record.slot_at(version, index), Some(&values[index]));
            }
        }
        assert_eq!(record.slot_at(4, 2), None);
    }

    #[test]
    fn test_base_is_untouched_by_deltas() {
        let mut record = Record::new(scalars(&[1]));
        record.push_delta(Delta::new(1, 0, Slot::Scalar(2)));
        assert_eq!(record.base(), scalars(&[1]).as_slice());
        assert_eq!(record.deltas().len(), 1);
    }

    #[test]
    fn test_freeze_records_successor() {
        let mut record: Record<i64> = Record::new(Vec::new());
        assert!(!record.is_frozen());
        record.freeze(RecordId::new(7));
        assert_eq!(record.successor(), Some(RecordId::new(7)));
        assert!(record.is_frozen());
    }
}
