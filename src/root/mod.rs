//! Root sentinel
//!
//! The fixed entry point. Instead of a capped delta log it keeps an
//! unbounded version → top-slot map, which is what stops rebalance
//! cascades from climbing any further.

use std::collections::BTreeMap;

use crate::record::Slot;
use crate::{PersistenceError, Version};

/// Version history of the document's top slot.
#[derive(Debug, Clone)]
pub struct Root<T> {
    /// Top slot at version 0
    initial: Slot<T>,

    /// Entries for versions after 0
    history: BTreeMap<Version, Slot<T>>,
}

impl<T: Clone> Root<T> {
    /// Create a root whose version-0 document is `top`.
    pub fn new(top: Slot<T>) -> Self {
        Self {
            initial: top,
            history: BTreeMap::new(),
        }
    }

    /// Top slot in effect at `version`: the newest entry at or before it.
    pub fn top_at(&self, version: Version) -> &Slot<T> {
        self.history
            .range(..=version)
            .next_back()
            .map_or(&self.initial, |(_, slot)| slot)
    }

    /// Record a new top slot.
    ///
    /// The root has one logical slot, so `index` must be 0. Entries for an
    /// already recorded version are overwritten.
    pub fn add_delta(
        &mut self,
        version: Version,
        index: usize,
        value: Slot<T>,
    ) -> Result<(), PersistenceError> {
        if index != 0 {
            return Err(PersistenceError::InvalidRootUpdate { index });
        }
        if version == 0 {
            self.initial = value;
        } else {
            self.history.insert(version, value);
        }
        Ok(())
    }

    /// Number of recorded versions, version 0 included.
    pub fn len(&self) -> usize {
        1 + self.history.len()
    }

    /// All entries in version order, starting with version 0.
    pub fn history(&self) -> impl Iterator<Item = (Version, &Slot<T>)> {
        std::iter::once((0, &self.initial))
            .chain(self.history.iter().map(|(version, slot)| (*version, slot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    #[test]
    fn test_top_at_picks_latest_entry() {
        let mut root = Root::new(Slot::<i64>::Ref(RecordId::new(0)));
        root.add_delta(3, 0, Slot::Ref(RecordId::new(4))).unwrap();
        root.add_delta(7, 0, Slot::Ref(RecordId::new(9))).unwrap();

        assert_eq!(root.top_at(0), &Slot::Ref(RecordId::new(0)));
        assert_eq!(root.top_at(2), &Slot::Ref(RecordId::new(0)));
        assert_eq!(root.top_at(3), &Slot::Ref(RecordId::new(4)));
        assert_eq!(root.top_at(100), &Slot::Ref(RecordId::new(9)));
        assert_eq!(root.len(), 3);

        let versions: Vec<Version> = root.history().map(|(version, _)| version).collect();
        assert_eq!(versions, vec![0, 3, 7]);
    }

    #[test]
    fn test_rejects_nonzero_index() {
        let mut root = Root::new(Slot::Scalar(1));
        assert_eq!(
            root.add_delta(1, 1, Slot::Scalar(2)),
            Err(PersistenceError::InvalidRootUpdate { index: 1 })
        );
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn test_same_version_overwrites() {
        let mut root = Root::new(Slot::Scalar(1));
        root.add_delta(1, 0, Slot::Scalar(2)).unwrap();
        root.add_delta(1, 0, Slot::Scalar(3)).unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root.top_at(1), &Slot::Scalar(3));
    }
}
