//! Backlink directory
//!
//! Non-owning "who points at me, through which slot". Only consulted
//! when a record rebalances and its referrers must be redirected.

use std::collections::BTreeSet;
use std::fmt;

use super::RecordId;

/// Anything that can hold a reference to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Holder {
    /// The version → top-record mapping.
    Root,
    /// Another record.
    Record(RecordId),
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::Root => write!(f, "root"),
            Holder::Record(id) => write!(f, "{}", id),
        }
    }
}

/// A single (holder, slot) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Backlink {
    /// Referencing side.
    pub holder: Holder,
    /// Slot of `holder` that carries the reference.
    pub index: usize,
}

/// Set of backlinks on one record.
///
/// Ordered so that rebalance cascades visit holders deterministically.
#[derive(Debug, Clone, Default)]
pub struct BacklinkSet {
    entries: BTreeSet<Backlink>,
}

impl BacklinkSet {
    /// Empty set
    pub fn new() -> Self {
        Self {
            entries: BTreeSet::new(),
        }
    }

    /// Register a referrer. Returns `false` if it was already present.
    pub fn insert(&mut self, holder: Holder, index: usize) -> bool {
        self.entries.insert(Backlink { holder, index })
    }

    /// Drop a referrer. Returns `false` if it was not present.
    pub fn remove(&mut self, holder: Holder, index: usize) -> bool {
        self.entries.remove(&Backlink { holder, index })
    }

    /// Membership test
    pub fn contains(&self, holder: Holder, index: usize) -> bool {
        self.entries.contains(&Backlink { holder, index })
    }

    /// Number of referrers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing points here.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Referrers in (holder, index) order.
    pub fn iter(&self) -> impl Iterator<Item = Backlink> + '_ {
        self.entries.iter().copied()
    }
}
