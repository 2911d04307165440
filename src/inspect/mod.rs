//! Structure dumps
//!
//! Copies out base values, delta logs, backlinks and the root history so
//! external tooling (diagram export, debugging) can look at the linkage
//! without touching the live structure. Nothing here feeds back into
//! updates or queries.

use std::fmt;

use crate::record::{Backlink, Delta, RecordId, Slot};
use crate::store::RecordStore;
use crate::Version;

/// One record as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct RecordDump<T> {
    /// Arena handle
    pub id: RecordId,
    /// Immutable base values.
    pub base: Vec<Slot<T>>,
    /// Delta log in arrival order.
    pub deltas: Vec<Delta<T>>,
    /// Referrers at capture time.
    pub backlinks: Vec<Backlink>,
    /// Replacement, for frozen records.
    pub successor: Option<RecordId>,
}

/// Whole-structure capture.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct StructureDump<T> {
    /// Version counter at capture time.
    pub now: Version,
    /// Rebalance threshold.
    pub max_deltas: usize,
    /// Root history, oldest first.
    pub root: Vec<(Version, Slot<T>)>,
    /// Every record, frozen ones included, in allocation order.
    pub records: Vec<RecordDump<T>>,
}

impl<T: Clone> StructureDump<T> {
    pub(crate) fn capture(store: &RecordStore<T>, now: Version) -> Self {
        let root = store
            .root()
            .history()
            .map(|(version, slot)| (version, slot.clone()))
            .collect();

        let records = store
            .arena()
            .iter()
            .map(|(id, record)| RecordDump {
                id,
                base: record.base().to_vec(),
                deltas: record.deltas().iter().cloned().collect(),
                backlinks: record.backlinks().iter().collect(),
                successor: record.successor(),
            })
            .collect();

        Self {
            now,
            max_deltas: store.max_deltas(),
            root,
            records,
        }
    }

    /// Records that have not been rebalanced away.
    pub fn live_records(&self) -> impl Iterator<Item = &RecordDump<T>> {
        self.records.iter().filter(|record| record.successor.is_none())
    }
}

fn write_slots<T: fmt::Display>(f: &mut fmt::Formatter<'_>, slots: &[Slot<T>]) -> fmt::Result {
    write!(f, "[")?;
    for (i, slot) in slots.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", slot)?;
    }
    write!(f, "]")
}

impl<T: fmt::Display> fmt::Display for StructureDump<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "now={} max_deltas={}", self.now, self.max_deltas)?;

        write!(f, "root:")?;
        for (version, slot) in &self.root {
            write!(f, " @{}={}", version, slot)?;
        }
        writeln!(f)?;

        for record in &self.records {
            write!(f, "{} base=", record.id)?;
            write_slots(f, &record.base)?;

            write!(f, " deltas=[")?;
            for (i, delta) in record.deltas.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "@{}:{}={}", delta.version, delta.index, delta.value)?;
            }
            write!(f, "]")?;

            write!(f, " backlinks=[")?;
            for (i, link) in record.backlinks.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}.{}", link.holder, link.index)?;
            }
            write!(f, "]")?;

            if let Some(successor) = record.successor {
                write!(f, " frozen->{}", successor)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
