//! Record store: arena, root and the rebalance cascade
//!
//! An update appends one delta to one record. If that fills the record's
//! log, the record is replaced by a fresh copy of its current values and
//! every holder gets a forwarding delta pointing at the copy, which may
//! fill *their* logs in turn. The cascade runs off an explicit queue and
//! ends at the root, whose history is never capped.
//!
//! Backlinks stay exact for live records:
//! - writing a reference into (H, i) registers (H, i) on the new child and
//!   drops it from the child it displaced
//! - a rebalance moves every child's (old, i) entry to (successor, i)
//!
//! Frozen records keep whatever backlinks they had; nothing consults them.

mod arena;

pub use arena::RecordArena;

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::record::{Delta, Holder, RecordId, Slot};
use crate::root::Root;
use crate::stats::{StatsTracker, StoreStats};
use crate::value::Value;
use crate::{PersistenceError, Version};

/// Owner of every record plus the root.
#[derive(Debug)]
pub struct RecordStore<T> {
    arena: RecordArena<T>,
    root: Root<T>,
    max_deltas: usize,
    tracker: StatsTracker,
}

impl<T: Clone> RecordStore<T> {
    /// Wrap `document` as the version-0 state.
    pub fn new(document: Value<T>, max_deltas: usize) -> Self {
        let mut arena = RecordArena::new();
        let top = arena.wrap(document);
        if let Some(id) = top.record() {
            arena.get_mut(id).backlinks_mut().insert(Holder::Root, 0);
        }

        Self {
            arena,
            root: Root::new(top),
            max_deltas,
            tracker: StatsTracker::new(),
        }
    }

    /// Read access to the records.
    pub fn arena(&self) -> &RecordArena<T> {
        &self.arena
    }

    /// Read access to the root history.
    pub fn root(&self) -> &Root<T> {
        &self.root
    }

    /// Log length that triggers a rebalance.
    pub fn max_deltas(&self) -> usize {
        self.max_deltas
    }

    /// Accumulated cost counters.
    pub fn stats(&self) -> StoreStats {
        self.tracker.stats(self.arena.len())
    }

    /// Top slot of the document at `version`.
    pub fn top_at(&self, version: Version) -> &Slot<T> {
        self.root.top_at(version)
    }

    /// Whole document at `version`.
    pub fn unwrap(&self, version: Version) -> Value<T> {
        self.arena.unwrap(self.top_at(version), version)
    }

    /// Write `value` into slot `index` of `target` at `version`.
    ///
    /// `target` must be live and `index` in range; the facade checks both.
    /// Returns the record standing in for `target` afterwards, which
    /// differs from `target` when the write made it rebalance.
    pub fn update(
        &mut self,
        target: RecordId,
        version: Version,
        index: usize,
        value: Value<T>,
    ) -> Result<RecordId, PersistenceError> {
        let value = self.arena.wrap(value);
        self.tracker.begin_update();

        let mut pending = VecDeque::new();
        pending.push_back((Holder::Record(target), index, value));

        while let Some((holder, index, value)) = pending.pop_front() {
            match holder {
                Holder::Root => self.write_root(version, index, value)?,
                Holder::Record(id) => {
                    // A holder can rebalance while a forward to it is queued.
                    let id = self.arena.live(id);
                    if let Some(successor) = self.write_record(id, version, index, value) {
                        for link in self.arena.get(id).backlinks().iter() {
                            pending.push_back((link.holder, link.index, Slot::Ref(successor)));
                        }
                    }
                }
            }
        }

        let cascade = self.tracker.end_update();
        let live = self.arena.live(target);
        debug!(version, target = %target, live = %live, cascade, "update applied");
        Ok(live)
    }

    /// Point the root at `value` from `version` on.
    pub fn add_root_delta(
        &mut self,
        version: Version,
        index: usize,
        value: Slot<T>,
    ) -> Result<(), PersistenceError> {
        self.write_root(version, index, value)
    }

    fn write_root(
        &mut self,
        version: Version,
        index: usize,
        value: Slot<T>,
    ) -> Result<(), PersistenceError> {
        let previous = self.root.top_at(version).record();
        self.root.add_delta(version, index, value.clone())?;
        self.relink(Holder::Root, index, previous, &value);
        trace!(version, top = ?value.record(), "root entry recorded");
        Ok(())
    }

    /// Append to a live record; returns its successor if the log filled.
    fn write_record(
        &mut self,
        id: RecordId,
        version: Version,
        index: usize,
        value: Slot<T>,
    ) -> Option<RecordId> {
        let previous = self
            .arena
            .get(id)
            .slot_at(version, index)
            .and_then(|slot| slot.record());
        self.relink(Holder::Record(id), index, previous, &value);

        let grew = self
            .arena
            .get_mut(id)
            .push_delta(Delta::new(version, index, value));
        self.tracker.record_delta(grew);

        let logged = self.arena.get(id).deltas().len();
        trace!(record = %id, version, index, logged, "delta recorded");

        if logged < self.max_deltas {
            return None;
        }
        Some(self.rebalance(id, version))
    }

    fn rebalance(&mut self, id: RecordId, version: Version) -> RecordId {
        let base = self.arena.get(id).values_at(version);
        let successor = self.arena.alloc(base, Some(id));
        self.arena.get_mut(id).freeze(successor);
        self.tracker.record_rebalance();

        debug!(
            record = %id,
            successor = %successor,
            version,
            holders = self.arena.get(id).backlinks().len(),
            "delta log full, record rebalanced"
        );
        successor
    }

    /// Move the (holder, index) backlink from the displaced child to the new one.
    fn relink(
        &mut self,
        holder: Holder,
        index: usize,
        previous: Option<RecordId>,
        value: &Slot<T>,
    ) {
        let next = value.record();
        if previous == next {
            return;
        }
        if let Some(old) = previous {
            if !self.arena.get(old).is_frozen() {
                self.arena.get_mut(old).backlinks_mut().remove(holder, index);
            }
        }
        if let Some(new) = next {
            self.arena.get_mut(new).backlinks_mut().insert(holder, index);
        }
    }
}
