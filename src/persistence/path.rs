//! Path resolution
//!
//! A path is the sequence of slot indices to descend through, starting at
//! the document's top slot as of some version. Every step reads the slot
//! snapshot-at-version, so the same walk serves historical reads and the
//! current-version walk that precedes an update.

use crate::record::{RecordId, Slot};
use crate::store::RecordStore;
use crate::{PersistenceError, Version};

/// Slot reached by following `path` at `version`.
pub(crate) fn read_slot<T: Clone>(
    store: &RecordStore<T>,
    path: &[usize],
    version: Version,
) -> Result<Slot<T>, PersistenceError> {
    let mut slot = store.top_at(version).clone();

    for (depth, &index) in path.iter().enumerate() {
        let id = match slot {
            Slot::Ref(id) => id,
            Slot::Scalar(_) => return Err(PersistenceError::not_a_container(depth, index)),
        };
        let record = store.arena().get(id);
        slot = record
            .slot_at(version, index)
            .cloned()
            .ok_or_else(|| PersistenceError::out_of_range(depth, index, record.len()))?;
    }

    Ok(slot)
}

/// Record at the end of `path` that owns slot `index`, checked in range.
pub(crate) fn resolve_target<T: Clone>(
    store: &RecordStore<T>,
    path: &[usize],
    index: usize,
    version: Version,
) -> Result<RecordId, PersistenceError> {
    let depth = path.len();
    let id = match read_slot(store, path, version)? {
        Slot::Ref(id) => id,
        Slot::Scalar(_) => return Err(PersistenceError::not_a_container(depth, index)),
    };

    let len = store.arena().get(id).len();
    if index >= len {
        return Err(PersistenceError::out_of_range(depth, index, len));
    }
    Ok(id)
}
