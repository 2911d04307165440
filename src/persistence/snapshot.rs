//! Read-only views pinned to a version

use std::fmt;

use crate::record::Slot;
use crate::store::RecordStore;
use crate::value::Value;
use crate::{PersistenceError, Version};

use super::path;

/// The document as of one version.
///
/// Borrows the structure shared, so no update can run while a snapshot
/// is alive; reads through it never observe a partial write.
pub struct Snapshot<'a, T> {
    store: &'a RecordStore<T>,
    version: Version,
}

impl<'a, T: Clone> Snapshot<'a, T> {
    pub(crate) fn new(store: &'a RecordStore<T>, version: Version) -> Self {
        Self { store, version }
    }

    /// Version this view is pinned to.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Entire document.
    pub fn unwrap(&self) -> Value<T> {
        self.store.unwrap(self.version)
    }

    /// Scalar or subtree found at `path`.
    pub fn get(&self, path: &[usize]) -> Result<Value<T>, PersistenceError> {
        let slot = path::read_slot(self.store, path, self.version)?;
        Ok(self.store.arena().unwrap(&slot, self.version))
    }

    /// Slot count of the list at `path`, or `None` if a scalar sits there.
    pub fn len(&self, path: &[usize]) -> Result<Option<usize>, PersistenceError> {
        Ok(match path::read_slot(self.store, path, self.version)? {
            Slot::Scalar(_) => None,
            Slot::Ref(id) => Some(self.store.arena().get(id).len()),
        })
    }
}

impl<'a, T: Clone + fmt::Display> Snapshot<'a, T> {
    /// Hash of the document's canonical rendering.
    pub fn fingerprint(&self) -> blake3::Hash {
        blake3::hash(self.unwrap().to_string().as_bytes())
    }
}

impl<'a, T> fmt::Debug for Snapshot<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
