//! Partially persistent document facade
//!
//! Every `set` produces a new version; every earlier version stays
//! readable through `unwrap(version)` or a pinned `Snapshot`.
//!
//! Update protocol (one atomic unit under `&mut self`):
//! 1. resolve the target record by walking `path` at `now`
//! 2. append the delta at `now + 1`, cascading rebalances upward
//! 3. for a top-level write, record the (possibly replaced) top record
//!    in the root history
//! 4. advance `now`

mod path;
mod snapshot;

pub use snapshot::Snapshot;

use tracing::debug;

use crate::inspect::StructureDump;
use crate::record::Slot;
use crate::stats::StoreStats;
use crate::store::RecordStore;
use crate::value::Value;
use crate::{PersistenceConfig, PersistenceError, Version};

/// A nested document with queryable history.
#[derive(Debug)]
pub struct PartialPersistence<T> {
    store: RecordStore<T>,
    config: PersistenceConfig,

    /// Current version, advanced once per `set`
    now: Version,
}

impl<T: Clone> PartialPersistence<T> {
    /// Wrap `document` as version 0 using the default configuration.
    pub fn wrap(document: Value<T>) -> Self {
        Self::wrap_with_config(document, PersistenceConfig::default())
    }

    /// Wrap `document` as version 0.
    pub fn wrap_with_config(document: Value<T>, config: PersistenceConfig) -> Self {
        let store = RecordStore::new(document, config.max_deltas);
        debug!(
            records = store.arena().len(),
            max_deltas = config.max_deltas,
            "document wrapped"
        );

        Self {
            store,
            config,
            now: 0,
        }
    }

    /// Current version.
    #[inline]
    pub fn now(&self) -> Version {
        self.now
    }

    /// Configuration in effect.
    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// Overwrite slot `index` of the list at `path` with `value`.
    ///
    /// Advances `now` by exactly one, even when `value` equals what was
    /// there. On error nothing changes, `now` included.
    pub fn set(
        &mut self,
        path: &[usize],
        index: usize,
        value: Value<T>,
    ) -> Result<(), PersistenceError> {
        let target = path::resolve_target(&self.store, path, index, self.now)?;

        let version = self.now + 1;
        let live = self.store.update(target, version, index, value)?;
        if path.is_empty() {
            self.store.add_root_delta(version, 0, Slot::Ref(live))?;
        }
        self.now = version;
        Ok(())
    }

    /// The document as it was at `version`.
    pub fn unwrap(&self, version: Version) -> Result<Value<T>, PersistenceError> {
        Ok(self.snapshot(version)?.unwrap())
    }

    /// The document as of `now`.
    pub fn unwrap_current(&self) -> Value<T> {
        self.store.unwrap(self.now)
    }

    /// Read-only view pinned at `version`.
    ///
    /// Versions after `now` have not happened yet and are rejected.
    pub fn snapshot(&self, version: Version) -> Result<Snapshot<'_, T>, PersistenceError> {
        if version > self.now {
            return Err(PersistenceError::TimeRange {
                requested: version,
                now: self.now,
            });
        }
        Ok(Snapshot::new(&self.store, version))
    }

    /// Cost counters since wrapping.
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Copy out the internal linkage for debugging or visualization.
    pub fn inspect(&self) -> StructureDump<T> {
        StructureDump::capture(&self.store, self.now)
    }
}
