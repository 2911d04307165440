//! Record arena
//!
//! Records are addressed by `RecordId` and never removed: frozen records
//! stay reachable through older deltas and root entries.

use crate::record::{Holder, Record, RecordId, Slot};
use crate::value::Value;
use crate::Version;

/// Append-only storage for every record ever created.
#[derive(Debug, Clone)]
pub struct RecordArena<T> {
    records: Vec<Record<T>>,
}

impl<T: Clone> RecordArena<T> {
    /// Empty arena
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Number of records, frozen ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Borrow a record.
    ///
    /// Handles are only minted by this arena, so they are always in range.
    #[inline]
    pub fn get(&self, id: RecordId) -> &Record<T> {
        &self.records[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: RecordId) -> &mut Record<T> {
        &mut self.records[id.index()]
    }

    /// All records in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record<T>)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (RecordId::new(index), record))
    }

    /// Follow successor links to the record currently standing in for `id`.
    pub fn live(&self, mut id: RecordId) -> RecordId {
        while let Some(next) = self.get(id).successor() {
            id = next;
        }
        id
    }

    /// Store a record and register it as holder of every child it references.
    ///
    /// When `replaces` is given, the children's backlinks to that record are
    /// moved over to the new one.
    pub(crate) fn alloc(&mut self, base: Vec<Slot<T>>, replaces: Option<RecordId>) -> RecordId {
        let id = RecordId::new(self.records.len());
        let children: Vec<(usize, RecordId)> = base
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.record().map(|child| (index, child)))
            .collect();

        self.records.push(Record::new(base));

        for (index, child) in children {
            if self.get(child).is_frozen() {
                continue;
            }
            let links = self.get_mut(child).backlinks_mut();
            if let Some(old) = replaces {
                links.remove(Holder::Record(old), index);
            }
            links.insert(Holder::Record(id), index);
        }
        id
    }

    /// Turn a nested value into records, leaves first.
    ///
    /// Recurses once per nesting level, so the depth a document can have is
    /// bounded by the thread's stack.
    pub(crate) fn wrap(&mut self, value: Value<T>) -> Slot<T> {
        match value {
            Value::Scalar(scalar) => Slot::Scalar(scalar),
            Value::List(items) => {
                let base = items.into_iter().map(|item| self.wrap(item)).collect();
                Slot::Ref(self.alloc(base, None))
            }
        }
    }

    /// Rebuild the plain value a slot denotes at `version`.
    ///
    /// Recursive like `wrap`; same nesting-depth limit.
    pub fn unwrap(&self, slot: &Slot<T>, version: Version) -> Value<T> {
        match slot {
            Slot::Scalar(scalar) => Value::Scalar(scalar.clone()),
            Slot::Ref(id) => Value::List(
                self.get(*id)
                    .values_at(version)
                    .iter()
                    .map(|child| self.unwrap(child, version))
                    .collect(),
            ),
        }
    }
}

impl<T: Clone> Default for RecordArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
