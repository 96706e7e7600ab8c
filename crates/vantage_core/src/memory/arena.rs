//! # Keyed Record Arena
//!
//! A dense vector of records plus a key → slot index.

use std::collections::HashMap;
use std::hash::Hash;

/// A record that knows its own merge key.
///
/// The key must not change for the lifetime of the record; the arena caches
/// it in its index.
pub trait Keyed {
    /// The merge key type.
    type Key: Copy + Eq + Hash;

    /// Returns the merge key of this record.
    fn key(&self) -> Self::Key;
}

/// Outcome of [`RecordArena::upsert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    /// An existing record was updated in place.
    Updated,
    /// A new record was appended.
    Created,
}

/// A dense arena of records indexed by key.
///
/// Iteration order is the vector order, which callers control with
/// [`RecordArena::sort_by`]. Lookups by key are O(1).
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. It lives inside a `SnapshotLock`.
///
/// # Example
///
/// ```rust,ignore
/// let mut arena: RecordArena<Actor> = RecordArena::new();
///
/// arena.upsert(token, |actor| actor.refresh(entity), || Actor::new(entity));
/// arena.retain(|actor| actor.fade_until.map_or(true, |t| t >= now));
/// ```
pub struct RecordArena<T: Keyed> {
    /// Records in iteration order.
    records: Vec<T>,
    /// Key → position in `records`.
    index: HashMap<T::Key, usize>,
}

impl<T: Keyed> RecordArena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates an empty arena with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the arena holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records in iteration order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    /// Iterates mutably over the records in order.
    ///
    /// Callers must not change a record's key through this iterator.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.records.iter_mut()
    }

    /// Returns true if a record with `key` exists.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: T::Key) -> bool {
        self.index.contains_key(&key)
    }

    /// Looks up a record by key.
    #[must_use]
    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.index.get(&key).map(|&slot| &self.records[slot])
    }

    /// Looks up a record by key for mutation.
    pub fn get_mut(&mut self, key: T::Key) -> Option<&mut T> {
        match self.index.get(&key) {
            Some(&slot) => Some(&mut self.records[slot]),
            None => None,
        }
    }

    /// Updates the record for `key` in place, or appends the one `create` builds.
    ///
    /// `create` must produce a record whose key equals `key`.
    pub fn upsert(
        &mut self,
        key: T::Key,
        update: impl FnOnce(&mut T),
        create: impl FnOnce() -> T,
    ) -> Upsert {
        if let Some(record) = self.get_mut(key) {
            update(record);
            return Upsert::Updated;
        }

        let record = create();
        debug_assert!(record.key() == key, "created record carries a different key");
        self.index.insert(key, self.records.len());
        self.records.push(record);
        Upsert::Created
    }

    /// Appends a record, replacing any record with the same key.
    ///
    /// Returns the replaced record.
    pub fn insert(&mut self, record: T) -> Option<T> {
        let key = record.key();
        if let Some(&slot) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.records[slot], record));
        }
        self.index.insert(key, self.records.len());
        self.records.push(record);
        None
    }

    /// Keeps only the records for which `keep` returns true.
    ///
    /// `keep` may mutate the record (e.g. to stamp a fade timer) before
    /// deciding. Returns the number of evicted records.
    pub fn retain(&mut self, keep: impl FnMut(&mut T) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain_mut(keep);
        let evicted = before - self.records.len();
        if evicted > 0 {
            self.reindex();
        }
        evicted
    }

    /// Sorts the records with a stable sort and rebuilds the index.
    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) {
        self.records.sort_by(compare);
        self.reindex();
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    /// Rebuilds the key index from the record vector.
    fn reindex(&mut self) {
        self.index.clear();
        for (slot, record) in self.records.iter().enumerate() {
            self.index.insert(record.key(), slot);
        }
    }
}

impl<T: Keyed> Default for RecordArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a RecordArena<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Keyed + std::fmt::Debug> std::fmt::Debug for RecordArena<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.records.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Tracked {
        id: i32,
        value: f32,
    }

    impl Keyed for Tracked {
        type Key = i32;

        fn key(&self) -> i32 {
            self.id
        }
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let mut arena = RecordArena::new();

        let first = arena.upsert(42, |_| unreachable!(), || Tracked { id: 42, value: 1.0 });
        let second = arena.upsert(42, |t| t.value = 2.0, || unreachable!());

        assert_eq!(first, Upsert::Created);
        assert_eq!(second, Upsert::Updated);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(42).unwrap().value, 2.0);
    }

    #[test]
    fn test_sort_keeps_index_consistent() {
        let mut arena = RecordArena::new();
        for (id, value) in [(1, 30.0), (2, 10.0), (3, 20.0)] {
            arena.insert(Tracked { id, value });
        }

        arena.sort_by(|a, b| a.value.total_cmp(&b.value));

        let order: Vec<i32> = arena.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(arena.get(1).unwrap().value, 30.0);
        assert_eq!(arena.get(2).unwrap().value, 10.0);
    }

    #[test]
    fn test_retain_evicts_and_reindexes() {
        let mut arena = RecordArena::new();
        for id in 0..5 {
            arena.insert(Tracked { id, value: id as f32 });
        }

        let evicted = arena.retain(|t| t.id % 2 == 0);

        assert_eq!(evicted, 2);
        assert_eq!(arena.len(), 3);
        assert!(arena.get(1).is_none());
        assert_eq!(arena.get(4).unwrap().value, 4.0);
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let mut arena = RecordArena::new();
        assert!(arena.insert(Tracked { id: 7, value: 1.0 }).is_none());

        let old = arena.insert(Tracked { id: 7, value: 9.0 });

        assert_eq!(old.unwrap().value, 1.0);
        assert_eq!(arena.len(), 1);
    }
}
