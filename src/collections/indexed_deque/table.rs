//! Backing key tables for `IndexedDeque`.
//!
//! The deque never walks its storage: every operation computes a physical key and
//! performs one table operation on it. Two tables sit behind the same seam:
//!
//! - `SparseTable`: a hash map for unbounded deques, whose keys drift without limit
//!   in either direction, and for bounded deques too large to preallocate.
//! - `SlotTable`: a fixed slot array for bounded deques of at most
//!   [`MAX_DENSE_SLOTS`], whose keys always lie in `0..capacity` and therefore
//!   address a slot directly with no hashing.

use super::Capacity;
use std::collections::HashMap;

/// Largest bounded capacity backed by a preallocated `SlotTable`.
pub const MAX_DENSE_SLOTS: usize = 1 << 16;

/// Physical key under which an item is stored.
pub type Key = i64;

/// Minimal key-value surface the deque arithmetic relies on.
pub trait KeyTable<T> {
    /// Returns the item stored under `key`.
    fn get(&self, key: Key) -> Option<&T>;

    /// Returns the item stored under `key` mutably.
    fn get_mut(&mut self, key: Key) -> Option<&mut T>;

    /// Stores `item` under `key`, returning the item it displaced.
    fn insert(&mut self, key: Key, item: T) -> Option<T>;

    /// Deletes the entry under `key`.
    fn remove(&mut self, key: Key) -> Option<T>;

    /// Number of occupied keys.
    fn len(&self) -> usize;

    /// Returns `true` if no key is occupied.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletes every entry.
    fn clear(&mut self);
}

/// Hash-map backed table for unbounded deques.
#[derive(Clone)]
pub struct SparseTable<T> {
    entries: HashMap<Key, T>,
}

impl<T> SparseTable<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Default for SparseTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyTable<T> for SparseTable<T> {
    #[inline]
    fn get(&self, key: Key) -> Option<&T> {
        self.entries.get(&key)
    }

    #[inline]
    fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        self.entries.get_mut(&key)
    }

    #[inline]
    fn insert(&mut self, key: Key, item: T) -> Option<T> {
        self.entries.insert(key, item)
    }

    #[inline]
    fn remove(&mut self, key: Key) -> Option<T> {
        self.entries.remove(&key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Fixed slot array for bounded deques.
///
/// Keys must lie in `0..slots.len()`; the deque's modular arithmetic guarantees it.
#[derive(Clone)]
pub struct SlotTable<T> {
    slots: Box<[Option<T>]>,
    occupied: usize,
}

impl<T> SlotTable<T> {
    /// Creates a table with `capacity` empty slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = std::iter::repeat_with(|| None).take(capacity).collect();
        Self { slots, occupied: 0 }
    }

    /// Number of slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn slot(key: Key) -> usize {
        debug_assert!(key >= 0, "slot keys are never negative");
        key as usize
    }
}

impl<T> KeyTable<T> for SlotTable<T> {
    #[inline]
    fn get(&self, key: Key) -> Option<&T> {
        self.slots.get(Self::slot(key))?.as_ref()
    }

    #[inline]
    fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        self.slots.get_mut(Self::slot(key))?.as_mut()
    }

    #[inline]
    fn insert(&mut self, key: Key, item: T) -> Option<T> {
        let displaced = self.slots[Self::slot(key)].replace(item);
        if displaced.is_none() {
            self.occupied += 1;
        }
        displaced
    }

    #[inline]
    fn remove(&mut self, key: Key) -> Option<T> {
        let removed = self.slots.get_mut(Self::slot(key))?.take();
        if removed.is_some() {
            self.occupied -= 1;
        }
        removed
    }

    #[inline]
    fn len(&self) -> usize {
        self.occupied
    }

    fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.occupied = 0;
    }
}

/// Storage selected by the deque's capacity mode.
#[derive(Clone)]
pub enum Table<T> {
    /// Unbounded mode, or bounded beyond `MAX_DENSE_SLOTS`.
    Sparse(SparseTable<T>),
    /// Bounded mode up to `MAX_DENSE_SLOTS`.
    Slots(SlotTable<T>),
}

impl<T> Table<T> {
    /// Picks the table for `capacity`. Allocation never scales past `MAX_DENSE_SLOTS`.
    pub fn for_capacity(capacity: Capacity) -> Self {
        match capacity {
            Capacity::Bounded(n) if n.get() <= MAX_DENSE_SLOTS => {
                Table::Slots(SlotTable::with_capacity(n.get()))
            }
            Capacity::Bounded(_) | Capacity::Unbounded => Table::Sparse(SparseTable::new()),
        }
    }
}

impl<T> KeyTable<T> for Table<T> {
    #[inline]
    fn get(&self, key: Key) -> Option<&T> {
        match self {
            Table::Sparse(t) => t.get(key),
            Table::Slots(t) => t.get(key),
        }
    }

    #[inline]
    fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        match self {
            Table::Sparse(t) => t.get_mut(key),
            Table::Slots(t) => t.get_mut(key),
        }
    }

    #[inline]
    fn insert(&mut self, key: Key, item: T) -> Option<T> {
        match self {
            Table::Sparse(t) => t.insert(key, item),
            Table::Slots(t) => t.insert(key, item),
        }
    }

    #[inline]
    fn remove(&mut self, key: Key) -> Option<T> {
        match self {
            Table::Sparse(t) => t.remove(key),
            Table::Slots(t) => t.remove(key),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        match self {
            Table::Sparse(t) => t.len(),
            Table::Slots(t) => t.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            Table::Sparse(t) => t.clear(),
            Table::Slots(t) => t.clear(),
        }
    }
}
