//! `IndexedDeque`: a double-ended queue laid over a key-value table.
//!
//! Items are never shifted or copied to make room. The deque keeps three integers
//! (`capacity`, `count`, `head_key`) and derives the physical key of every logical
//! position from them:
//!
//! - unbounded: `key(i) = head_key - i`
//! - bounded:   `key(i) = (capacity + head_key - i) mod capacity`
//!
//! Logical index `0` is the head; indices grow toward the tail, so the tail sits at
//! `key(count - 1)`. Pushing to the head advances `head_key`, pushing to the tail
//! writes one key below the current tail, and pops delete the table entry outright.
//! The occupied keys therefore always form one contiguous run of length `count`.
//!
//! Performance Characteristics:
//! - Push/Pop at either end: O(1), one table operation
//! - Random access by logical index: O(1), one table lookup
//! - Memory: bounded deques up to [`MAX_DENSE_SLOTS`](table::MAX_DENSE_SLOTS) preallocate
//!   `capacity` slots; larger bounded deques and unbounded deques grow a sparse hash
//!   table with the item count
//!
//! The deque is a plain single-owner value. Share it between threads through
//! [`SerializedDeque`](crate::concurrency::SerializedDeque).

mod capacity;
mod error;
mod iter;
mod serde_impl;
pub mod table;

#[cfg(test)]
mod tests;

pub use capacity::Capacity;
pub use error::DequeError;
pub use iter::{Drain, IntoIter, Iter};

use core::fmt;
use core::ops::{Index, IndexMut};
use table::{Key, KeyTable, Table};

/// Ring position of a bounded-mode key.
///
/// Bounded arithmetic runs on `usize` so that capacities beyond `i64::MAX` still
/// wrap at `capacity`; keys are the same bits reinterpreted as `Key`.
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
const fn ring_slot(key: Key) -> usize {
    key as usize
}

#[inline]
#[allow(clippy::cast_possible_wrap)]
const fn ring_key(slot: usize) -> Key {
    slot as Key
}

/// A deque addressed by key arithmetic over a key-value table.
#[derive(Clone)]
pub struct IndexedDeque<T> {
    table: Table<T>,
    capacity: Capacity,
    count: usize,
    /// Key of the logical head while `count > 0`; stale otherwise.
    head_key: Key,
}

impl<T> IndexedDeque<T> {
    /// Creates an empty deque with the given capacity.
    ///
    /// Never allocates more than [`MAX_DENSE_SLOTS`](table::MAX_DENSE_SLOTS) slots up
    /// front, whatever the capacity.
    pub fn new(capacity: Capacity) -> Self {
        Self {
            table: Table::for_capacity(capacity),
            capacity,
            count: 0,
            head_key: 0,
        }
    }

    /// Creates an empty deque with no fixed limit.
    pub fn unbounded() -> Self {
        Self::new(Capacity::Unbounded)
    }

    /// Creates an empty deque holding at most `capacity` items.
    ///
    /// # Errors
    /// Returns `DequeError::ZeroCapacity` when `capacity == 0`.
    pub fn bounded(capacity: usize) -> Result<Self, DequeError> {
        Capacity::bounded(capacity).map(Self::new)
    }

    /// Number of items currently stored.
    #[inline(always)]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if the deque holds no items.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The configured capacity.
    #[inline(always)]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Returns `true` if a bounded deque has reached its limit. Always `false` when unbounded.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.capacity.limit() == Some(self.count)
    }

    /// Free slots left, or `None` when unbounded.
    #[inline]
    pub fn remaining(&self) -> Option<usize> {
        self.capacity.limit().map(|limit| limit - self.count)
    }

    /// Pushes `item` in front of the current head.
    ///
    /// # Errors
    /// Returns `DequeError::Full` when a bounded deque is at capacity; the deque is unchanged.
    pub fn push_head(&mut self, item: T) -> Result<(), DequeError> {
        self.ensure_room()?;
        self.write_head(item);
        Ok(())
    }

    /// Pushes `item` behind the current tail.
    ///
    /// # Errors
    /// Returns `DequeError::Full` when a bounded deque is at capacity; the deque is unchanged.
    pub fn push_tail(&mut self, item: T) -> Result<(), DequeError> {
        self.ensure_room()?;
        self.write_tail(item);
        Ok(())
    }

    /// Like [`push_head`](Self::push_head), but hands the item back when the deque is full.
    ///
    /// # Errors
    /// Returns `item` unchanged when a bounded deque is at capacity.
    pub fn try_push_head(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.write_head(item);
        Ok(())
    }

    /// Like [`push_tail`](Self::push_tail), but hands the item back when the deque is full.
    ///
    /// # Errors
    /// Returns `item` unchanged when a bounded deque is at capacity.
    pub fn try_push_tail(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.write_tail(item);
        Ok(())
    }

    /// Removes and returns the head item.
    ///
    /// # Errors
    /// Returns `DequeError::Empty` when there is nothing to pop.
    pub fn pop_head(&mut self) -> Result<T, DequeError> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        let item = self.take(self.head_key);
        self.head_key = self.retreat(self.head_key);
        self.count -= 1;
        self.check_occupancy();
        Ok(item)
    }

    /// Removes and returns the tail item. `head_key` does not move.
    ///
    /// # Errors
    /// Returns `DequeError::Empty` when there is nothing to pop.
    pub fn pop_tail(&mut self) -> Result<T, DequeError> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        let item = self.take(self.key_at(self.count - 1));
        self.count -= 1;
        self.check_occupancy();
        Ok(item)
    }

    /// Returns the head item without removing it.
    ///
    /// # Errors
    /// Returns `DequeError::Empty` on an empty deque.
    pub fn peek_head(&self) -> Result<&T, DequeError> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        Ok(self.occupied(self.head_key))
    }

    /// Returns the tail item without removing it.
    ///
    /// # Errors
    /// Returns `DequeError::Empty` on an empty deque.
    pub fn peek_tail(&self) -> Result<&T, DequeError> {
        if self.is_empty() {
            return Err(DequeError::Empty);
        }
        Ok(self.occupied(self.key_at(self.count - 1)))
    }

    /// Returns the item at logical `index` (0 = head).
    ///
    /// # Errors
    /// Returns `DequeError::OutOfBounds` when `index >= count`.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, DequeError> {
        let key = self.physical_key(index)?;
        Ok(self.occupied(key))
    }

    /// Returns the item at logical `index` mutably.
    ///
    /// # Errors
    /// Returns `DequeError::OutOfBounds` when `index >= count`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, DequeError> {
        let key = self.physical_key(index)?;
        match self.table.get_mut(key) {
            Some(item) => Ok(item),
            None => unreachable!("occupied key {key} missing from table"),
        }
    }

    /// Overwrites the item at logical `index`, returning the previous item.
    ///
    /// # Errors
    /// Returns `DequeError::OutOfBounds` when `index >= count`.
    pub fn replace_at(&mut self, index: usize, item: T) -> Result<T, DequeError> {
        let slot = self.at_mut(index)?;
        Ok(core::mem::replace(slot, item))
    }

    /// Removes the item at logical `index`, which must be the head or the tail.
    ///
    /// Interior removal would require shifting keys, which this structure never does.
    ///
    /// # Errors
    /// Returns `DequeError::OutOfBounds` when `index >= count`, and
    /// `DequeError::UnsupportedRemoval` for any interior index.
    pub fn remove_at(&mut self, index: usize) -> Result<T, DequeError> {
        let count = self.count;
        if index >= count {
            Err(DequeError::OutOfBounds { index, count })
        } else if index == 0 {
            self.pop_head()
        } else if index == count - 1 {
            self.pop_tail()
        } else {
            Err(DequeError::UnsupportedRemoval { index, count })
        }
    }

    /// Physical key currently holding logical `index`.
    ///
    /// Bounded keys lie in `0..capacity`; above `i64::MAX` they read back as the
    /// two's-complement image of that range.
    ///
    /// # Errors
    /// Returns `DequeError::OutOfBounds` when `index >= count`.
    #[inline]
    pub fn physical_key(&self, index: usize) -> Result<Key, DequeError> {
        if index >= self.count {
            return Err(DequeError::OutOfBounds {
                index,
                count: self.count,
            });
        }
        Ok(self.key_at(index))
    }

    /// Removes every item, dropping them.
    pub fn clear(&mut self) {
        self.table.clear();
        self.count = 0;
    }

    /// Iterates head to tail without consuming anything.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Takes every item from the head, in order.
    ///
    /// The deque is empty once the iterator is dropped, even if it was not exhausted.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain::new(self)
    }

    /// Copies the items head to tail into a vector.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    fn ensure_room(&self) -> Result<(), DequeError> {
        match self.capacity {
            Capacity::Bounded(n) if self.count == n.get() => {
                Err(DequeError::Full { capacity: n.get() })
            }
            _ => Ok(()),
        }
    }

    /// Caller has checked capacity.
    fn write_head(&mut self, item: T) {
        self.head_key = self.advance(self.head_key);
        let displaced = self.table.insert(self.head_key, item);
        debug_assert!(displaced.is_none(), "head push overwrote key {}", self.head_key);
        self.count += 1;
        self.check_occupancy();
    }

    /// Caller has checked capacity.
    fn write_tail(&mut self, item: T) {
        let key = self.key_at(self.count);
        let displaced = self.table.insert(key, item);
        debug_assert!(displaced.is_none(), "tail push overwrote key {key}");
        if self.count == 0 {
            self.head_key = key;
        }
        self.count += 1;
        self.check_occupancy();
    }

    /// Key of logical `index`. Also valid for `index == count` as long as room remains.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    fn key_at(&self, index: usize) -> Key {
        match self.capacity {
            Capacity::Unbounded => self.head_key.wrapping_sub(index as Key),
            Capacity::Bounded(n) => {
                // 0 <= head < n and index < n, so neither branch leaves 0..n.
                let head = ring_slot(self.head_key);
                if index <= head {
                    ring_key(head - index)
                } else {
                    ring_key(head + (n.get() - index))
                }
            }
        }
    }

    #[inline]
    fn advance(&self, key: Key) -> Key {
        match self.capacity {
            Capacity::Unbounded => key.wrapping_add(1),
            Capacity::Bounded(n) if ring_slot(key) + 1 == n.get() => 0,
            Capacity::Bounded(_) => ring_key(ring_slot(key) + 1),
        }
    }

    #[inline]
    fn retreat(&self, key: Key) -> Key {
        match self.capacity {
            Capacity::Unbounded => key.wrapping_sub(1),
            Capacity::Bounded(n) if key == 0 => ring_key(n.get() - 1),
            Capacity::Bounded(_) => ring_key(ring_slot(key) - 1),
        }
    }

    #[inline]
    fn occupied(&self, key: Key) -> &T {
        match self.table.get(key) {
            Some(item) => item,
            None => unreachable!("occupied key {key} missing from table"),
        }
    }

    #[inline]
    fn take(&mut self, key: Key) -> T {
        match self.table.remove(key) {
            Some(item) => item,
            None => unreachable!("occupied key {key} missing from table"),
        }
    }

    #[inline(always)]
    fn check_occupancy(&self) {
        debug_assert_eq!(
            self.table.len(),
            self.count,
            "table occupancy diverged from item count"
        );
    }
}

impl<T> Default for IndexedDeque<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T: fmt::Debug> fmt::Debug for IndexedDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for IndexedDeque<T> {
    /// Compares capacity and head-to-tail contents, never physical keys.
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity
            && self.count == other.count
            && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for IndexedDeque<T> {}

impl<T> Index<usize> for IndexedDeque<T> {
    type Output = T;

    /// # Panics
    /// Panics when `index >= count`.
    fn index(&self, index: usize) -> &T {
        self.at(index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T> IndexMut<usize> for IndexedDeque<T> {
    /// # Panics
    /// Panics when `index >= count`.
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.at_mut(index).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T> FromIterator<T> for IndexedDeque<T> {
    /// Builds an unbounded deque, pushing each item to the tail.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::unbounded();
        for item in iter {
            deque.write_tail(item);
        }
        deque
    }
}

impl<T> Extend<T> for IndexedDeque<T> {
    /// Pushes each item to the tail.
    ///
    /// # Panics
    /// Panics if a bounded deque fills up; use [`IndexedDeque::push_tail`] to handle that case.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            if let Err(err) = self.push_tail(item) {
                panic!("{err}");
            }
        }
    }
}

impl<T> IntoIterator for IndexedDeque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a IndexedDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
