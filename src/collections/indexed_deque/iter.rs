//! Iterators over `IndexedDeque`, built only from `count`, `at`, and the head/tail pops.

use core::iter::FusedIterator;
use core::ops::Range;

use super::IndexedDeque;

/// Borrowing head-to-tail iterator.
pub struct Iter<'a, T> {
    deque: &'a IndexedDeque<T>,
    range: Range<usize>,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(deque: &'a IndexedDeque<T>) -> Self {
        Self {
            deque,
            range: 0..deque.count(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            deque: self.deque,
            range: self.range.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        let i = self.range.next()?;
        self.deque.at(i).ok()
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let i = self.range.nth(n)?;
        self.deque.at(i).ok()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline(always)]
    fn next_back(&mut self) -> Option<Self::Item> {
        let i = self.range.next_back()?;
        self.deque.at(i).ok()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Destructive iterator taking items from the head.
///
/// Whatever is left when it is dropped is cleared from the deque.
pub struct Drain<'a, T> {
    deque: &'a mut IndexedDeque<T>,
}

impl<'a, T> Drain<'a, T> {
    pub(super) fn new(deque: &'a mut IndexedDeque<T>) -> Self {
        Self { deque }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.deque.pop_head().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.count(), Some(self.deque.count()))
    }
}

impl<T> DoubleEndedIterator for Drain<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_tail().ok()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        self.deque.clear();
    }
}

/// Owning iterator taking items from the head.
pub struct IntoIter<T> {
    deque: IndexedDeque<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(deque: IndexedDeque<T>) -> Self {
        Self { deque }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.deque.pop_head().ok()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.count(), Some(self.deque.count()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.deque.pop_tail().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
