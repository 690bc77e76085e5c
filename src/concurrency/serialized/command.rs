//! Primitive requests understood by the worker, and their replies.

use crate::collections::{Capacity, DequeError, IndexedDeque};

/// One primitive deque operation, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<T> {
    /// `push_head(item)`.
    PushHead(T),
    /// `push_tail(item)`.
    PushTail(T),
    /// `pop_head()`.
    PopHead,
    /// `pop_tail()`.
    PopTail,
    /// `peek_head()`, replying with a clone.
    PeekHead,
    /// `peek_tail()`, replying with a clone.
    PeekTail,
    /// `at(index)`, replying with a clone.
    At(usize),
    /// `replace_at(index, item)`, replying with the previous item.
    ReplaceAt(usize, T),
    /// `remove_at(index)`; head or tail only.
    RemoveAt(usize),
    /// `count()`.
    Count,
    /// `capacity()`.
    Capacity,
    /// `clear()`.
    Clear,
}

/// Successful outcome of a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// The command mutated the deque and returns nothing.
    Done,
    /// An item taken, copied, or displaced from the deque.
    Item(T),
    /// The item count.
    Count(usize),
    /// The configured capacity.
    Capacity(Capacity),
}

impl<T> Reply<T> {
    /// The carried item, if any.
    pub fn into_item(self) -> Option<T> {
        match self {
            Reply::Item(item) => Some(item),
            _ => None,
        }
    }
}

impl<T: Clone> Command<T> {
    /// Runs the command against `deque`.
    ///
    /// # Errors
    /// Whatever the underlying primitive reports.
    pub fn apply(self, deque: &mut IndexedDeque<T>) -> Result<Reply<T>, DequeError> {
        match self {
            Command::PushHead(item) => deque.push_head(item).map(|()| Reply::Done),
            Command::PushTail(item) => deque.push_tail(item).map(|()| Reply::Done),
            Command::PopHead => deque.pop_head().map(Reply::Item),
            Command::PopTail => deque.pop_tail().map(Reply::Item),
            Command::PeekHead => deque.peek_head().cloned().map(Reply::Item),
            Command::PeekTail => deque.peek_tail().cloned().map(Reply::Item),
            Command::At(index) => deque.at(index).cloned().map(Reply::Item),
            Command::ReplaceAt(index, item) => deque.replace_at(index, item).map(Reply::Item),
            Command::RemoveAt(index) => deque.remove_at(index).map(Reply::Item),
            Command::Count => Ok(Reply::Count(deque.count())),
            Command::Capacity => Ok(Reply::Capacity(deque.capacity())),
            Command::Clear => {
                deque.clear();
                Ok(Reply::Done)
            }
        }
    }

    /// Short name used in log events.
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(super) fn name(&self) -> &'static str {
        match self {
            Command::PushHead(_) => "push_head",
            Command::PushTail(_) => "push_tail",
            Command::PopHead => "pop_head",
            Command::PopTail => "pop_tail",
            Command::PeekHead => "peek_head",
            Command::PeekTail => "peek_tail",
            Command::At(_) => "at",
            Command::ReplaceAt(..) => "replace_at",
            Command::RemoveAt(_) => "remove_at",
            Command::Count => "count",
            Command::Capacity => "capacity",
            Command::Clear => "clear",
        }
    }
}
