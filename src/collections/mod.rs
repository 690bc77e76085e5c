//! Collections addressed by key arithmetic.
//!
//! - `indexed_deque`: a double-ended queue over a key-value table with O(1) access by
//!   logical index

pub mod indexed_deque;

pub use indexed_deque::{Capacity, DequeError, Drain, IndexedDeque, IntoIter, Iter};
