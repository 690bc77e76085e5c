//! # `keyed_deque` - Double-Ended Queue over a Key-Value Table
//!
//! A deque that stores its items in a key-value table instead of a linked structure
//! or a shifting buffer. Every logical position maps to a physical key through plain
//! arithmetic, which gives amortized O(1) push and pop at both ends *and* O(1)
//! random access by logical index.
//!
//! ## Architecture
//!
//! ### Core Abstractions
//!
//! 1. **Indexed deque** (`IndexedDeque<T>`):
//!    - Three integers (`capacity`, `count`, `head_key`) plus a key table
//!    - Bounded mode reuses keys modulo the capacity (a true circular buffer over a
//!      fixed slot array)
//!    - Unbounded mode never wraps; keys drift freely over a sparse hash table
//!    - Items are never shifted: interior removal is rejected, not emulated
//!
//! 2. **Serialized access** (`SerializedDeque<T>`):
//!    - One worker thread owns one deque
//!    - Requests from any number of callers run strictly one at a time, FIFO
//!    - `execute` makes arbitrary compound transforms atomic
//!    - Timeouts are caller-local; a timed-out request may still complete
//!
//! ### Invariants
//!
//! **Contiguity**: the occupied physical keys are exactly `key(0) .. key(count - 1)`,
//! where `key(i) = head_key - i` (unbounded) or `(capacity + head_key - i) mod capacity`
//! (bounded). Popped entries are deleted from the table, never left behind.
//!
//! **Failure atomicity**: an operation that fails (`Full`, `Empty`, `OutOfBounds`,
//! `UnsupportedRemoval`) leaves the deque exactly as it was.
//!
//! **Serialization**: no two requests to one `SerializedDeque` ever overlap.
//!
//! ## Example
//!
//! ```rust
//! use keyed_deque::{IndexedDeque, DequeError};
//!
//! let mut deque = IndexedDeque::bounded(3)?;
//! deque.push_head('A')?;
//! deque.push_tail('B')?;
//! deque.push_tail('C')?;
//! assert_eq!(deque.push_tail('D'), Err(DequeError::Full { capacity: 3 }));
//!
//! assert_eq!(deque.pop_tail()?, 'C');
//! deque.push_tail('D')?;
//! assert_eq!(deque.to_vec(), ['A', 'B', 'D']);
//! assert_eq!(deque.at(1)?, &'B');
//! # Ok::<(), DequeError>(())
//! ```
//!
//! Sharing one deque between threads:
//!
//! ```rust
//! use keyed_deque::{IndexedDeque, SerializedDeque};
//!
//! let shared = SerializedDeque::spawn(IndexedDeque::unbounded()).unwrap();
//! std::thread::scope(|s| {
//!     for id in 0..4 {
//!         let handle = shared.clone();
//!         s.spawn(move || handle.push_tail(id).unwrap());
//!     }
//! });
//! let total: i32 = shared.execute(|deque| deque.drain().sum()).unwrap();
//! assert_eq!(total, 6);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

/// Emits a `tracing` event when the `tracing` feature is enabled; compiles away otherwise.
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)+);
    }};
}

pub mod collections;
pub mod concurrency;

pub use collections::{Capacity, DequeError, IndexedDeque};
pub use concurrency::{AccessConfig, AccessError, Command, Reply, SerializedDeque};

// Compile-time assertions for layout and thread-safety claims
const _: () = {
    use core::mem;

    // `Capacity` stores its limit in a `NonZeroUsize`, so `Unbounded` takes the zero niche.
    assert!(mem::size_of::<Capacity>() == mem::size_of::<usize>());
};

const _: fn() = || {
    fn assert_send<X: Send>() {}
    fn assert_send_sync<X: Send + Sync>() {}

    assert_send::<IndexedDeque<String>>();
    assert_send_sync::<SerializedDeque<String>>();
    assert_send_sync::<AccessError>();
};
