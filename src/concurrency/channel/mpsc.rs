//! Unbounded multi-producer, single-consumer request channel.
//!
//! Values are delivered strictly in the order the senders' `send` calls acquired
//! the queue lock. The receiver may `close` the channel, after which sends fail and
//! already queued values can still be drained.

use crossbeam_utils::CachePadded;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Error returned when the channel is disconnected (all senders dropped) and drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvError;

/// Error returned when sending to a closed channel; carries the rejected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendError<T>(pub T);

/// Error returned when `try_recv` fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// The channel is empty.
    Empty,
    /// The channel is disconnected.
    Disconnected,
}

struct State<T> {
    queue: VecDeque<T>,
    senders: usize,
    open: bool,
}

struct Shared<T> {
    state: CachePadded<Mutex<State<T>>>,
    condvar: Condvar,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // Queue state stays consistent across a panicking holder; keep going.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The sending half of the channel.
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

/// The receiving half of the channel.
pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

/// Creates an unbounded channel, returning the sender/receiver halves.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        state: CachePadded::new(Mutex::new(State {
            queue: VecDeque::new(),
            senders: 1,
            open: true,
        })),
        condvar: Condvar::new(),
    });

    (
        Sender {
            shared: Arc::clone(&shared),
        },
        Receiver { shared },
    )
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        self.shared.lock().senders += 1;
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.senders -= 1;
        if state.senders == 0 {
            self.shared.condvar.notify_all();
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        // Dropped outside the lock: a queued value may own a `Sender` of this channel.
        drop(self.close());
    }
}

impl<T> Sender<T> {
    /// Enqueues a value. Never blocks on capacity.
    ///
    /// # Errors
    /// Returns the value back if the receiver has closed or been dropped.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        let mut state = self.shared.lock();
        if !state.open {
            return Err(SendError(value));
        }
        state.queue.push_back(value);
        self.shared.condvar.notify_one();
        Ok(())
    }

    /// Returns `true` if the receiver still accepts values.
    pub fn is_open(&self) -> bool {
        self.shared.lock().open
    }
}

impl<T> Receiver<T> {
    /// Blocks until a value arrives.
    ///
    /// # Errors
    /// Returns `RecvError` once the queue is empty and every sender is gone.
    pub fn recv(&self) -> Result<T, RecvError> {
        let mut state = self.shared.lock();
        loop {
            if let Some(value) = state.queue.pop_front() {
                return Ok(value);
            }
            if state.senders == 0 {
                return Err(RecvError);
            }
            state = self
                .shared
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Returns a pending value without blocking.
    ///
    /// # Errors
    /// `TryRecvError::Empty` if nothing is queued, `TryRecvError::Disconnected` if nothing
    /// ever will be.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        let mut state = self.shared.lock();
        if let Some(value) = state.queue.pop_front() {
            Ok(value)
        } else if state.senders == 0 {
            Err(TryRecvError::Disconnected)
        } else {
            Err(TryRecvError::Empty)
        }
    }

    /// Stops accepting values and hands back everything still queued, in order.
    pub fn close(&self) -> Vec<T> {
        let mut state = self.shared.lock();
        state.open = false;
        state.queue.drain(..).collect()
    }
}
