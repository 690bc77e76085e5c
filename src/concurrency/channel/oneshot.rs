//! A oneshot reply channel.
//!
//! Designed for a single value travelling from the worker back to one waiting
//! caller. The receiver may give up after a deadline; a later `send` then hands
//! the value back to the sender instead of storing it.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Error returned by `Sender::send` when the receiver is gone; carries the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendError<T>(pub T);

/// Error returned by `Receiver::recv` when the sender dropped without sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvError;

/// Error returned by `Receiver::recv_timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvTimeoutError {
    /// The deadline passed before a value arrived.
    Timeout,
    /// The sender dropped without sending.
    Disconnected,
}

struct State<T> {
    value: Option<T>,
    sender_alive: bool,
    receiver_alive: bool,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    condvar: Condvar,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The sending half of a oneshot channel.
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> std::fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender").finish_non_exhaustive()
    }
}

/// The receiving half of a oneshot channel.
pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

/// Creates a oneshot channel, returning the sender/receiver halves.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            value: None,
            sender_alive: true,
            receiver_alive: true,
        }),
        condvar: Condvar::new(),
    });

    (
        Sender {
            shared: Arc::clone(&shared),
        },
        Receiver { shared },
    )
}

impl<T> Sender<T> {
    /// Delivers the value, consuming the sender.
    ///
    /// # Errors
    /// Returns the value back if the receiver has already been dropped.
    pub fn send(self, value: T) -> Result<(), SendError<T>> {
        let mut state = self.shared.lock();
        if !state.receiver_alive {
            return Err(SendError(value));
        }
        state.value = Some(value);
        self.shared.condvar.notify_one();
        Ok(())
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.sender_alive = false;
        if state.value.is_none() {
            self.shared.condvar.notify_all();
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.shared.lock().receiver_alive = false;
    }
}

impl<T> Receiver<T> {
    /// Blocks until the value arrives.
    ///
    /// # Errors
    /// Returns `RecvError` if the sender dropped without sending.
    pub fn recv(self) -> Result<T, RecvError> {
        let mut state = self.shared.lock();
        loop {
            if let Some(value) = state.value.take() {
                return Ok(value);
            }
            if !state.sender_alive {
                return Err(RecvError);
            }
            state = self
                .shared
                .condvar
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Blocks until the value arrives or `timeout` elapses.
    ///
    /// The receiver is consumed either way: a value sent after the deadline is
    /// refused and returned to the sender.
    ///
    /// # Errors
    /// `RecvTimeoutError::Timeout` when the deadline passes first,
    /// `RecvTimeoutError::Disconnected` if the sender dropped without sending.
    pub fn recv_timeout(self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        // An overflowing deadline is as good as none.
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.shared.lock();
        loop {
            if let Some(value) = state.value.take() {
                return Ok(value);
            }
            if !state.sender_alive {
                return Err(RecvTimeoutError::Disconnected);
            }
            state = match deadline {
                None => self
                    .shared
                    .condvar
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(RecvTimeoutError::Timeout);
                    }
                    self.shared
                        .condvar
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_oneshot_basic() {
        let (tx, rx) = channel();
        tx.send(42).unwrap();
        assert_eq!(rx.recv(), Ok(42));
    }

    #[test]
    fn test_oneshot_threaded() {
        let (tx, rx) = channel();
        thread::scope(|s| {
            s.spawn(move || {
                thread::sleep(Duration::from_millis(10));
                tx.send(99).unwrap();
            });
            assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(99));
        });
    }

    #[test]
    fn test_sender_drop_disconnect() {
        let (tx, rx) = channel::<i32>();
        drop(tx);
        assert_eq!(rx.recv(), Err(RecvError));
    }

    #[test]
    fn test_timeout_then_late_send_is_refused() {
        let (tx, rx) = channel();
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(5)),
            Err(RecvTimeoutError::Timeout)
        );
        assert_eq!(tx.send(vec![1, 2, 3]), Err(SendError(vec![1, 2, 3])));
    }

    #[test]
    fn test_disconnect_wakes_timed_receiver() {
        let (tx, rx) = channel::<u8>();
        thread::scope(|s| {
            s.spawn(move || {
                thread::sleep(Duration::from_millis(10));
                drop(tx);
            });
            assert_eq!(
                rx.recv_timeout(Duration::from_secs(5)),
                Err(RecvTimeoutError::Disconnected)
            );
        });
    }
}
