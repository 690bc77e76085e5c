//! `SerializedDeque`: one worker thread owning one `IndexedDeque`.
//!
//! Callers on any thread send requests over an MPSC channel; the worker drains it
//! strictly in arrival order and runs each request to completion before taking the
//! next, so no two requests ever interleave. Each request carries a oneshot reply
//! channel on which the caller waits, up to a timeout.
//!
//! States: `idle -> processing(one request) -> idle`, until [`SerializedDeque::stop`]
//! is called or the last handle is dropped.
//!
//! A timeout is local to the caller. The request is not withdrawn and may still be
//! applied afterwards, so a timed-out caller must treat the outcome as unknown.

mod command;
mod config;
mod error;


pub use command::{Command, Reply};
pub use config::AccessConfig;
pub use error::AccessError;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use super::channel::{mpsc, oneshot};
use crate::collections::{Capacity, IndexedDeque};

type Job<T> = Box<dyn FnOnce(&mut IndexedDeque<T>) + Send + 'static>;

enum Request<T> {
    Run(Job<T>),
    Stop,
}

struct Shared<T> {
    requests: mpsc::Sender<Request<T>>,
    /// Locked by the worker for the duration of each request, and by `snapshot`.
    /// Emptied by `stop` once the worker has been joined.
    deque: Arc<Mutex<Option<IndexedDeque<T>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    capacity: Capacity,
    config: AccessConfig,
}

/// A deque whose operations are executed one at a time by a dedicated worker.
///
/// Handles are cheap to clone and may be shared freely between threads; all of
/// them address the same worker.
pub struct SerializedDeque<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for SerializedDeque<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

fn lock<T>(deque: &Mutex<Option<IndexedDeque<T>>>) -> MutexGuard<'_, Option<IndexedDeque<T>>> {
    // Transforms run under `catch_unwind`, so a poisoned lock only means a panic
    // escaped a primitive; the deque itself is still consistent.
    deque.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables, unused_assignments))]
fn run_worker<T>(
    requests: mpsc::Receiver<Request<T>>,
    deque: Arc<Mutex<Option<IndexedDeque<T>>>>,
) {
    log_event!(debug, "deque worker started");
    let mut processed: u64 = 0;
    while let Ok(request) = requests.recv() {
        match request {
            Request::Run(job) => {
                // `stop` joins the worker before taking the deque, so it is always here.
                if let Some(deque) = lock(&deque).as_mut() {
                    job(deque);
                    processed += 1;
                }
            }
            Request::Stop => break,
        }
    }
    // Dropping the abandoned jobs drops their reply senders; their callers see `Stopped`.
    let abandoned = requests.close();
    log_event!(
        debug,
        processed,
        abandoned = abandoned.len(),
        "deque worker stopped"
    );
    drop(abandoned);
}

impl<T: Send + 'static> SerializedDeque<T> {
    /// Moves `deque` into a new worker thread using the default configuration.
    ///
    /// # Errors
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(deque: IndexedDeque<T>) -> std::io::Result<Self> {
        Self::spawn_with(deque, AccessConfig::default())
    }

    /// Moves `deque` into a new worker thread.
    ///
    /// # Errors
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn_with(deque: IndexedDeque<T>, config: AccessConfig) -> std::io::Result<Self> {
        let capacity = deque.capacity();
        let deque = Arc::new(Mutex::new(Some(deque)));
        let (requests, inbox) = mpsc::channel();

        let worker_deque = Arc::clone(&deque);
        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || run_worker(inbox, worker_deque))?;
        let worker_id = handle.thread().id();

        Ok(Self {
            shared: Arc::new(Shared {
                requests,
                deque,
                worker: Mutex::new(Some(handle)),
                worker_id,
                capacity,
                config,
            }),
        })
    }

    /// The configuration this worker was spawned with.
    pub fn config(&self) -> &AccessConfig {
        &self.shared.config
    }

    /// The deque's capacity. Fixed at construction, so no request is needed.
    pub fn capacity(&self) -> Capacity {
        self.shared.capacity
    }

    /// Runs `transform` on the worker with the default timeout.
    ///
    /// See [`execute_with_timeout`](Self::execute_with_timeout).
    ///
    /// # Errors
    /// As for [`execute_with_timeout`](Self::execute_with_timeout).
    pub fn execute<R, F>(&self, transform: F) -> Result<R, AccessError>
    where
        F: FnOnce(&mut IndexedDeque<T>) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.execute_with_timeout(transform, self.shared.config.default_timeout)
    }

    /// Runs `transform` against the deque inside the worker and returns its result.
    ///
    /// No other request interleaves with the transform, which makes compound
    /// operations atomic. The transform must not make requests to this same
    /// `SerializedDeque`; doing so fails with [`AccessError::Reentrant`].
    ///
    /// # Errors
    /// `Timeout` if no reply arrives in time (the transform may still run),
    /// `Stopped` if the worker is gone, `Reentrant` when called from the worker,
    /// `Panicked` if the transform panicked.
    pub fn execute_with_timeout<R, F>(
        &self,
        transform: F,
        timeout: Duration,
    ) -> Result<R, AccessError>
    where
        F: FnOnce(&mut IndexedDeque<T>) -> R + Send + 'static,
        R: Send + 'static,
    {
        if thread::current().id() == self.shared.worker_id {
            return Err(AccessError::Reentrant);
        }

        let (reply, outcome) = oneshot::channel();
        let job: Job<T> = Box::new(move |deque: &mut IndexedDeque<T>| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| transform(deque)))
                .map_err(|_| AccessError::Panicked);
            if result.is_err() {
                log_event!(warn, "deque transform panicked; worker continues");
            }
            if reply.send(result).is_err() {
                log_event!(trace, "caller stopped waiting before the reply was ready");
            }
        });

        self.shared
            .requests
            .send(Request::Run(job))
            .map_err(|_| AccessError::Stopped)?;

        match outcome.recv_timeout(timeout) {
            Ok(result) => result,
            Err(oneshot::RecvTimeoutError::Timeout) => {
                log_event!(debug, ?timeout, "deque request timed out");
                Err(AccessError::Timeout(timeout))
            }
            Err(oneshot::RecvTimeoutError::Disconnected) => Err(AccessError::Stopped),
        }
    }

    /// Runs a fallible primitive on the worker, flattening its error.
    fn call<R, F>(&self, op: F) -> Result<R, AccessError>
    where
        F: FnOnce(&mut IndexedDeque<T>) -> Result<R, crate::collections::DequeError>
            + Send
            + 'static,
        R: Send + 'static,
    {
        Ok(self.execute(op)??)
    }

    /// Serialized `push_head`.
    ///
    /// # Errors
    /// `AccessError::Deque(Full)` on a full bounded deque, or any access failure.
    pub fn push_head(&self, item: T) -> Result<(), AccessError> {
        self.call(move |deque| deque.push_head(item))
    }

    /// Serialized `push_tail`.
    ///
    /// # Errors
    /// `AccessError::Deque(Full)` on a full bounded deque, or any access failure.
    pub fn push_tail(&self, item: T) -> Result<(), AccessError> {
        self.call(move |deque| deque.push_tail(item))
    }

    /// Serialized `pop_head`.
    ///
    /// # Errors
    /// `AccessError::Deque(Empty)` on an empty deque, or any access failure.
    pub fn pop_head(&self) -> Result<T, AccessError> {
        self.call(IndexedDeque::pop_head)
    }

    /// Serialized `pop_tail`.
    ///
    /// # Errors
    /// `AccessError::Deque(Empty)` on an empty deque, or any access failure.
    pub fn pop_tail(&self) -> Result<T, AccessError> {
        self.call(IndexedDeque::pop_tail)
    }

    /// Serialized `replace_at`, returning the previous item.
    ///
    /// # Errors
    /// `AccessError::Deque(OutOfBounds)` when `index >= count`, or any access failure.
    pub fn replace_at(&self, index: usize, item: T) -> Result<T, AccessError> {
        self.call(move |deque| deque.replace_at(index, item))
    }

    /// Serialized `remove_at`; head or tail only.
    ///
    /// # Errors
    /// `OutOfBounds` or `UnsupportedRemoval` from the deque, or any access failure.
    pub fn remove_at(&self, index: usize) -> Result<T, AccessError> {
        self.call(move |deque| deque.remove_at(index))
    }

    /// Serialized `count`.
    ///
    /// # Errors
    /// Any access failure.
    pub fn count(&self) -> Result<usize, AccessError> {
        self.execute(|deque| deque.count())
    }

    /// Serialized `clear`.
    ///
    /// # Errors
    /// Any access failure.
    pub fn clear(&self) -> Result<(), AccessError> {
        self.execute(IndexedDeque::clear)
    }

    /// Stops the worker once every request queued ahead of this one has run, and
    /// returns the final deque.
    ///
    /// Requests queued behind the stop fail with [`AccessError::Stopped`], as do all
    /// later ones on every handle.
    ///
    /// # Errors
    /// `Stopped` if the worker was already stopped, `Reentrant` when called from the worker.
    pub fn stop(&self) -> Result<IndexedDeque<T>, AccessError> {
        if thread::current().id() == self.shared.worker_id {
            return Err(AccessError::Reentrant);
        }
        let handle = self
            .shared
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(AccessError::Stopped)?;

        // The worker may already be gone if it panicked; joining still reclaims it.
        let _ = self.shared.requests.send(Request::Stop);
        if handle.join().is_err() {
            log_event!(warn, "deque worker exited by panic");
        }

        lock(&self.shared.deque).take().ok_or(AccessError::Stopped)
    }

    /// Returns `true` while the worker accepts requests.
    pub fn is_running(&self) -> bool {
        self.shared.requests.is_open()
    }
}

impl<T: Clone + Send + 'static> SerializedDeque<T> {
    /// Queues `command`, waiting at most `timeout` for its reply.
    ///
    /// Deque-level failures come back as `AccessError::Deque` and never stop the worker.
    ///
    /// # Errors
    /// The command's own failure, or any access failure.
    pub fn submit(
        &self,
        command: Command<T>,
        timeout: Duration,
    ) -> Result<Reply<T>, AccessError> {
        log_event!(trace, command = command.name(), "submitting deque command");
        Ok(self.execute_with_timeout(move |deque| command.apply(deque), timeout)??)
    }

    /// Serialized `peek_head`, returning a clone.
    ///
    /// # Errors
    /// `AccessError::Deque(Empty)` on an empty deque, or any access failure.
    pub fn peek_head(&self) -> Result<T, AccessError> {
        self.call(|deque| deque.peek_head().cloned())
    }

    /// Serialized `peek_tail`, returning a clone.
    ///
    /// # Errors
    /// `AccessError::Deque(Empty)` on an empty deque, or any access failure.
    pub fn peek_tail(&self) -> Result<T, AccessError> {
        self.call(|deque| deque.peek_tail().cloned())
    }

    /// Serialized `at`, returning a clone.
    ///
    /// # Errors
    /// `AccessError::Deque(OutOfBounds)` when `index >= count`, or any access failure.
    pub fn at(&self, index: usize) -> Result<T, AccessError> {
        self.call(move |deque| deque.at(index).cloned())
    }

    /// Clones the deque as it is right now, without queueing behind pending requests.
    ///
    /// This is not serialized against later mutation: by the time it returns, other
    /// requests may already have changed the deque. It waits only for a request that
    /// is mid-flight. Use [`execute`](Self::execute) when a consistent view must be
    /// combined with further operations. Calling it from inside a transform deadlocks.
    ///
    /// # Errors
    /// `Stopped` once [`stop`](Self::stop) has handed the deque back.
    pub fn snapshot(&self) -> Result<IndexedDeque<T>, AccessError> {
        lock(&self.shared.deque)
            .as_ref()
            .cloned()
            .ok_or(AccessError::Stopped)
    }
}

impl<T> Drop for Shared<T> {
    fn drop(&mut self) {
        let handle = self
            .worker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = self.requests.send(Request::Stop);
            // The last handle may be dropped by a transform running on the worker itself.
            if thread::current().id() != self.worker_id {
                let _ = handle.join();
            }
        }
    }
}
