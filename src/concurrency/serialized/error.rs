use core::fmt;
use std::time::Duration;

use crate::collections::DequeError;

/// Failure of a request made through [`SerializedDeque`](super::SerializedDeque).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The operation ran and failed on the deque itself.
    Deque(DequeError),
    /// No reply arrived within the caller's timeout.
    ///
    /// The request stays queued and may still run: the outcome is unknown.
    Timeout(Duration),
    /// The worker has stopped and no longer runs requests.
    Stopped,
    /// A request was made from inside the worker, where waiting for a reply would deadlock.
    Reentrant,
    /// The submitted transform panicked; the worker kept running.
    Panicked,
}

impl AccessError {
    /// Returns `true` for the caller-side timeout.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, AccessError::Timeout(_))
    }

    /// The deque-level failure, if that is what this is.
    pub const fn as_deque_error(&self) -> Option<DequeError> {
        match self {
            AccessError::Deque(err) => Some(*err),
            _ => None,
        }
    }
}

impl From<DequeError> for AccessError {
    fn from(err: DequeError) -> Self {
        AccessError::Deque(err)
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::Deque(err) => err.fmt(f),
            AccessError::Timeout(after) => write!(f, "no reply from deque worker within {after:?}"),
            AccessError::Stopped => f.write_str("deque worker has stopped"),
            AccessError::Reentrant => {
                f.write_str("request submitted from inside the deque worker would deadlock")
            }
            AccessError::Panicked => f.write_str("deque transform panicked"),
        }
    }
}

impl std::error::Error for AccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AccessError::Deque(err) => Some(err),
            _ => None,
        }
    }
}
