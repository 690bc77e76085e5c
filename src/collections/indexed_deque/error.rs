use core::fmt;

/// Failure of a primitive deque operation.
///
/// Every variant leaves the deque exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DequeError {
    /// A push was attempted on a bounded deque holding `capacity` items.
    Full {
        /// The configured capacity.
        capacity: usize,
    },
    /// A pop or peek was attempted on an empty deque.
    Empty,
    /// `index` does not address one of the `count` stored items.
    OutOfBounds {
        /// The requested logical index.
        index: usize,
        /// The item count at the time of the call.
        count: usize,
    },
    /// Removal was requested at an index other than the head or the tail.
    UnsupportedRemoval {
        /// The requested logical index.
        index: usize,
        /// The item count at the time of the call.
        count: usize,
    },
    /// A bounded deque was requested with a capacity of zero.
    ZeroCapacity,
}

impl fmt::Display for DequeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DequeError::Full { capacity } => write!(f, "deque is full (capacity {capacity})"),
            DequeError::Empty => f.write_str("deque is empty"),
            DequeError::OutOfBounds { index, count } => {
                write!(f, "index {index} out of bounds for deque of {count} items")
            }
            DequeError::UnsupportedRemoval { index, count } => write!(
                f,
                "cannot remove index {index} from deque of {count} items: only the head or the tail can be removed"
            ),
            DequeError::ZeroCapacity => f.write_str("bounded deque capacity must be positive"),
        }
    }
}

impl std::error::Error for DequeError {}
