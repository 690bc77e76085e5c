use core::fmt;
use core::num::NonZeroUsize;
use serde::{Deserialize, Serialize};

use super::DequeError;

/// Maximum number of items a deque may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    /// No fixed limit; physical keys extend monotonically.
    #[default]
    Unbounded,
    /// Fixed limit; physical keys are reused modulo the limit.
    Bounded(NonZeroUsize),
}

impl Capacity {
    /// `None` means unbounded; `Some(0)` is rejected.
    ///
    /// # Errors
    /// Returns `DequeError::ZeroCapacity` for `Some(0)`.
    pub fn new(limit: Option<usize>) -> Result<Self, DequeError> {
        match limit {
            None => Ok(Capacity::Unbounded),
            Some(n) => Self::bounded(n),
        }
    }

    /// A bounded capacity of `n` items.
    ///
    /// # Errors
    /// Returns `DequeError::ZeroCapacity` when `n == 0`.
    pub fn bounded(n: usize) -> Result<Self, DequeError> {
        NonZeroUsize::new(n)
            .map(Capacity::Bounded)
            .ok_or(DequeError::ZeroCapacity)
    }

    /// The fixed limit, or `None` when unbounded.
    #[inline]
    pub const fn limit(self) -> Option<usize> {
        match self {
            Capacity::Unbounded => None,
            Capacity::Bounded(n) => Some(n.get()),
        }
    }

    /// Returns `true` for the unbounded mode.
    #[inline]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Capacity::Unbounded)
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(n: NonZeroUsize) -> Self {
        Capacity::Bounded(n)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Unbounded => f.write_str("unbounded"),
            Capacity::Bounded(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_construction() {
        assert_eq!(Capacity::new(None), Ok(Capacity::Unbounded));
        assert_eq!(Capacity::new(Some(0)), Err(DequeError::ZeroCapacity));
        assert_eq!(Capacity::bounded(3).unwrap().limit(), Some(3));
        assert!(Capacity::default().is_unbounded());
        assert_eq!(Capacity::bounded(8).unwrap().to_string(), "8");
        assert_eq!(Capacity::Unbounded.to_string(), "unbounded");
    }

    #[test]
    fn capacity_serde_shape() {
        let json = serde_json::to_string(&Capacity::bounded(4).unwrap()).unwrap();
        assert_eq!(json, r#"{"bounded":4}"#);
        let back: Capacity = serde_json::from_str(r#""unbounded""#).unwrap();
        assert_eq!(back, Capacity::Unbounded);
        assert!(serde_json::from_str::<Capacity>(r#"{"bounded":0}"#).is_err());
    }
}
