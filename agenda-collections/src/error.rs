//! Error types for queue operations.

use core::fmt;

/// A policy could not produce a deep copy of an element or priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyError;

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value could not be copied")
    }
}

impl std::error::Error for CopyError {}

/// Failure of a [`SortedQueue`](crate::SortedQueue) operation.
///
/// A failed operation leaves the queue exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The policy failed to copy an element or priority.
    CopyFailed,
    /// Node storage could not take another entry.
    Full,
    /// No entry matched the lookup.
    NotFound,
}

impl QueueError {
    /// Returns `true` for the resource-exhaustion failures
    /// ([`CopyFailed`](Self::CopyFailed) and [`Full`](Self::Full)).
    #[inline]
    pub const fn is_alloc_failure(self) -> bool {
        matches!(self, Self::CopyFailed | Self::Full)
    }
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CopyFailed => f.write_str("element or priority could not be copied"),
            Self::Full => f.write_str("queue storage is full"),
            Self::NotFound => f.write_str("element does not exist"),
        }
    }
}

impl std::error::Error for QueueError {}

impl From<CopyError> for QueueError {
    fn from(_: CopyError) -> Self {
        Self::CopyFailed
    }
}

/// A [`Callbacks`](crate::Callbacks) table was built with a callback missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The named callback was never supplied.
    MissingCallback(&'static str),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCallback(name) => write!(f, "missing callback '{name}'"),
        }
    }
}

impl std::error::Error for BuildError {}
