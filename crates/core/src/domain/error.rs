// Domain Error Types

use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    #[error("Queue closed")]
    Closed,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Queue full")]
    Full,

    #[error("Queue empty")]
    Empty,
}

impl QueueError {
    /// `Closed` marks end-of-life, not a failure
    pub fn is_closed(&self) -> bool {
        matches!(self, QueueError::Closed)
    }
}

/// A put that did not go through. The payload is handed back untouched.
pub struct PutRejected<T> {
    error: QueueError,
    payload: T,
}

impl<T> PutRejected<T> {
    pub(crate) fn new(error: QueueError, payload: T) -> Self {
        Self { error, payload }
    }

    pub fn error(&self) -> &QueueError {
        &self.error
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T> From<PutRejected<T>> for QueueError {
    fn from(rejected: PutRejected<T>) -> Self {
        rejected.error
    }
}

// Debug without requiring `T: Debug`
impl<T> fmt::Debug for PutRejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutRejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for PutRejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "put rejected: {}", self.error)
    }
}

impl<T> std::error::Error for PutRejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

pub type Result<T> = std::result::Result<T, QueueError>;
