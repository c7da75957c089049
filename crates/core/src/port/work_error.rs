// Collaborator errors (work sources and sinks)

use thiserror::Error;

/// Failure reported by an injected work source or sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    #[error("Work source exhausted after {0} units")]
    Exhausted(usize),

    #[error("Work source failed: {0}")]
    Source(String),

    #[error("Work sink rejected item: {0}")]
    Sink(String),
}
