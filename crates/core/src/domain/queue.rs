// Queue Domain Model

use serde::{Deserialize, Serialize};

/// Observable lifecycle state of a queue
///
/// State transitions:
/// - successful put: towards `OpenFull`
/// - successful take: towards `OpenEmpty`
/// - close: any open state -> `Closed` (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueState {
    OpenEmpty,
    OpenNonEmpty,
    OpenFull,
    Closed,
}

impl QueueState {
    /// Derive the state from a snapshot taken inside the critical section
    pub fn from_snapshot(len: usize, capacity: usize, closed: bool) -> Self {
        if closed {
            QueueState::Closed
        } else if len == 0 {
            QueueState::OpenEmpty
        } else if len >= capacity {
            QueueState::OpenFull
        } else {
            QueueState::OpenNonEmpty
        }
    }
}

impl std::fmt::Display for QueueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueState::OpenEmpty => write!(f, "OPEN_EMPTY"),
            QueueState::OpenNonEmpty => write!(f, "OPEN_NON_EMPTY"),
            QueueState::OpenFull => write!(f, "OPEN_FULL"),
            QueueState::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Cumulative counters for one queue instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Items accepted by put
    pub put: u64,
    /// Items handed out by take
    pub taken: u64,
    /// Times a producer had to wait for free capacity
    pub producer_waits: u64,
    /// Times a consumer had to wait for an item
    pub consumer_waits: u64,
}

impl QueueStats {
    /// Items accepted but not yet taken
    pub fn in_flight(&self) -> u64 {
        self.put - self.taken
    }
}
