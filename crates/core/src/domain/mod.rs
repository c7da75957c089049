// Domain Layer - Pure data types and ordering rules (no threads, no I/O)

pub mod error;
pub mod item;
pub mod queue;
pub mod ready_set;

// Re-exports
pub use error::{PutRejected, QueueError};
pub use item::{Item, Priority, Sequence, WorkUnit};
pub use queue::{QueueState, QueueStats};
pub use ready_set::ReadySet;
