// Application Layer - Queue, workers and run coordination

pub mod blocking_queue;
pub mod coordinator;
pub mod run_config;
pub mod worker;

// Re-exports
pub use blocking_queue::PriorityBlockingQueue;
pub use coordinator::{RunCoordinator, RunReport};
pub use run_config::RunConfig;
pub use worker::{Consumer, Pacing, Producer, WorkerReport, WorkerRole};
