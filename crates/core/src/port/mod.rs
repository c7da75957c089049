// Port Layer - Interfaces for injected collaborators

pub mod id_provider; // For deterministic testing
pub mod time_provider;
pub mod work_error;
pub mod work_sink;
pub mod work_source;

// Re-exports
pub use id_provider::{IdProvider, UuidProvider};
pub use time_provider::{SystemTimeProvider, TimeProvider};
pub use work_error::WorkError;
pub use work_sink::{LoggingSink, WorkSink};
pub use work_source::{RandomWorkSource, WorkSource};
