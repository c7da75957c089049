// prioq Core - Priority Blocking Queue, Workers & Coordination
// NO async runtime, NO config loading (those live in the runner)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
