//! prioq runner - configuration loading, logging setup and run driving
//! The binary in main.rs is a thin shell over these modules.

pub mod cli;
pub mod driver;
pub mod report;
pub mod settings;
pub mod telemetry;

pub use cli::{Cli, LogFormat, ReportFormat};
pub use driver::drive;
pub use settings::load_run_config;
