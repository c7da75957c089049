// Tracing subscriber setup

use crate::cli::LogFormat;
use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "prioq_core=info,prioq_runner=info,prioq=info";

/// Install the global subscriber (`RUST_LOG` overrides the default filter)
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_current_span(true))
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Pretty => {
            // Development: colored, with thread names for the worker threads
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_thread_names(true))
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }
    Ok(())
}
