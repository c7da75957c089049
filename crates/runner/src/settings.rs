// Settings loader: defaults <- TOML file <- PRIOQ_* environment

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use prioq_core::application::RunConfig;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const ENV_PREFIX: &str = "PRIOQ";

/// Load run settings
///
/// `env` replaces the process environment when given (tests).
pub fn load_run_config(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<RunConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        debug!(path = %path.display(), "Loading settings file");
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(env),
    );

    let config: RunConfig = builder
        .build()
        .context("Failed to read settings")?
        .try_deserialize()
        .context("Invalid settings")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_toml(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "prioq-settings-{}-{}.toml",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_run_config(None, Some(HashMap::new())).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = temp_toml("file", "capacity = 7\nconsumers = 1\nseed = 99\n");
        let config = load_run_config(Some(&path), Some(HashMap::new())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.capacity, 7);
        assert_eq!(config.consumers, 1);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.producers, 2);
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = temp_toml("env", "capacity = 7\n");
        let env = HashMap::from([
            ("PRIOQ_CAPACITY".to_string(), "12".to_string()),
            ("PRIOQ_ITEMS_PER_PRODUCER".to_string(), "20".to_string()),
        ]);
        let config = load_run_config(Some(&path), Some(env)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.capacity, 12);
        assert_eq!(config.items_per_producer, 20);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("prioq-settings-does-not-exist.toml");
        assert!(load_run_config(Some(&path), Some(HashMap::new())).is_err());
    }
}
