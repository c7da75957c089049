// Command-line interface

use clap::{Parser, ValueEnum};
use prioq_core::application::RunConfig;
use prioq_core::domain::Priority;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "prioq")]
#[command(about = "Run producers and consumers over a bounded priority queue", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML file with run settings
    #[arg(short, long, env = "PRIOQ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum items resident in the queue
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Number of producer threads
    #[arg(short, long)]
    pub producers: Option<usize>,

    /// Number of consumer threads
    #[arg(short = 'C', long)]
    pub consumers: Option<usize>,

    /// Units each producer puts
    #[arg(long)]
    pub items_per_producer: Option<usize>,

    /// Units each consumer takes
    #[arg(long, conflicts_with = "drain")]
    pub items_per_consumer: Option<usize>,

    /// Consumers take until the queue is closed and empty
    #[arg(long)]
    pub drain: bool,

    /// Highest random priority (priorities are drawn from 0..=N)
    #[arg(long)]
    pub max_priority: Option<Priority>,

    /// Seed for priorities and producer pauses
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip producer pauses and consumer processing time
    #[arg(long)]
    pub no_delay: bool,

    /// Log output format
    #[arg(long, env = "PRIOQ_LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Run report format
    #[arg(long, value_enum, default_value = "text")]
    pub report: ReportFormat,
}

impl Cli {
    /// Command-line flags win over file and environment settings
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(producers) = self.producers {
            config.producers = producers;
        }
        if let Some(consumers) = self.consumers {
            config.consumers = consumers;
        }
        if let Some(units) = self.items_per_producer {
            config.items_per_producer = units;
        }
        if self.drain {
            config.items_per_consumer = None;
        } else if let Some(units) = self.items_per_consumer {
            config.items_per_consumer = Some(units);
        }
        if let Some(max_priority) = self.max_priority {
            config.max_priority = max_priority;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_delay {
            *config = config.clone().without_delays();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("prioq").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = parse(&[]);
        let mut config = RunConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, RunConfig::default());
        assert_eq!(cli.report, ReportFormat::Text);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "--capacity", "8", "-p", "3", "-C", "4", "--items-per-producer", "10",
            "--seed", "42", "--no-delay",
        ]);
        let mut config = RunConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.capacity, 8);
        assert_eq!(config.producers, 3);
        assert_eq!(config.consumers, 4);
        assert_eq!(config.items_per_producer, 10);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.consume_delay_ms, 0);
    }

    #[test]
    fn test_drain_clears_consumer_limit() {
        let cli = parse(&["--drain"]);
        let mut config = RunConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.items_per_consumer, None);
    }

    #[test]
    fn test_drain_conflicts_with_consumer_limit() {
        let result = Cli::try_parse_from(["prioq", "--drain", "--items-per-consumer", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_format_json() {
        assert_eq!(parse(&["--report", "json"]).report, ReportFormat::Json);
        assert!(Cli::try_parse_from(["prioq", "--report", "xml"]).is_err());
    }
}
