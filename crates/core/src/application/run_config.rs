// Run configuration

use crate::application::worker::constants::*;
use crate::application::worker::Pacing;
use crate::domain::Priority;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything the coordinator needs to stage one run
///
/// Missing fields fall back to the defaults below, so a partial file or
/// environment is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Maximum items resident in the queue at once
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    /// Units each producer puts before it stops
    pub items_per_producer: usize,
    /// Units each consumer takes before it stops; `None` drains until closed
    pub items_per_consumer: Option<usize>,
    /// Random pause between puts, lower bound
    pub produce_delay_min_ms: u64,
    /// Random pause between puts, upper bound (exclusive)
    pub produce_delay_max_ms: u64,
    /// Simulated processing time per consumed item
    pub consume_delay_ms: u64,
    /// Random priorities are drawn from `0..=max_priority`
    pub max_priority: Priority,
    /// Seed for priorities and pauses; `None` is non-deterministic
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            producers: DEFAULT_PRODUCERS,
            consumers: DEFAULT_CONSUMERS,
            items_per_producer: DEFAULT_UNITS_PER_WORKER,
            items_per_consumer: Some(DEFAULT_UNITS_PER_WORKER),
            produce_delay_min_ms: DEFAULT_PRODUCE_DELAY_MIN.as_millis() as u64,
            produce_delay_max_ms: DEFAULT_PRODUCE_DELAY_MAX.as_millis() as u64,
            consume_delay_ms: DEFAULT_CONSUME_DELAY.as_millis() as u64,
            max_priority: DEFAULT_MAX_PRIORITY,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Same topology, no pauses (tests and benchmarks)
    pub fn without_delays(mut self) -> Self {
        self.produce_delay_min_ms = 0;
        self.produce_delay_max_ms = 0;
        self.consume_delay_ms = 0;
        self
    }

    /// Check the configuration before any thread is started
    ///
    /// Capacity is checked by the queue itself (`QueueError::InvalidCapacity`).
    pub fn validate(&self) -> Result<()> {
        if self.produce_delay_min_ms > self.produce_delay_max_ms {
            return Err(AppError::Validation(format!(
                "produce delay range is inverted: min {}ms > max {}ms",
                self.produce_delay_min_ms, self.produce_delay_max_ms
            )));
        }
        if self.max_priority < 0 {
            return Err(AppError::Validation(format!(
                "max_priority must not be negative (got {})",
                self.max_priority
            )));
        }
        Ok(())
    }

    pub fn producer_pacing(&self) -> Pacing {
        Pacing::between(
            Duration::from_millis(self.produce_delay_min_ms),
            Duration::from_millis(self.produce_delay_max_ms),
        )
    }

    pub fn consume_delay(&self) -> Duration {
        Duration::from_millis(self.consume_delay_ms)
    }

    /// Per-worker seed, so workers do not share a random stream
    pub fn worker_seed(&self, worker_index: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(worker_index as u64))
    }
}
