// Worker constants (no magic values)
use std::time::Duration;

/// Default queue capacity (small, so blocking is visible)
pub const DEFAULT_CAPACITY: usize = 3;

/// Default number of producer workers
pub const DEFAULT_PRODUCERS: usize = 2;

/// Default number of consumer workers
pub const DEFAULT_CONSUMERS: usize = 2;

/// Default units of work per worker
pub const DEFAULT_UNITS_PER_WORKER: usize = 5;

/// Lower bound of the random pause between two puts (100ms)
pub const DEFAULT_PRODUCE_DELAY_MIN: Duration = Duration::from_millis(100);

/// Upper bound (exclusive) of the random pause between two puts (600ms)
pub const DEFAULT_PRODUCE_DELAY_MAX: Duration = Duration::from_millis(600);

/// Simulated processing time per consumed item (600ms)
pub const DEFAULT_CONSUME_DELAY: Duration = Duration::from_millis(600);

/// Highest priority the random work source emits (range is 0..=9)
pub const DEFAULT_MAX_PRIORITY: i32 = 9;

/// Producer thread names: Producer1, Producer2, ...
pub const PRODUCER_NAME_PREFIX: &str = "Producer";

/// Consumer thread names: Consumer1, Consumer2, ...
pub const CONSUMER_NAME_PREFIX: &str = "Consumer";
