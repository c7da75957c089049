// Worker - Producer and consumer loops over a shared queue

pub mod constants;
mod consumer;
mod panic_guard;
mod producer;

pub use consumer::Consumer;
pub use panic_guard::panic_message;
pub use producer::Producer;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which side of the queue a worker drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerRole {
    Producer,
    Consumer,
}

impl std::fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerRole::Producer => write!(f, "PRODUCER"),
            WorkerRole::Consumer => write!(f, "CONSUMER"),
        }
    }
}

/// Outcome of one worker's loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub name: String,
    pub role: WorkerRole,
    /// Units put (producer) or taken and sunk (consumer)
    pub completed: usize,
    /// The loop ended early because the queue was closed
    pub stopped_by_close: bool,
}

impl WorkerReport {
    pub fn new(name: impl Into<String>, role: WorkerRole) -> Self {
        Self {
            name: name.into(),
            role,
            completed: 0,
            stopped_by_close: false,
        }
    }
}

/// Pause a producer takes between two puts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    Immediate,
    Fixed(Duration),
    /// Uniform in `[min, max)`
    Uniform { min: Duration, max: Duration },
}

impl Pacing {
    /// Normalize a `[min, max)` range: empty range is `Fixed`, zero is `Immediate`
    pub fn between(min: Duration, max: Duration) -> Self {
        if max.is_zero() {
            Pacing::Immediate
        } else if min >= max {
            Pacing::Fixed(max)
        } else {
            Pacing::Uniform { min, max }
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Duration> {
        match *self {
            Pacing::Immediate => None,
            Pacing::Fixed(pause) => Some(pause),
            Pacing::Uniform { min, max } if min >= max => Some(min),
            Pacing::Uniform { min, max } => Some(rng.gen_range(min..max)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pacing_between_normalizes() {
        assert_eq!(Pacing::between(Duration::ZERO, Duration::ZERO), Pacing::Immediate);
        assert_eq!(
            Pacing::between(Duration::from_millis(50), Duration::from_millis(50)),
            Pacing::Fixed(Duration::from_millis(50))
        );
        assert!(matches!(
            Pacing::between(Duration::from_millis(100), Duration::from_millis(600)),
            Pacing::Uniform { .. }
        ));
    }

    #[test]
    fn test_uniform_pacing_stays_in_range() {
        let min = Duration::from_millis(100);
        let max = Duration::from_millis(600);
        let pacing = Pacing::between(min, max);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let pause = pacing.sample(&mut rng).unwrap();
            assert!(pause >= min && pause < max, "{:?} out of range", pause);
        }
    }

    #[test]
    fn test_uniform_pacing_with_huge_bounds() {
        let min = Duration::from_millis(u64::MAX - 1_000);
        let max = Duration::from_millis(u64::MAX);
        let pacing = Pacing::between(min, max);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let pause = pacing.sample(&mut rng).unwrap();
            assert!(pause >= min && pause < max, "{:?} out of range", pause);
        }
    }

    #[test]
    fn test_immediate_pacing_never_sleeps() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Pacing::Immediate.sample(&mut rng), None);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(WorkerRole::Producer.to_string(), "PRODUCER");
        assert_eq!(WorkerRole::Consumer.to_string(), "CONSUMER");
    }
}
