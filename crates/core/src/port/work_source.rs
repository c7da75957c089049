// Work Source Port
// Supplies (priority, payload) pairs to producers

use super::work_error::WorkError;
use crate::domain::{Priority, WorkUnit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator of work units, owned by exactly one producer
///
/// Implementations:
/// - RandomWorkSource: random priorities, named payloads
/// - mocks::ScriptedSource: fixed list (tests)
pub trait WorkSource<T>: Send {
    /// Produce the `index`-th unit of work for `producer`
    ///
    /// # Errors
    /// Any error stops the producer and is reported by the coordinator.
    fn next_unit(&mut self, producer: &str, index: usize) -> Result<WorkUnit<T>, WorkError>;
}

/// Random priorities in `0..=max_priority`, payloads named `{producer}_item_{index}`
pub struct RandomWorkSource {
    rng: StdRng,
    max_priority: Priority,
}

impl RandomWorkSource {
    /// Seeded sources are reproducible; `None` draws from OS entropy
    pub fn new(max_priority: Priority, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            max_priority: max_priority.max(0),
        }
    }
}

impl WorkSource<String> for RandomWorkSource {
    fn next_unit(&mut self, producer: &str, index: usize) -> Result<WorkUnit<String>, WorkError> {
        let priority = self.rng.gen_range(0..=self.max_priority);
        Ok(WorkUnit::new(priority, format!("{}_item_{}", producer, index)))
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;

    /// Hands out a fixed list of units, then reports `Exhausted`
    pub struct ScriptedSource<T> {
        units: VecDeque<WorkUnit<T>>,
        handed_out: usize,
    }

    impl<T> ScriptedSource<T> {
        pub fn new(units: impl IntoIterator<Item = WorkUnit<T>>) -> Self {
            Self {
                units: units.into_iter().collect(),
                handed_out: 0,
            }
        }
    }

    impl<T: Send> WorkSource<T> for ScriptedSource<T> {
        fn next_unit(&mut self, _producer: &str, _index: usize) -> Result<WorkUnit<T>, WorkError> {
            let unit = self
                .units
                .pop_front()
                .ok_or(WorkError::Exhausted(self.handed_out))?;
            self.handed_out += 1;
            Ok(unit)
        }
    }

    /// Same priority for every unit, payload `(producer, index)`
    pub struct ConstantPrioritySource {
        priority: Priority,
    }

    impl ConstantPrioritySource {
        pub fn new(priority: Priority) -> Self {
            Self { priority }
        }
    }

    impl WorkSource<(String, usize)> for ConstantPrioritySource {
        fn next_unit(
            &mut self,
            producer: &str,
            index: usize,
        ) -> Result<WorkUnit<(String, usize)>, WorkError> {
            Ok(WorkUnit::new(self.priority, (producer.to_string(), index)))
        }
    }

    /// Succeeds `fail_at` times, then fails with `WorkError::Source`
    pub struct FailingSource {
        fail_at: usize,
    }

    impl FailingSource {
        pub fn new(fail_at: usize) -> Self {
            Self { fail_at }
        }
    }

    impl WorkSource<String> for FailingSource {
        fn next_unit(&mut self, producer: &str, index: usize) -> Result<WorkUnit<String>, WorkError> {
            if index >= self.fail_at {
                return Err(WorkError::Source(format!(
                    "{} could not build unit {}",
                    producer, index
                )));
            }
            Ok(WorkUnit::new(0, format!("{}_item_{}", producer, index)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::*;
    use super::*;

    #[test]
    fn test_random_source_names_payloads() {
        let mut source = RandomWorkSource::new(9, Some(7));
        let unit = source.next_unit("Producer1", 3).unwrap();
        assert_eq!(unit.payload, "Producer1_item_3");
        assert!((0..=9).contains(&unit.priority));
    }

    #[test]
    fn test_random_source_is_reproducible_with_seed() {
        let mut a = RandomWorkSource::new(9, Some(42));
        let mut b = RandomWorkSource::new(9, Some(42));
        let pa: Vec<_> = (0..16).map(|i| a.next_unit("p", i).unwrap().priority).collect();
        let pb: Vec<_> = (0..16).map(|i| b.next_unit("p", i).unwrap().priority).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_random_source_zero_max_priority() {
        let mut source = RandomWorkSource::new(0, None);
        for i in 0..10 {
            assert_eq!(source.next_unit("p", i).unwrap().priority, 0);
        }
    }

    #[test]
    fn test_scripted_source_exhausts() {
        let mut source = ScriptedSource::new(vec![WorkUnit::new(1, 'a'), WorkUnit::new(2, 'b')]);
        assert_eq!(source.next_unit("p", 0).unwrap(), WorkUnit::new(1, 'a'));
        assert_eq!(source.next_unit("p", 1).unwrap(), WorkUnit::new(2, 'b'));
        assert_eq!(source.next_unit("p", 2).unwrap_err(), WorkError::Exhausted(2));
    }

    #[test]
    fn test_failing_source() {
        let mut source = FailingSource::new(1);
        assert!(source.next_unit("p", 0).is_ok());
        assert!(matches!(source.next_unit("p", 1), Err(WorkError::Source(_))));
    }
}
