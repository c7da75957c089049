// Producer - pulls units from a work source and puts them on the queue

use super::{Pacing, WorkerReport, WorkerRole};
use crate::application::PriorityBlockingQueue;
use crate::domain::{QueueError, WorkUnit};
use crate::error::Result;
use crate::port::WorkSource;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Producer worker, bounded by a fixed number of units
pub struct Producer<T> {
    name: String,
    queue: Arc<PriorityBlockingQueue<T>>,
    source: Box<dyn WorkSource<T>>,
    units: usize,
    pacing: Pacing,
    rng: StdRng,
}

impl<T> Producer<T> {
    pub fn new(
        name: impl Into<String>,
        queue: Arc<PriorityBlockingQueue<T>>,
        source: Box<dyn WorkSource<T>>,
        units: usize,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            source,
            units,
            pacing: Pacing::Immediate,
            rng: StdRng::from_entropy(),
        }
    }

    /// Pause between puts; a seed makes the pauses reproducible
    pub fn with_pacing(mut self, pacing: Pacing, seed: Option<u64>) -> Self {
        self.pacing = pacing;
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self
    }

    /// Run until `units` puts succeeded or the queue closed
    ///
    /// # Errors
    /// Work source failures are returned as-is; `QueueError::Closed` is not an error.
    pub fn run(mut self) -> Result<WorkerReport> {
        info!(worker = %self.name, units = self.units, "Producer started");
        let mut report = WorkerReport::new(self.name.clone(), WorkerRole::Producer);

        for index in 0..self.units {
            let WorkUnit { priority, payload } = self.source.next_unit(&self.name, index)?;

            match self.queue.put(priority, payload) {
                Ok(sequence) => {
                    report.completed += 1;
                    debug!(worker = %self.name, priority, sequence, "Put accepted");
                }
                Err(rejected) if rejected.error().is_closed() => {
                    info!(
                        worker = %self.name,
                        completed = report.completed,
                        "Queue closed, producer stopping"
                    );
                    report.stopped_by_close = true;
                    break;
                }
                Err(rejected) => return Err(QueueError::from(rejected).into()),
            }

            if index + 1 < self.units {
                if let Some(pause) = self.pacing.sample(&mut self.rng) {
                    thread::sleep(pause);
                }
            }
        }

        info!(worker = %self.name, completed = report.completed, "Producer finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::work_source::mocks::{FailingSource, ScriptedSource};
    use crate::port::WorkError;
    use std::time::Duration;

    #[test]
    fn test_producer_puts_every_unit() {
        let queue = Arc::new(PriorityBlockingQueue::<i32>::new(10).unwrap());
        let source = ScriptedSource::new((0..4).map(|i| WorkUnit::new(i, i * 10)));
        let producer = Producer::new("Producer1", Arc::clone(&queue), Box::new(source), 4);

        let report = producer.run().unwrap();
        assert_eq!(report.completed, 4);
        assert!(!report.stopped_by_close);
        assert_eq!(queue.len(), 4);
        assert_eq!(queue.take().unwrap().into_payload(), 30);
    }

    #[test]
    fn test_producer_stops_quietly_on_closed_queue() {
        let queue = Arc::new(PriorityBlockingQueue::<String>::new(2).unwrap());
        queue.close();
        let producer = Producer::new("Producer1", queue, Box::new(FailingSource::new(10)), 3);

        let report = producer.run().unwrap();
        assert_eq!(report.completed, 0);
        assert!(report.stopped_by_close);
    }

    #[test]
    fn test_producer_propagates_source_failure() {
        let queue = Arc::new(PriorityBlockingQueue::<String>::new(8).unwrap());
        let producer = Producer::new(
            "Producer1",
            Arc::clone(&queue),
            Box::new(FailingSource::new(2)),
            5,
        );

        let err = producer.run().unwrap_err();
        assert!(matches!(err, AppError::Work(WorkError::Source(_))));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_fixed_pacing_sleeps_between_puts_only() {
        let queue = Arc::new(PriorityBlockingQueue::<i32>::new(8).unwrap());
        let source = ScriptedSource::new((0..3).map(|i| WorkUnit::new(0, i)));
        let pause = Duration::from_millis(30);
        let producer = Producer::new("Producer1", Arc::clone(&queue), Box::new(source), 3)
            .with_pacing(Pacing::Fixed(pause), Some(1));

        let start = std::time::Instant::now();
        producer.run().unwrap();
        assert!(start.elapsed() >= pause * 2);
    }
}
