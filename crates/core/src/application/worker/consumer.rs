// Consumer - takes items off the queue and hands them to a sink

use super::{WorkerReport, WorkerRole};
use crate::application::PriorityBlockingQueue;
use crate::domain::QueueError;
use crate::error::Result;
use crate::port::WorkSink;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Consumer worker
///
/// `units: None` drains until the queue is closed and empty.
pub struct Consumer<T> {
    name: String,
    queue: Arc<PriorityBlockingQueue<T>>,
    sink: Arc<dyn WorkSink<T>>,
    units: Option<usize>,
    processing_delay: Duration,
}

impl<T> Consumer<T> {
    pub fn new(
        name: impl Into<String>,
        queue: Arc<PriorityBlockingQueue<T>>,
        sink: Arc<dyn WorkSink<T>>,
        units: Option<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            sink,
            units,
            processing_delay: Duration::ZERO,
        }
    }

    /// Simulated processing time after each item
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Run until `units` items were handled or the queue is closed and empty
    ///
    /// # Errors
    /// Sink failures are returned as-is; `QueueError::Closed` is not an error.
    pub fn run(self) -> Result<WorkerReport> {
        info!(worker = %self.name, units = ?self.units, "Consumer started");
        let mut report = WorkerReport::new(self.name.clone(), WorkerRole::Consumer);

        while self.units.map_or(true, |limit| report.completed < limit) {
            let item = match self.queue.take() {
                Ok(item) => item,
                Err(QueueError::Closed) => {
                    info!(
                        worker = %self.name,
                        completed = report.completed,
                        "Queue closed and drained, consumer stopping"
                    );
                    report.stopped_by_close = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            debug!(
                worker = %self.name,
                priority = item.priority(),
                sequence = item.sequence(),
                "Took item"
            );
            self.sink.accept(&self.name, item)?;
            report.completed += 1;

            if !self.processing_delay.is_zero() {
                thread::sleep(self.processing_delay);
            }
        }

        info!(worker = %self.name, completed = report.completed, "Consumer finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::work_sink::mocks::{BrokenSink, RecordingSink};
    use crate::port::WorkError;

    #[test]
    fn test_bounded_consumer_takes_in_priority_order() {
        let queue = Arc::new(PriorityBlockingQueue::new(5).unwrap());
        for (priority, payload) in [(1, "a"), (7, "b"), (4, "c"), (7, "d")] {
            queue.put(priority, payload).unwrap();
        }
        let sink = Arc::new(RecordingSink::<&str>::new());
        let consumer = Consumer::new("Consumer1", Arc::clone(&queue), sink.clone(), Some(3));

        let report = consumer.run().unwrap();
        assert_eq!(report.completed, 3);
        assert!(!report.stopped_by_close);

        let payloads: Vec<_> = sink.deliveries().into_iter().map(|d| d.payload).collect();
        assert_eq!(payloads, vec!["b", "d", "c"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_draining_consumer_stops_on_close() {
        let queue = Arc::new(PriorityBlockingQueue::new(4).unwrap());
        queue.put(0, 1u32).unwrap();
        queue.put(0, 2u32).unwrap();
        queue.close();
        let sink = Arc::new(RecordingSink::<u32>::new());

        let report = Consumer::new("Consumer1", queue, sink.clone(), None)
            .run()
            .unwrap();
        assert_eq!(report.completed, 2);
        assert!(report.stopped_by_close);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_consumer_propagates_sink_failure() {
        let queue = Arc::new(PriorityBlockingQueue::new(2).unwrap());
        queue.put(3, "x").unwrap();
        let sink: Arc<dyn WorkSink<&str>> = Arc::new(BrokenSink::rejecting("nope"));

        let err = Consumer::new("Consumer1", queue, sink, Some(1))
            .run()
            .unwrap_err();
        assert!(matches!(err, AppError::Work(WorkError::Sink(_))));
    }
}
