// Run Coordinator - owns the queue and every worker thread of one run

use crate::application::run_config::RunConfig;
use crate::application::worker::constants::{CONSUMER_NAME_PREFIX, PRODUCER_NAME_PREFIX};
use crate::application::worker::{panic_message, Consumer, Producer, WorkerReport, WorkerRole};
use crate::application::PriorityBlockingQueue;
use crate::domain::QueueStats;
use crate::error::{AppError, Result};
use crate::port::{IdProvider, SystemTimeProvider, TimeProvider, UuidProvider, WorkSink, WorkSource};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, info_span, Span};

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: i64,  // epoch ms
    pub finished_at: i64, // epoch ms
    pub workers: Vec<WorkerReport>,
    pub produced: usize,
    pub consumed: usize,
    /// Accepted items nobody took before the run ended
    pub left_in_queue: usize,
    pub queue_stats: QueueStats,
}

impl RunReport {
    pub fn elapsed_ms(&self) -> i64 {
        self.finished_at - self.started_at
    }

    pub fn workers_with_role(&self, role: WorkerRole) -> impl Iterator<Item = &WorkerReport> {
        self.workers.iter().filter(move |w| w.role == role)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Live-member count of one worker group.
///
/// When the last member exits (normally, with an error, or by panicking),
/// the queue is closed: no producers left means consumers should drain and
/// stop, no consumers left means blocked producers should stop.
struct WorkerGroup<T> {
    role: WorkerRole,
    remaining: AtomicUsize,
    queue: Arc<PriorityBlockingQueue<T>>,
}

impl<T> WorkerGroup<T> {
    fn new(role: WorkerRole, size: usize, queue: Arc<PriorityBlockingQueue<T>>) -> Arc<Self> {
        if size == 0 {
            info!(role = %role, "Empty worker group, closing queue up front");
            queue.close();
        }
        Arc::new(Self {
            role,
            remaining: AtomicUsize::new(size),
            queue,
        })
    }

    fn member(self: &Arc<Self>) -> GroupMember<T> {
        GroupMember(Arc::clone(self))
    }
}

/// Held by a worker thread for its whole lifetime
struct GroupMember<T>(Arc<WorkerGroup<T>>);

impl<T> Drop for GroupMember<T> {
    fn drop(&mut self) {
        let group = &self.0;
        if group.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            info!(role = %group.role, "Last worker of group exited, closing queue");
            group.queue.close();
        }
    }
}

/// Closes the queue unless the spawn phase completes.
///
/// Covers an early `?` return and a panic in a caller-supplied factory, so
/// already-running workers are never left waiting on an open queue.
struct SpawnGuard<'a, T> {
    queue: &'a PriorityBlockingQueue<T>,
    armed: bool,
}

impl<'a, T> SpawnGuard<'a, T> {
    fn new(queue: &'a PriorityBlockingQueue<T>) -> Self {
        Self { queue, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<T> Drop for SpawnGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            error!("Spawn phase aborted, closing queue");
            self.queue.close();
        }
    }
}

type WorkerHandle = (String, JoinHandle<Result<WorkerReport>>);

/// Creates the shared queue, runs producers and consumers on their own
/// threads, and joins all of them.
pub struct RunCoordinator<T> {
    config: RunConfig,
    queue: Arc<PriorityBlockingQueue<T>>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl<T: Send + 'static> RunCoordinator<T> {
    /// # Errors
    /// - `AppError::Validation` for an inconsistent configuration
    /// - `AppError::Queue(InvalidCapacity)` for capacity 0
    pub fn new(config: RunConfig) -> Result<Self> {
        Self::with_providers(config, Arc::new(UuidProvider), Arc::new(SystemTimeProvider))
    }

    pub fn with_providers(
        config: RunConfig,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<Self> {
        config.validate()?;
        let queue = Arc::new(PriorityBlockingQueue::new(config.capacity)?);
        Ok(Self {
            config,
            queue,
            id_provider,
            time_provider,
        })
    }

    /// Handle to the run's queue (e.g. to `close()` it on interrupt)
    pub fn queue(&self) -> Arc<PriorityBlockingQueue<T>> {
        Arc::clone(&self.queue)
    }

    /// Run every worker to completion.
    ///
    /// `make_source` is called once per producer with its index and name.
    /// Blocks the calling thread until all workers have terminated.
    ///
    /// # Errors
    /// The first worker failure (`AppError::Worker`) or panic
    /// (`AppError::WorkerPanicked`), reported after every worker was joined.
    pub fn run<F>(self, mut make_source: F, sink: Arc<dyn WorkSink<T>>) -> Result<RunReport>
    where
        F: FnMut(usize, &str) -> Box<dyn WorkSource<T>>,
    {
        let run_id = self.id_provider.next_run_id();
        let span = info_span!("run", run_id = %run_id);
        let _enter = span.enter();

        let started_at = self.time_provider.now_millis();
        info!(
            capacity = self.config.capacity,
            producers = self.config.producers,
            consumers = self.config.consumers,
            "Starting run"
        );

        let mut handles: Vec<WorkerHandle> = Vec::new();
        let spawned = self.spawn_workers(&mut handles, &mut make_source, sink, &span);

        let mut first_failure = None;
        if let Err(e) = spawned {
            error!(error = %e, "Failed to start workers");
            first_failure = Some(e);
        }

        let mut workers = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            match handle.join() {
                Ok(Ok(report)) => workers.push(report),
                Ok(Err(e)) => {
                    error!(worker = %name, error = %e, "Worker failed");
                    if first_failure.is_none() {
                        first_failure = Some(e.in_worker(name));
                    }
                }
                Err(payload) => {
                    let panic_msg = panic_message(payload.as_ref());
                    error!(worker = %name, panic_msg = %panic_msg, "Worker panicked");
                    if first_failure.is_none() {
                        first_failure = Some(AppError::WorkerPanicked(name));
                    }
                }
            }
        }

        if let Some(e) = first_failure {
            return Err(e);
        }

        let produced = workers
            .iter()
            .filter(|w| w.role == WorkerRole::Producer)
            .map(|w| w.completed)
            .sum();
        let consumed = workers
            .iter()
            .filter(|w| w.role == WorkerRole::Consumer)
            .map(|w| w.completed)
            .sum();

        let report = RunReport {
            run_id,
            started_at,
            finished_at: self.time_provider.now_millis(),
            workers,
            produced,
            consumed,
            left_in_queue: self.queue.len(),
            queue_stats: self.queue.stats(),
        };
        info!(
            produced = report.produced,
            consumed = report.consumed,
            left_in_queue = report.left_in_queue,
            elapsed_ms = report.elapsed_ms(),
            "Run completed"
        );
        Ok(report)
    }

    fn spawn_workers<F>(
        &self,
        handles: &mut Vec<WorkerHandle>,
        make_source: &mut F,
        sink: Arc<dyn WorkSink<T>>,
        run_span: &Span,
    ) -> Result<()>
    where
        F: FnMut(usize, &str) -> Box<dyn WorkSource<T>>,
    {
        let guard = SpawnGuard::new(&self.queue);
        let producers = WorkerGroup::new(
            WorkerRole::Producer,
            self.config.producers,
            Arc::clone(&self.queue),
        );
        let consumers = WorkerGroup::new(
            WorkerRole::Consumer,
            self.config.consumers,
            Arc::clone(&self.queue),
        );

        // Consumers first, so early puts find someone waiting
        for index in 0..self.config.consumers {
            let name = format!("{}{}", CONSUMER_NAME_PREFIX, index + 1);
            let consumer = Consumer::new(
                name.clone(),
                Arc::clone(&self.queue),
                Arc::clone(&sink),
                self.config.items_per_consumer,
            )
            .with_processing_delay(self.config.consume_delay());
            let member = consumers.member();
            let span = info_span!(parent: run_span, "consumer", worker = %name);

            let handle = thread::Builder::new().name(name.clone()).spawn(move || {
                let _member = member;
                let _enter = span.enter();
                consumer.run()
            })?;
            handles.push((name, handle));
        }

        for index in 0..self.config.producers {
            let name = format!("{}{}", PRODUCER_NAME_PREFIX, index + 1);
            let source = make_source(index, &name);
            let producer = Producer::new(
                name.clone(),
                Arc::clone(&self.queue),
                source,
                self.config.items_per_producer,
            )
            .with_pacing(
                self.config.producer_pacing(),
                self.config.worker_seed(index),
            );
            let member = producers.member();
            let span = info_span!(parent: run_span, "producer", worker = %name);

            let handle = thread::Builder::new().name(name.clone()).spawn(move || {
                let _member = member;
                let _enter = span.enter();
                producer.run()
            })?;
            handles.push((name, handle));
        }

        guard.disarm();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QueueError, WorkUnit};
    use crate::port::id_provider::mocks::SequentialIdProvider;
    use crate::port::time_provider::mocks::SteppingTimeProvider;
    use crate::port::work_sink::mocks::RecordingSink;
    use crate::port::work_source::mocks::ScriptedSource;
    use std::panic::{self, AssertUnwindSafe};
    use std::time::{Duration, Instant};

    fn coordinator(config: RunConfig) -> RunCoordinator<u32> {
        RunCoordinator::with_providers(
            config,
            Arc::new(SequentialIdProvider::default()),
            Arc::new(SteppingTimeProvider::new(10_000, 500)),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = RunConfig {
            capacity: 0,
            ..Default::default()
        };
        let err = RunCoordinator::<u32>::new(config).err().unwrap();
        assert!(matches!(err, AppError::Queue(QueueError::InvalidCapacity(0))));
    }

    #[test]
    fn test_report_carries_injected_id_and_times() {
        let config = RunConfig {
            producers: 1,
            consumers: 1,
            items_per_producer: 3,
            items_per_consumer: None,
            ..Default::default()
        }
        .without_delays();
        let sink = Arc::new(RecordingSink::<u32>::new());

        let report = coordinator(config)
            .run(
                |_, _| Box::new(ScriptedSource::new((0..3).map(|i| WorkUnit::new(1, i)))),
                sink.clone(),
            )
            .unwrap();

        assert_eq!(report.run_id, "run-1");
        assert_eq!(report.started_at, 10_000);
        assert_eq!(report.elapsed_ms(), 500);
        assert_eq!(report.produced, 3);
        assert_eq!(report.consumed, 3);
        assert_eq!(report.left_in_queue, 0);
        assert_eq!(report.queue_stats.put, 3);
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_worker_names_follow_roles() {
        let config = RunConfig {
            producers: 2,
            consumers: 3,
            items_per_producer: 1,
            items_per_consumer: None,
            ..Default::default()
        }
        .without_delays();

        let report = coordinator(config)
            .run(
                |i, _| Box::new(ScriptedSource::new([WorkUnit::new(0, i as u32)])),
                Arc::new(RecordingSink::<u32>::new()),
            )
            .unwrap();

        let mut producers: Vec<_> = report
            .workers_with_role(WorkerRole::Producer)
            .map(|w| w.name.as_str())
            .collect();
        producers.sort();
        assert_eq!(producers, vec!["Producer1", "Producer2"]);
        assert_eq!(report.workers_with_role(WorkerRole::Consumer).count(), 3);
    }

    /// A source factory that panics mid-spawn still closes the queue, so the
    /// consumers already running drain and exit.
    #[test]
    fn test_panicking_source_factory_closes_queue() {
        let config = RunConfig {
            producers: 2,
            consumers: 2,
            items_per_consumer: None,
            ..Default::default()
        }
        .without_delays();
        let coordinator = coordinator(config);
        let queue = coordinator.queue();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            coordinator.run(
                |index, _| -> Box<dyn WorkSource<u32>> {
                    if index == 1 {
                        panic!("source factory failed");
                    }
                    Box::new(ScriptedSource::new((0..3).map(|i| WorkUnit::new(0, i))))
                },
                Arc::new(RecordingSink::<u32>::new()),
            )
        }));

        assert!(outcome.is_err());
        assert!(queue.is_closed());

        // Workers drop their queue handles once they exit
        let deadline = Instant::now() + Duration::from_secs(5);
        while Arc::strong_count(&queue) > 1 {
            assert!(Instant::now() < deadline, "workers still running");
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_report_serializes_to_json() {
        let config = RunConfig {
            producers: 0,
            consumers: 1,
            ..Default::default()
        }
        .without_delays();

        let report = coordinator(config)
            .run(
                |_, _| Box::new(ScriptedSource::<u32>::new([])),
                Arc::new(RecordingSink::<u32>::new()),
            )
            .unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"run_id\": \"run-1\""));
        assert!(json.contains("\"CONSUMER\""));
    }
}
