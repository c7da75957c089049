// Driver - runs the blocking coordinator off the async runtime

use anyhow::{Context, Result};
use prioq_core::application::{RunCoordinator, RunReport};
use prioq_core::port::{WorkSink, WorkSource};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Run the coordinator on the blocking pool until it finishes or `interrupt`
/// resolves.
///
/// On interrupt the queue is closed; workers observe `Closed`, wind down, and
/// the (partial) report is still returned.
pub async fn drive<T, F, I>(
    coordinator: RunCoordinator<T>,
    make_source: F,
    sink: Arc<dyn WorkSink<T>>,
    interrupt: I,
) -> Result<RunReport>
where
    T: Send + 'static,
    F: FnMut(usize, &str) -> Box<dyn WorkSource<T>> + Send + 'static,
    I: Future<Output = ()>,
{
    let queue = coordinator.queue();
    let mut run = tokio::task::spawn_blocking(move || coordinator.run(make_source, sink));
    tokio::pin!(interrupt);

    let joined = tokio::select! {
        joined = &mut run => joined,
        _ = &mut interrupt => {
            warn!("Interrupt received, closing queue");
            queue.close();
            run.await
        }
    };

    let report = joined
        .context("Coordinator task failed")?
        .context("Run failed")?;
    Ok(report)
}
