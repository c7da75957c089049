// Run report rendering

use colored::Colorize;
use prioq_core::application::{RunReport, WorkerRole};
use std::fmt::Write;

/// Human-readable summary, one line per worker
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Simulation completed.".green().bold());
    let _ = writeln!(out, "  {} {}", "run:".bold(), report.run_id);
    let _ = writeln!(
        out,
        "  {} {} produced, {} consumed, {} left in queue ({} ms)",
        "items:".bold(),
        report.produced,
        report.consumed,
        report.left_in_queue,
        report.elapsed_ms()
    );
    let _ = writeln!(
        out,
        "  {} {} producer waits, {} consumer waits",
        "backpressure:".bold(),
        report.queue_stats.producer_waits,
        report.queue_stats.consumer_waits
    );

    for worker in &report.workers {
        let role = match worker.role {
            WorkerRole::Producer => worker.role.to_string().cyan(),
            WorkerRole::Consumer => worker.role.to_string().magenta(),
        };
        let status = if worker.stopped_by_close {
            "stopped by close".yellow()
        } else {
            "done".green()
        };
        let _ = writeln!(
            out,
            "  {:<8} {:<12} {:>4} items  {}",
            role, worker.name, worker.completed, status
        );
    }
    out
}
