// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Queue error: {0}")]
    Queue(#[from] crate::domain::QueueError),

    #[error("Work error: {0}")]
    Work(#[from] crate::port::WorkError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Worker {worker} failed: {source}")]
    Worker {
        worker: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Attribute an error to the worker that raised it
    pub fn in_worker(self, worker: impl Into<String>) -> Self {
        AppError::Worker {
            worker: worker.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
