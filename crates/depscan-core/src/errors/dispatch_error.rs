//! Parallel dispatcher errors.

use super::error_code::{self, DepscanErrorCode};

/// Errors from the work queue and worker pool.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid thread count {requested} (must be between 1 and {max})")]
    InvalidThreadCount { requested: usize, max: usize },

    #[error("Work queue full after waiting {waited_ms}ms")]
    QueueFull { waited_ms: u64 },

    #[error("Dispatcher is shut down")]
    ShutDown,

    #[error("Dispatcher already started")]
    AlreadyStarted,

    #[error("Failed to spawn worker {worker}: {message}")]
    SpawnFailed { worker: usize, message: String },
}

impl DepscanErrorCode for DispatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::QueueFull { .. } => error_code::QUEUE_FULL,
            _ => error_code::DISPATCH_ERROR,
        }
    }
}
