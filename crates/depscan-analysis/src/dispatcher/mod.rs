//! Parallel dispatch: bounded work queue, worker pool, result channel.

pub mod pool;
pub mod processor;
pub mod queue;
pub mod types;

pub use pool::ParallelDispatcher;
pub use processor::{ExtractionProcessor, IncrementalProcessor, WorkProcessor};
pub use queue::WorkQueue;
pub use types::{
    DispatcherConfig, DispatcherStats, ProcessedFile, ProcessingResult, WorkItem,
};
