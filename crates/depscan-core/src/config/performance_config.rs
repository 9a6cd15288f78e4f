//! Worker pool configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_QUEUE_CAPACITY, DEFAULT_THREAD_COUNT};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Run extraction on the worker pool instead of serially. Default: false.
    pub parallel: Option<bool>,
    /// Worker thread count. Default: 4.
    pub threads: Option<usize>,
    /// Bounded work queue capacity. Default: 1024.
    pub queue_capacity: Option<usize>,
}

impl PerformanceConfig {
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(false)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREAD_COUNT)
    }

    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY)
    }
}
