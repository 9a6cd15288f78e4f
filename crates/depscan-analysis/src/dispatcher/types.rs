//! Dispatcher work and result types.

use std::path::PathBuf;
use std::time::Duration;

use depscan_core::config::PerformanceConfig;
use depscan_core::errors::PipelineError;

use crate::extractors::ExtractedDependency;
use crate::incremental::FileState;
use crate::scanner::language_detect::Language;

/// One file to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub id: u64,
    pub path: PathBuf,
    pub language: Language,
}

/// What a processor produced for one file.
#[derive(Debug, Clone, Default)]
pub struct ProcessedFile {
    pub dependencies: Vec<ExtractedDependency>,
    /// A previous result was reused without extraction.
    pub reused: bool,
    /// Set by incremental processing.
    pub state: Option<FileState>,
}

#[derive(Debug)]
pub struct ProcessingResult {
    pub id: u64,
    pub path: PathBuf,
    pub language: Language,
    pub outcome: Result<ProcessedFile, PipelineError>,
    pub elapsed: Duration,
    pub worker: usize,
}

impl ProcessingResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub threads: usize,
    pub queue_capacity: usize,
}

impl DispatcherConfig {
    pub fn from_config(config: &PerformanceConfig) -> Self {
        Self {
            threads: config.effective_threads(),
            queue_capacity: config.effective_queue_capacity(),
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::from_config(&PerformanceConfig::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    pub workers: usize,
    /// Items accepted by `submit`.
    pub queued: u64,
    /// Items finished, failed ones included.
    pub processed: u64,
    pub failed: u64,
    /// Items submitted but not yet finished.
    pub pending: usize,
    /// Sum of per-item processing time across workers.
    pub busy: Duration,
}
