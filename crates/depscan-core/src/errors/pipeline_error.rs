//! Pipeline errors and non-fatal error collection.

use super::error_code::{self, DepscanErrorCode};
use super::{
    CacheError, CallGraphError, ConfigError, DispatchError, ExtractError, PatternError,
    ScanError, StateError,
};

/// Errors that can occur during a crawl.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Call graph error: {0}")]
    CallGraph(#[from] CallGraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline cancelled")]
    Cancelled,
}

impl DepscanErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Pattern(e) => e.error_code(),
            Self::Extract(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            Self::Cache(e) => e.error_code(),
            Self::State(e) => e.error_code(),
            Self::Dispatch(e) => e.error_code(),
            Self::CallGraph(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some files fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
