//! Call graph errors.

use super::error_code::{self, DepscanErrorCode};

/// Errors that can occur while maintaining the method table.
#[derive(Debug, thiserror::Error)]
pub enum CallGraphError {
    #[error("Method table lock poisoned")]
    LockPoisoned,

    #[error("Unknown method: {name}")]
    UnknownMethod { name: String },
}

impl DepscanErrorCode for CallGraphError {
    fn error_code(&self) -> &'static str {
        error_code::CALL_GRAPH_ERROR
    }
}
