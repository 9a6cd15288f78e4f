//! Incremental state persistence errors.

use std::path::PathBuf;

use super::error_code::{self, DepscanErrorCode};

/// Errors from loading or saving the incremental state file.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("IO error on state file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt state file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("State file {path} has version {found}, expected {expected}")]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("State file {path} is locked by another process")]
    Locked { path: PathBuf },
}

impl DepscanErrorCode for StateError {
    fn error_code(&self) -> &'static str {
        error_code::STATE_ERROR
    }
}
