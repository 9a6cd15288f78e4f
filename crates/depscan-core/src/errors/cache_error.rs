//! File content cache errors.

use std::path::PathBuf;

use super::error_code::{self, DepscanErrorCode};

/// Errors from the file content cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Entry for {path} ({size} bytes) exceeds the cache byte budget of {budget}")]
    EntryTooLarge {
        path: PathBuf,
        size: usize,
        budget: usize,
    },

    #[error("IO error reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid cache limits: {message}")]
    InvalidLimits { message: String },
}

impl DepscanErrorCode for CacheError {
    fn error_code(&self) -> &'static str {
        error_code::CACHE_ERROR
    }
}
