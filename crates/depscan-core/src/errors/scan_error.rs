//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, DepscanErrorCode};

/// Errors that can occur during directory walking and file reads.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error scanning {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scan root is not a readable directory: {path}")]
    InvalidRoot { path: PathBuf },

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Invalid exclude pattern {pattern}: {message}")]
    InvalidExclude { pattern: String, message: String },
}

impl DepscanErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => error_code::CANCELLED,
            _ => error_code::SCAN_ERROR,
        }
    }
}
