//! Extractor errors.

use std::path::PathBuf;

use super::error_code::{self, DepscanErrorCode};

/// Errors that can occur while extracting dependencies from one file.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("No compiled patterns for {language} ({layer} layer)")]
    PatternsUnavailable { language: String, layer: String },

    #[error("Unsupported language for {path}")]
    UnsupportedLanguage { path: PathBuf },

    #[error("Extractor panicked on {path}: {message}")]
    Panicked { path: PathBuf, message: String },
}

impl DepscanErrorCode for ExtractError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage { .. } => error_code::UNSUPPORTED_LANGUAGE,
            _ => error_code::EXTRACT_ERROR,
        }
    }
}
