//! Pattern cache errors.

use super::error_code::{self, DepscanErrorCode};

/// Errors raised while compiling or looking up grammar patterns.
///
/// Compilation failure is the only fatal error in the engine: every later
/// stage depends on the compiled grammars.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Pattern {index} of {language} {layer} layer failed to compile: {message}")]
    CompilationFailed {
        language: String,
        layer: String,
        index: usize,
        message: String,
    },

    #[error("Pattern cache is not initialized")]
    Uninitialized,
}

impl DepscanErrorCode for PatternError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CompilationFailed { .. } => error_code::PATTERN_COMPILE_FAILED,
            Self::Uninitialized => error_code::PATTERN_CACHE_UNINITIALIZED,
        }
    }
}
