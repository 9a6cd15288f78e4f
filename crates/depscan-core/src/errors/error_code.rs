//! Structured error codes shared by every depscan error enum.

/// Every error enum implements this to expose a stable code string that
/// front-ends (CLI exit reporting, JSON output) can match on.
pub trait DepscanErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const PATTERN_COMPILE_FAILED: &str = "PATTERN_COMPILE_FAILED";
pub const PATTERN_CACHE_UNINITIALIZED: &str = "PATTERN_CACHE_UNINITIALIZED";
pub const EXTRACT_ERROR: &str = "EXTRACT_ERROR";
pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const CACHE_ERROR: &str = "CACHE_ERROR";
pub const STATE_ERROR: &str = "STATE_ERROR";
pub const QUEUE_FULL: &str = "QUEUE_FULL";
pub const DISPATCH_ERROR: &str = "DISPATCH_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CALL_GRAPH_ERROR: &str = "CALL_GRAPH_ERROR";
pub const CANCELLED: &str = "CANCELLED";
