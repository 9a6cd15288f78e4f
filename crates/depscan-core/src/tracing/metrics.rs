//! Structured span field names used across depscan subsystems.
//!
//! Keeping the names in one place lets log queries match fields regardless
//! of which crate emitted them.

/// Crawler: files discovered by the walker.
pub const FILES_DISCOVERED: &str = "files_discovered";

/// Crawler: files skipped because their extension is unknown.
pub const FILES_UNSUPPORTED: &str = "files_unsupported";

/// Extractors: dependencies produced for one file.
pub const DEPENDENCY_COUNT: &str = "dependency_count";

/// Extractors: extraction time per file in microseconds.
pub const EXTRACT_TIME_US: &str = "extract_time_us";

/// Incremental: files whose cached result was reused.
pub const FILES_SKIPPED: &str = "files_skipped";

/// Incremental: files re-extracted.
pub const FILES_ANALYZED: &str = "files_analyzed";

/// File cache: hit ratio (0.0 - 1.0).
pub const CACHE_HIT_RATE: &str = "cache_hit_rate";

/// Dispatcher: worker thread index.
pub const WORKER_ID: &str = "worker_id";

/// Call graph: method definitions in the table.
pub const METHOD_COUNT: &str = "method_count";

/// Crawler: total wall time in milliseconds.
pub const CRAWL_DURATION_MS: &str = "crawl_duration_ms";
