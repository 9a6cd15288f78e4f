//! Shared constants for the depscan engine.

/// depscan version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---- Threads ----

/// Default number of dispatcher worker threads.
pub const DEFAULT_THREAD_COUNT: usize = 4;

/// Upper bound on dispatcher worker threads.
pub const MAX_THREAD_COUNT: usize = 16;

/// Default capacity of the bounded work queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

// ---- File content cache ----

/// Default maximum number of cached files.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default byte budget for cached file contents (64MB).
pub const DEFAULT_CACHE_MAX_BYTES: usize = 64 * 1024 * 1024;

// ---- Scanning ----

/// Maximum file size in bytes considered for extraction (100MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Dependency and build output directories never descended into.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    "bower_components",
    "target",
    "vendor",
    "__pycache__",
    "site-packages",
];

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "depscan.toml";

/// Default incremental state file, relative to the first scan root.
pub const DEFAULT_STATE_FILE: &str = ".depscan/state.json";

/// Version tag written into persisted incremental state.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Environment variable read by `init_tracing`.
pub const LOG_ENV_VAR: &str = "DEPSCAN_LOG";

// ---- Supported Languages ----

/// Number of supported languages.
pub const SUPPORTED_LANGUAGE_COUNT: usize = 9;

/// Supported language names, in grammar registry order.
pub const SUPPORTED_LANGUAGES: [&str; SUPPORTED_LANGUAGE_COUNT] = [
    "rust",
    "c",
    "javascript",
    "go",
    "python",
    "java",
    "php",
    "ruby",
    "svelte",
];

/// Layer names accepted in configuration.
pub const LAYER_NAMES: [&str; 3] = ["module", "struct", "method"];
