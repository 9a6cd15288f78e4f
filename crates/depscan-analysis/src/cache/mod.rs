//! File content cache.

pub mod file_cache;

pub use file_cache::{read_file, CachedFile, FileCache, FileCacheStats};
