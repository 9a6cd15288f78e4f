//! Directory walk configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_FILE_SIZE;

/// Controls which files the walker yields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum directory depth below each root. `None` walks everything.
    pub max_depth: Option<usize>,
    /// Files larger than this are skipped. Default: 100MB.
    pub max_file_size: Option<u64>,
    /// Glob patterns (matched against paths relative to the root) to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Follow symbolic links while walking. Default: false.
    pub follow_symlinks: Option<bool>,
}

impl ScanConfig {
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }
}
