//! File cache and incremental analysis configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CACHE_MAX_BYTES, DEFAULT_CACHE_MAX_ENTRIES};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Keep raw file contents in the LRU cache. Default: true.
    pub enabled: Option<bool>,
    /// Maximum cached files. Default: 10,000.
    pub max_entries: Option<usize>,
    /// Byte budget for cached contents. Default: 64MB.
    pub max_bytes: Option<usize>,
    /// Reuse prior results for unchanged files. Default: false.
    pub incremental: Option<bool>,
    /// Where incremental state is persisted between runs.
    pub state_file: Option<PathBuf>,
    /// Decide unchanged/modified by content hash instead of size and mtime. Default: false.
    pub verify_content_hash: Option<bool>,
    /// Classify a deleted+new pair with identical content as a move. Default: false.
    pub track_moves: Option<bool>,
    /// Save incremental state when the coordinator is dropped. Default: true.
    pub auto_save: Option<bool>,
}

impl CacheConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_max_entries(&self) -> usize {
        self.max_entries.unwrap_or(DEFAULT_CACHE_MAX_ENTRIES)
    }

    pub fn effective_max_bytes(&self) -> usize {
        self.max_bytes.unwrap_or(DEFAULT_CACHE_MAX_BYTES)
    }

    pub fn effective_incremental(&self) -> bool {
        self.incremental.unwrap_or(false)
    }

    pub fn effective_verify_content_hash(&self) -> bool {
        self.verify_content_hash.unwrap_or(false)
    }

    pub fn effective_track_moves(&self) -> bool {
        self.track_moves.unwrap_or(false)
    }

    pub fn effective_auto_save(&self) -> bool {
        self.auto_save.unwrap_or(true)
    }
}
