//! Incremental analysis types.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use depscan_core::config::CacheConfig;

use crate::extractors::ExtractedDependency;
use crate::grammar::LayerMask;
use crate::scanner::stamp::FileStamp;

/// Change state of a tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    New,
    Modified,
    Unchanged,
    Deleted,
    Moved,
}

/// What is remembered about a file between analyses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFingerprint {
    pub path: PathBuf,
    #[serde(flatten)]
    pub stamp: FileStamp,
    /// xxh3 of the content at the last analysis.
    pub content_hash: u64,
    /// Hash of the extracted dependency list.
    pub dependency_hash: u64,
    pub state: FileState,
    /// Unix seconds of the last analysis.
    pub last_analyzed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_from: Option<PathBuf>,
}

/// A file whose dependency list differs from the previous analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyChange {
    pub path: PathBuf,
    pub previous: Vec<ExtractedDependency>,
    pub current: Vec<ExtractedDependency>,
    /// `layer:target` entries present now but not before.
    pub added: Vec<String>,
    /// `layer:target` entries present before but not now.
    pub removed: Vec<String>,
    /// Layers with at least one added or removed entry.
    pub layers: LayerMask,
    pub timestamp: u64,
}

/// Result of analyzing one file.
#[derive(Debug, Clone)]
pub struct IncrementalOutcome {
    pub path: PathBuf,
    pub state: FileState,
    pub dependencies: Vec<ExtractedDependency>,
    /// True when the previous result was reused without extraction.
    pub reused: bool,
    pub changed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IncrementalStats {
    pub tracked: usize,
    pub analyzed: u64,
    pub skipped: u64,
    /// Content reads served by the file cache.
    pub cache_hits: u64,
    pub changes: u64,
    pub deleted: u64,
    pub moved: u64,
}

impl IncrementalStats {
    /// Fraction of analyze calls that reused a previous result.
    pub fn efficiency(&self) -> f64 {
        let total = self.analyzed + self.skipped;
        if total == 0 {
            0.0
        } else {
            self.skipped as f64 / total as f64
        }
    }
}

/// Coordinator settings.
#[derive(Debug, Clone)]
pub struct IncrementalOptions {
    pub layers: LayerMask,
    pub verify_content_hash: bool,
    pub track_moves: bool,
    /// Persist state to `state_file` when the coordinator is dropped.
    pub auto_save: bool,
    pub state_file: Option<PathBuf>,
}

impl Default for IncrementalOptions {
    fn default() -> Self {
        Self {
            layers: LayerMask::ALL,
            verify_content_hash: false,
            track_moves: false,
            auto_save: false,
            state_file: None,
        }
    }
}

impl IncrementalOptions {
    pub fn from_config(config: &CacheConfig, layers: LayerMask) -> Self {
        Self {
            layers,
            verify_content_hash: config.effective_verify_content_hash(),
            track_moves: config.effective_track_moves(),
            auto_save: config.effective_auto_save(),
            state_file: config.state_file.clone(),
        }
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
