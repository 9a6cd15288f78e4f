//! Crawl output types.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::FileCacheStats;
use crate::call_graph::{CallGraphStats, DefinitionConflict, MethodDefinition};
use crate::extractors::ExtractedDependency;
use crate::incremental::{DependencyChange, IncrementalStats};
use crate::structures::StructureIndex;

/// How files are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    Serial,
    Parallel,
}

/// A file that could not be analyzed. It contributes nothing to the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlStats {
    pub files_discovered: usize,
    pub files_unsupported: usize,
    pub files_excluded: usize,
    pub files_too_large: usize,
    /// Files extracted in this run.
    pub files_analyzed: usize,
    /// Files whose previous result was reused.
    pub files_reused: usize,
    pub files_failed: usize,
    pub files_deleted: usize,
    /// Nested entries that could not be read during the walk.
    #[serde(default)]
    pub walk_errors: usize,
    pub dependencies: usize,
    /// Dependency count per layer name.
    pub by_layer: BTreeMap<String, usize>,
    /// Analyzed or reused file count per language name.
    pub by_language: BTreeMap<String, usize>,
    pub call_graph: CallGraphStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_cache: Option<FileCacheStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incremental: Option<IncrementalStats>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

/// Everything a crawl produced, ready for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    /// Sorted by source file, then extraction order within the file.
    pub dependencies: Vec<ExtractedDependency>,
    /// Sorted by name.
    pub methods: Vec<MethodDefinition>,
    pub conflicts: Vec<DefinitionConflict>,
    pub structures: StructureIndex,
    /// Strongly connected groups of mutually calling methods.
    pub cycles: Vec<Vec<String>>,
    /// Dependency set changes seen by an incremental crawl.
    pub changes: Vec<DependencyChange>,
    pub failures: Vec<FileFailure>,
    pub stats: CrawlStats,
}

impl DependencyGraph {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Files with at least one dependency, sorted.
    pub fn files(&self) -> Vec<&PathBuf> {
        let mut files: Vec<&PathBuf> = self.dependencies.iter().map(|d| &d.source).collect();
        files.dedup();
        files
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
