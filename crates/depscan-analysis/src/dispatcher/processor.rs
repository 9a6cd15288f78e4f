//! Per-file processing run by dispatcher workers (and by the serial crawl).

use std::path::Path;
use std::sync::Arc;

use depscan_core::errors::PipelineError;

use super::types::{ProcessedFile, WorkItem};
use crate::cache::{read_file, FileCache};
use crate::call_graph::MethodTable;
use crate::extractors::extract_language;
use crate::grammar::LayerMask;
use crate::incremental::IncrementalCoordinator;
use crate::patterns::PatternCache;

/// Work done for one file. Implementations are shared across workers.
pub trait WorkProcessor: Send + Sync {
    fn process(&self, item: &WorkItem) -> Result<ProcessedFile, PipelineError>;
}

/// Read, extract, and merge methods into the shared table.
pub struct ExtractionProcessor {
    patterns: Arc<PatternCache>,
    methods: Arc<MethodTable>,
    files: Option<Arc<FileCache>>,
    layers: LayerMask,
}

impl ExtractionProcessor {
    pub fn new(
        patterns: Arc<PatternCache>,
        methods: Arc<MethodTable>,
        files: Option<Arc<FileCache>>,
        layers: LayerMask,
    ) -> Self {
        Self {
            patterns,
            methods,
            files,
            layers,
        }
    }

    fn read(&self, path: &Path) -> Result<Arc<str>, PipelineError> {
        Ok(match self.files.as_deref() {
            Some(cache) => cache.read_through(path)?,
            None => read_file(path)?.0,
        })
    }
}

impl WorkProcessor for ExtractionProcessor {
    fn process(&self, item: &WorkItem) -> Result<ProcessedFile, PipelineError> {
        let content = self.read(&item.path)?;
        let dependencies = extract_language(&self.patterns, item.language, &item.path, &content, self.layers)?;
        self.methods.ingest_file(&item.path, &dependencies)?;
        Ok(ProcessedFile {
            dependencies,
            reused: false,
            state: None,
        })
    }
}

/// Route each file through the incremental coordinator.
pub struct IncrementalProcessor {
    coordinator: Arc<IncrementalCoordinator>,
}

impl IncrementalProcessor {
    pub fn new(coordinator: Arc<IncrementalCoordinator>) -> Self {
        Self { coordinator }
    }
}

impl WorkProcessor for IncrementalProcessor {
    fn process(&self, item: &WorkItem) -> Result<ProcessedFile, PipelineError> {
        let outcome = self.coordinator.analyze(&item.path, item.language)?;
        Ok(ProcessedFile {
            dependencies: outcome.dependencies,
            reused: outcome.reused,
            state: Some(outcome.state),
        })
    }
}
