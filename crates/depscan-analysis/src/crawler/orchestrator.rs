//! Crawler: walk the roots, analyze every supported file, and assemble
//! the dependency graph.
//!
//! Phases: discover → process (serial or worker pool, optionally through
//! the incremental coordinator) → merge → derived indexes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use depscan_core::config::DepscanConfig;
use depscan_core::constants::DEFAULT_STATE_FILE;
use depscan_core::errors::{DepscanErrorCode, PipelineError, PipelineResult, ScanError};
use depscan_core::traits::{Cancellable, CancellationToken};

use super::types::{CrawlMode, CrawlStats, DependencyGraph, FileFailure};
use crate::cache::{read_file, FileCache};
use crate::call_graph::MethodTable;
use crate::dispatcher::{
    DispatcherConfig, ExtractionProcessor, IncrementalProcessor, ParallelDispatcher,
    ProcessingResult, WorkItem, WorkProcessor,
};
use crate::grammar::{Layer, LayerMask};
use crate::incremental::{IncrementalCoordinator, IncrementalOptions};
use crate::patterns::PatternCache;
use crate::scanner::language_detect::Language;
use crate::scanner::walker::{walk, ScanOptions};
use crate::structures::StructureIndex;

#[derive(Debug, Default)]
struct Discovered {
    /// Every file found, supported or not.
    files: Vec<PathBuf>,
    work: Vec<(PathBuf, Language)>,
}

/// How often a parallel crawl re-checks cancellation while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct Crawler {
    config: DepscanConfig,
    roots: Vec<PathBuf>,
    patterns: Arc<PatternCache>,
    cancel: CancellationToken,
}

impl Crawler {
    /// Compiles every grammar; a pattern that fails to compile is fatal.
    pub fn new(config: DepscanConfig, roots: Vec<PathBuf>) -> Result<Self, PipelineError> {
        let patterns = Arc::new(PatternCache::initialize()?);
        Ok(Self::with_patterns(config, roots, patterns))
    }

    pub fn with_patterns(config: DepscanConfig, roots: Vec<PathBuf>, patterns: Arc<PatternCache>) -> Self {
        Self {
            config,
            roots,
            patterns,
            cancel: CancellationToken::new(),
        }
    }

    /// Cancelling the returned token makes a running [`run`](Self::run)
    /// return [`PipelineError::Cancelled`] at the next file boundary.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &DepscanConfig {
        &self.config
    }

    pub fn mode(&self) -> CrawlMode {
        if self.config.performance.effective_parallel() {
            CrawlMode::Parallel
        } else {
            CrawlMode::Serial
        }
    }

    pub fn layers(&self) -> LayerMask {
        LayerMask::from_names(&self.config.analysis.layers)
    }

    /// Configured state file, else `.depscan/state.json` under the first
    /// root (or its directory when the root is a file).
    pub fn state_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config.cache.state_file {
            return Some(path.clone());
        }
        let root = self.roots.first()?;
        let base = if root.is_file() {
            root.parent().unwrap_or(Path::new("."))
        } else {
            root.as_path()
        };
        Some(base.join(DEFAULT_STATE_FILE))
    }

    pub fn run(&self) -> Result<DependencyGraph, PipelineError> {
        let start = Instant::now();
        let layers = self.layers();
        let incremental = self.config.cache.effective_incremental();

        // Phase 1: discover and classify.
        let mut stats = CrawlStats::default();
        let discovered = self.discover(&mut stats)?;
        for error in &discovered.errors {
            warn!(error = %error, "entry skipped during walk");
        }
        stats.walk_errors = discovered.error_count();
        let Discovered { files: walked_files, work } = discovered.data;
        info!(
            files_discovered = stats.files_discovered,
            files_unsupported = stats.files_unsupported,
            mode = ?self.mode(),
            incremental,
            "crawl started"
        );

        // Phase 2: shared state.
        let methods = Arc::new(MethodTable::new());
        let files = if self.config.cache.effective_enabled() {
            Some(Arc::new(FileCache::from_config(&self.config.cache)?))
        } else {
            None
        };
        let coordinator = if incremental {
            let mut options = IncrementalOptions::from_config(&self.config.cache, layers);
            options.state_file = self.state_file();
            let coordinator = IncrementalCoordinator::new(
                Arc::clone(&self.patterns),
                Arc::clone(&methods),
                files.clone(),
                options,
            );
            if let Some(path) = coordinator.options().state_file.clone() {
                coordinator.load_state(&path);
            }
            Some(Arc::new(coordinator))
        } else {
            None
        };
        let processor: Arc<dyn WorkProcessor> = match &coordinator {
            Some(coordinator) => Arc::new(IncrementalProcessor::new(Arc::clone(coordinator))),
            None => Arc::new(ExtractionProcessor::new(
                Arc::clone(&self.patterns),
                Arc::clone(&methods),
                files.clone(),
                layers,
            )),
        };

        // Phase 3: process.
        let mut results = match self.mode() {
            CrawlMode::Serial => self.process_serial(&work, processor.as_ref())?,
            CrawlMode::Parallel => self.process_parallel(&work, Arc::clone(&processor))?,
        };
        results.sort_by(|a, b| a.path.cmp(&b.path));

        // Phase 4: merge.
        let mut graph = DependencyGraph::default();
        let mut processed_paths = Vec::with_capacity(results.len());
        for result in results {
            match result.outcome {
                Ok(processed) => {
                    if processed.reused {
                        stats.files_reused += 1;
                    } else {
                        stats.files_analyzed += 1;
                    }
                    *stats
                        .by_language
                        .entry(result.language.name().to_string())
                        .or_default() += 1;
                    graph.dependencies.extend(processed.dependencies);
                    processed_paths.push(result.path);
                }
                Err(e) => {
                    stats.files_failed += 1;
                    graph.failures.push(FileFailure {
                        path: result.path,
                        code: e.error_code().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(coordinator) = &coordinator {
            stats.files_deleted = coordinator.detect_deleted(&walked_files)?.len();
            if coordinator.options().track_moves {
                coordinator.detect_moves();
            }
            graph.changes = coordinator.take_changes();
            stats.incremental = Some(coordinator.stats());
        }

        // Phase 5: derived indexes.
        if layers.contains(Layer::Struct) && self.config.analysis.effective_structure_index() {
            let contents = read_contents(&processed_paths, files.as_deref());
            graph.structures = StructureIndex::build(&graph.dependencies, &contents);
        }
        graph.methods = methods.snapshot()?;
        graph.conflicts = methods.conflicts()?;
        if layers.contains(Layer::Method) && self.config.analysis.effective_detect_cycles() {
            graph.cycles = methods.find_cycles()?;
        }

        stats.dependencies = graph.dependencies.len();
        for dep in &graph.dependencies {
            *stats.by_layer.entry(dep.layer.name().to_string()).or_default() += 1;
        }
        stats.call_graph = methods.stats()?;
        stats.file_cache = files.as_deref().map(FileCache::stats);
        stats.duration = start.elapsed();

        info!(
            files_analyzed = stats.files_analyzed,
            files_skipped = stats.files_reused,
            files_failed = stats.files_failed,
            dependency_count = stats.dependencies,
            method_count = stats.call_graph.methods,
            cache_hit_rate = stats.file_cache.as_ref().map_or(0.0, |c| c.hit_ratio()),
            crawl_duration_ms = stats.duration.as_millis() as u64,
            "crawl finished"
        );
        graph.stats = stats;
        Ok(graph)
    }

    /// Walk the roots and classify every file by language. Unreadable
    /// nested entries come back as non-fatal errors.
    fn discover(&self, stats: &mut CrawlStats) -> Result<PipelineResult<Discovered>, PipelineError> {
        let walked = walk(
            &self.roots,
            &ScanOptions::from_config(&self.config.scan),
            &self.cancel,
        )
        .map_err(|e| match e {
            ScanError::Cancelled => PipelineError::Cancelled,
            other => PipelineError::from(other),
        })?;

        stats.files_discovered = walked.files.len();
        stats.files_excluded = walked.skipped_excluded;
        stats.files_too_large = walked.skipped_too_large;

        let mut work = Vec::with_capacity(walked.files.len());
        for path in &walked.files {
            match Language::from_path(path) {
                Some(language) => work.push((path.clone(), language)),
                None => stats.files_unsupported += 1,
            }
        }

        let mut result = PipelineResult::new(Discovered {
            files: walked.files,
            work,
        });
        for error in walked.errors {
            result.add_error(error.into());
        }
        Ok(result)
    }

    fn process_serial(
        &self,
        work: &[(PathBuf, Language)],
        processor: &dyn WorkProcessor,
    ) -> Result<Vec<ProcessingResult>, PipelineError> {
        let mut results = Vec::with_capacity(work.len());
        for (id, (path, language)) in work.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            let item = WorkItem {
                id: id as u64,
                path: path.clone(),
                language: *language,
            };
            let started = Instant::now();
            let outcome = processor.process(&item);
            if let Err(e) = &outcome {
                warn!(path = %path.display(), error = %e, "file failed");
            }
            results.push(ProcessingResult {
                id: item.id,
                path: item.path,
                language: item.language,
                outcome,
                elapsed: started.elapsed(),
                worker: 0,
            });
        }
        Ok(results)
    }

    fn process_parallel(
        &self,
        work: &[(PathBuf, Language)],
        processor: Arc<dyn WorkProcessor>,
    ) -> Result<Vec<ProcessingResult>, PipelineError> {
        let mut dispatcher =
            ParallelDispatcher::new(DispatcherConfig::from_config(&self.config.performance), processor)?;
        dispatcher.start()?;

        let mut results = Vec::with_capacity(work.len());
        for (path, language) in work {
            if self.cancel.is_cancelled() {
                dispatcher.shutdown();
                return Err(PipelineError::Cancelled);
            }
            dispatcher.submit(path.clone(), *language)?;
            results.extend(dispatcher.drain_results());
        }
        while !dispatcher.wait_completion(Some(POLL_INTERVAL)) {
            if self.cancel.is_cancelled() {
                dispatcher.shutdown();
                return Err(PipelineError::Cancelled);
            }
        }
        results.extend(dispatcher.drain_results());
        dispatcher.shutdown();

        let dispatch = dispatcher.stats();
        debug!(
            processed = dispatch.processed,
            failed = dispatch.failed,
            busy_ms = dispatch.busy.as_millis() as u64,
            "worker pool drained"
        );
        Ok(results)
    }
}

/// Contents for the structure reference scan. Unreadable files are left out.
fn read_contents(paths: &[PathBuf], cache: Option<&FileCache>) -> Vec<(PathBuf, Arc<str>)> {
    paths
        .par_iter()
        .filter_map(|path| {
            let read = match cache {
                Some(cache) => cache.read_through(path),
                None => read_file(path).map(|(content, _)| content),
            };
            match read {
                Ok(content) => Some((path.clone(), content)),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping file in structure scan");
                    None
                }
            }
        })
        .collect()
}
