//! Worker pool tests with the real extraction processors.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use depscan_analysis::cache::FileCache;
use depscan_analysis::call_graph::MethodTable;
use depscan_analysis::dispatcher::{
    DispatcherConfig, ExtractionProcessor, IncrementalProcessor, ParallelDispatcher, ProcessingResult,
};
use depscan_analysis::grammar::LayerMask;
use depscan_analysis::incremental::{FileState, IncrementalCoordinator, IncrementalOptions};
use depscan_analysis::patterns::PatternCache;
use depscan_analysis::scanner::Language;

const FILES: usize = 40;

fn fixture(dir: &TempDir) -> Vec<PathBuf> {
    (0..FILES)
        .map(|i| {
            let path = dir.path().join(format!("mod_{i}.py"));
            fs::write(&path, format!("import pkg_{i}\n\ndef handler_{i}(x):\n    return step_{i}(x)\n")).unwrap();
            path
        })
        .collect()
}

fn run_all(dispatcher: &ParallelDispatcher, paths: &[PathBuf]) -> Vec<ProcessingResult> {
    let ids = dispatcher
        .submit_batch(paths.iter().map(|p| (p.clone(), Language::Python)))
        .unwrap();
    assert_eq!(ids.len(), paths.len());
    assert!(dispatcher.wait_completion(Some(Duration::from_secs(30))));
    dispatcher.drain_results()
}

#[test]
fn every_submitted_file_yields_one_result() {
    let dir = TempDir::new().unwrap();
    let paths = fixture(&dir);
    let methods = Arc::new(MethodTable::new());
    let processor = ExtractionProcessor::new(
        Arc::new(PatternCache::initialize().unwrap()),
        Arc::clone(&methods),
        Some(Arc::new(FileCache::new(128, 1 << 20).unwrap())),
        LayerMask::ALL,
    );

    let config = DispatcherConfig {
        threads: 4,
        queue_capacity: 8,
    };
    let mut dispatcher = ParallelDispatcher::new(config, Arc::new(processor)).unwrap();
    dispatcher.start().unwrap();
    let results = run_all(&dispatcher, &paths);

    assert_eq!(results.len(), FILES);
    let ids: BTreeSet<u64> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), FILES);
    assert!(results.iter().all(ProcessingResult::is_success));

    for result in &results {
        let processed = result.outcome.as_ref().unwrap();
        assert_eq!(processed.dependencies.len(), 2);
        assert!(!processed.reused);
        assert!(result.worker < 4);
    }
    assert_eq!(methods.len(), FILES);
    assert_eq!(methods.require("handler_7").unwrap().dependencies, vec!["step_7".to_string()]);

    let stats = dispatcher.stats();
    assert_eq!(stats.processed, FILES as u64);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.pending, 0);

    dispatcher.shutdown();
    assert!(dispatcher.is_shutdown());
    assert!(dispatcher.submit(paths[0].clone(), Language::Python).is_err());
}

#[test]
fn queue_drains_for_any_worker_count() {
    let dir = TempDir::new().unwrap();
    let mut paths = fixture(&dir);
    paths.push(dir.path().join("missing.py"));
    let patterns = Arc::new(PatternCache::initialize().unwrap());

    for threads in [1, 2, 8] {
        let processor = ExtractionProcessor::new(
            Arc::clone(&patterns),
            Arc::new(MethodTable::new()),
            None,
            LayerMask::ALL,
        );
        let config = DispatcherConfig {
            threads,
            queue_capacity: 1,
        };
        let mut dispatcher = ParallelDispatcher::new(config, Arc::new(processor)).unwrap();
        dispatcher.start().unwrap();
        let results = run_all(&dispatcher, &paths);

        assert_eq!(results.len(), FILES + 1, "threads={threads}");
        let ids: BTreeSet<u64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), FILES + 1, "threads={threads}");
        assert_eq!(results.iter().filter(|r| !r.is_success()).count(), 1);
        assert!(results.iter().all(|r| r.worker < threads));
        assert_eq!(dispatcher.stats().pending, 0);
        dispatcher.shutdown();
    }
}

#[test]
fn unreadable_file_is_a_failed_result() {
    let dir = TempDir::new().unwrap();
    let mut paths = fixture(&dir);
    paths.truncate(3);
    paths.push(dir.path().join("missing.py"));

    let processor = ExtractionProcessor::new(
        Arc::new(PatternCache::initialize().unwrap()),
        Arc::new(MethodTable::new()),
        None,
        LayerMask::ALL,
    );
    let mut dispatcher = ParallelDispatcher::new(DispatcherConfig::default(), Arc::new(processor)).unwrap();
    dispatcher.start().unwrap();
    let results = run_all(&dispatcher, &paths);

    assert_eq!(results.len(), 4);
    let failed: Vec<&ProcessingResult> = results.iter().filter(|r| !r.is_success()).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].path.ends_with("missing.py"));
    assert_eq!(dispatcher.stats().failed, 1);
    assert_eq!(dispatcher.stats().processed, 4);
    dispatcher.shutdown();
}

#[test]
fn incremental_processor_reuses_on_second_pass() {
    let dir = TempDir::new().unwrap();
    let paths = fixture(&dir);
    let coordinator = Arc::new(IncrementalCoordinator::new(
        Arc::new(PatternCache::initialize().unwrap()),
        Arc::new(MethodTable::new()),
        None,
        IncrementalOptions::default(),
    ));

    let mut dispatcher = ParallelDispatcher::new(
        DispatcherConfig {
            threads: 3,
            queue_capacity: 16,
        },
        Arc::new(IncrementalProcessor::new(Arc::clone(&coordinator))),
    )
    .unwrap();
    dispatcher.start().unwrap();

    let first = run_all(&dispatcher, &paths);
    assert!(first
        .iter()
        .all(|r| r.outcome.as_ref().is_ok_and(|p| p.state == Some(FileState::New))));

    let second = run_all(&dispatcher, &paths);
    assert_eq!(second.len(), FILES);
    assert!(second.iter().all(|r| r.outcome.as_ref().is_ok_and(|p| p.reused)));

    let stats = coordinator.stats();
    assert_eq!(stats.analyzed, FILES as u64);
    assert_eq!(stats.skipped, FILES as u64);
    dispatcher.shutdown();
}
