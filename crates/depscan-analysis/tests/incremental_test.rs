//! Incremental coordinator tests: reuse, change records, persisted state
//! across coordinator instances, content-hash verification.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use depscan_analysis::cache::FileCache;
use depscan_analysis::call_graph::MethodTable;
use depscan_analysis::grammar::LayerMask;
use depscan_analysis::incremental::{FileState, IncrementalCoordinator, IncrementalOptions};
use depscan_analysis::patterns::PatternCache;
use depscan_analysis::scanner::Language;

fn coordinator_with(options: IncrementalOptions) -> IncrementalCoordinator {
    IncrementalCoordinator::new(
        Arc::new(PatternCache::initialize().unwrap()),
        Arc::new(MethodTable::new()),
        Some(Arc::new(FileCache::new(64, 1 << 20).unwrap())),
        options,
    )
}

fn coordinator() -> IncrementalCoordinator {
    coordinator_with(IncrementalOptions::default())
}

/// Rewrite after a pause so the mtime moves on coarse filesystems too.
fn rewrite(path: &Path, content: &str) {
    thread::sleep(Duration::from_millis(20));
    fs::write(path, content).unwrap();
}

#[test]
fn unchanged_file_is_reused_with_identical_result() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.py");
    fs::write(&path, "import numpy\nimport requests\n").unwrap();

    let coord = coordinator();
    let first = coord.analyze(&path, Language::Python).unwrap();
    let second = coord.analyze(&path, Language::Python).unwrap();

    assert_eq!(first.state, FileState::New);
    assert!(!first.reused);
    assert_eq!(second.state, FileState::Unchanged);
    assert!(second.reused);
    assert_eq!(first.dependencies, second.dependencies);
    assert!(coord.changes().is_empty());
}

#[test]
fn new_import_is_recorded_as_a_change() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.py");
    fs::write(&path, "import os\n").unwrap();

    let coord = coordinator();
    let first = coord.analyze(&path, Language::Python).unwrap();
    assert!(first.dependencies.is_empty());

    rewrite(&path, "import numpy\n");
    let second = coord.analyze(&path, Language::Python).unwrap();
    assert_eq!(second.state, FileState::Modified);
    assert!(second.changed);

    let changes = coord.take_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].added, vec!["module:numpy".to_string()]);
    assert!(changes[0].removed.is_empty());
    assert_eq!(changes[0].layers, LayerMask::MODULE);
    assert!(coord.changes().is_empty());
}

#[test]
fn line_shift_is_not_a_change() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.py");
    fs::write(&path, "import numpy\n").unwrap();

    let coord = coordinator();
    coord.analyze(&path, Language::Python).unwrap();
    rewrite(&path, "\n\n# header\nimport numpy\n");
    let outcome = coord.analyze(&path, Language::Python).unwrap();

    assert_eq!(outcome.state, FileState::Modified);
    assert!(!outcome.changed);
    assert_eq!(outcome.dependencies[0].line, 4);
    assert!(coord.changes().is_empty());
}

#[test]
fn removed_method_lists_both_sides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lib.rs");
    fs::write(&path, "fn keep() {\n}\n\nfn drop_me() {\n    keep();\n}\n").unwrap();

    let coord = coordinator();
    coord.analyze(&path, Language::Rust).unwrap();
    assert!(coord.methods().get("drop_me").unwrap().is_some());

    rewrite(&path, "use serde;\n\nfn keep() {\n}\n");
    coord.analyze(&path, Language::Rust).unwrap();

    let change = &coord.changes()[0];
    assert_eq!(change.added, vec!["module:serde".to_string()]);
    assert_eq!(change.removed, vec!["method:drop_me".to_string()]);
    assert_eq!(change.layers, LayerMask::MODULE | LayerMask::METHOD);
    assert!(coord.methods().get("drop_me").unwrap().is_none());
}

#[test]
fn state_survives_a_new_coordinator() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("worker.py");
    fs::write(&path, "import celery\n\ndef run(job):\n    return execute(job)\n").unwrap();
    let state_file = dir.path().join(".depscan").join("state.json");

    let first = coordinator();
    first.analyze(&path, Language::Python).unwrap();
    first.save_state(&state_file).unwrap();
    assert!(state_file.exists());

    let second = coordinator();
    assert_eq!(second.load_state(&state_file), 1);
    assert_eq!(second.methods().require("run").unwrap().dependencies, vec!["execute".to_string()]);

    let outcome = second.analyze(&path, Language::Python).unwrap();
    assert!(outcome.reused);
    assert_eq!(outcome.dependencies.len(), 2);
    assert_eq!(second.stats().analyzed, 0);
    assert_eq!(second.stats().skipped, 1);
}

#[test]
fn unusable_state_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let coord = coordinator();
    assert_eq!(coord.load_state(&dir.path().join("missing.json")), 0);

    let corrupt = dir.path().join("state.json");
    fs::write(&corrupt, "{ not json").unwrap();
    assert_eq!(coord.load_state(&corrupt), 0);
    assert_eq!(coord.stats().tracked, 0);
}

#[test]
fn auto_save_writes_on_drop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("main.go");
    fs::write(&path, "package main\n\nimport \"github.com/acme/kit\"\n").unwrap();
    let state_file = dir.path().join("state.json");

    {
        let coord = coordinator_with(IncrementalOptions {
            auto_save: true,
            state_file: Some(state_file.clone()),
            ..IncrementalOptions::default()
        });
        coord.analyze(&path, Language::Go).unwrap();
    }

    assert!(state_file.exists());
    let reloaded = coordinator();
    assert_eq!(reloaded.load_state(&state_file), 1);
    assert_eq!(reloaded.result_of(&path).unwrap()[0].target, "github.com/acme/kit");
}

#[test]
fn content_hash_ignores_touches() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.rb");
    fs::write(&path, "require 'sinatra'\n").unwrap();

    let coord = coordinator_with(IncrementalOptions {
        verify_content_hash: true,
        ..IncrementalOptions::default()
    });
    coord.analyze(&path, Language::Ruby).unwrap();

    rewrite(&path, "require 'sinatra'\n");
    let outcome = coord.analyze(&path, Language::Ruby).unwrap();
    assert!(outcome.reused);
    assert_eq!(outcome.state, FileState::Unchanged);

    rewrite(&path, "require 'rack'\n");
    let outcome = coord.analyze(&path, Language::Ruby).unwrap();
    assert_eq!(outcome.state, FileState::Modified);
    assert!(outcome.changed);
}

#[test]
fn deleted_file_records_removal() {
    let dir = TempDir::new().unwrap();
    let kept = dir.path().join("kept.py");
    let gone = dir.path().join("gone.py");
    fs::write(&kept, "import numpy\n").unwrap();
    fs::write(&gone, "import pandas\n").unwrap();

    let coord = coordinator();
    coord.analyze(&kept, Language::Python).unwrap();
    coord.analyze(&gone, Language::Python).unwrap();
    fs::remove_file(&gone).unwrap();

    let deleted = coord.detect_deleted(&[kept.clone()]).unwrap();
    assert_eq!(deleted, vec![gone.clone()]);
    assert!(coord.fingerprint(&gone).is_none());
    assert!(coord.fingerprint(&kept).is_some());

    let changes = coord.take_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].removed, vec!["module:pandas".to_string()]);
    assert!(changes[0].current.is_empty());
    assert_eq!(coord.stats().deleted, 1);
}

#[test]
fn reused_definer_takes_over_a_dropped_method() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.c");
    let b = dir.path().join("b.c");
    let c = dir.path().join("c.c");
    fs::write(&a, "int add(int x, int y) {\n    return x + y;\n}\n").unwrap();
    fs::write(&b, "int add(int x, int y) {\n    return sum(x, y);\n}\n").unwrap();
    fs::write(&c, "int main(void) {\n    return add(1, 2);\n}\n").unwrap();

    let coord = coordinator();
    for path in [&a, &b, &c] {
        coord.analyze(path, Language::C).unwrap();
    }
    assert_eq!(coord.methods().require("add").unwrap().defined_in, a);

    rewrite(&a, "int sub(int x, int y) {\n    return x - y;\n}\n");
    assert!(!coord.analyze(&a, Language::C).unwrap().reused);
    assert!(coord.analyze(&b, Language::C).unwrap().reused);
    assert!(coord.analyze(&c, Language::C).unwrap().reused);

    let add = coord.methods().require("add").unwrap();
    assert_eq!(add.defined_in, b);
    assert_eq!(add.dependencies, vec!["sum".to_string()]);
    assert!(add.references.contains(&c));
    assert!(coord.methods().conflicts().unwrap().is_empty());
}
