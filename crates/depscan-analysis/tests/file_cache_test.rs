//! File cache tests against real files: LRU eviction, staleness after
//! edits and deletes, byte budget.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use depscan_analysis::cache::{read_file, FileCache};
use depscan_analysis::scanner::FileStamp;
use depscan_core::errors::CacheError;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn least_recently_used_entry_is_evicted() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(3, 1024 * 1024).unwrap();
    let paths: Vec<PathBuf> = (0..4)
        .map(|i| write(dir.path(), &format!("f{i}.py"), &format!("import mod{i}\n")))
        .collect();

    for path in &paths[..3] {
        cache.read_through(path).unwrap();
    }
    // Touch f0 so f1 becomes the oldest.
    assert!(cache.get(&paths[0]).is_some());
    cache.read_through(&paths[3]).unwrap();

    assert_eq!(cache.len(), 3);
    assert!(cache.contains(&paths[0]));
    assert!(!cache.contains(&paths[1]));
    assert!(cache.contains(&paths[2]));
    assert!(cache.contains(&paths[3]));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn byte_budget_is_enforced() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(100, 10).unwrap();
    let small = write(dir.path(), "a.rs", "use a;");
    let other = write(dir.path(), "b.rs", "use b;");
    let big = write(dir.path(), "big.rs", "use something_long;");

    cache.read_through(&small).unwrap();
    cache.read_through(&other).unwrap();
    assert_eq!(cache.len(), 1);
    assert!(cache.stats().bytes <= 10);

    let content = cache.read_through(&big).unwrap();
    assert_eq!(&*content, "use something_long;");
    assert!(!cache.contains(&big));

    let (content, stamp) = read_file(&big).unwrap();
    let err = cache.put(&big, content, stamp).unwrap_err();
    assert!(matches!(err, CacheError::EntryTooLarge { size: 19, budget: 10, .. }));
}

#[test]
fn edited_file_is_a_miss() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(10, 1024).unwrap();
    let path = write(dir.path(), "main.go", "package main\n");
    cache.read_through(&path).unwrap();
    assert!(cache.get(&path).is_some());

    thread::sleep(Duration::from_millis(20));
    fs::write(&path, "package main\n\nimport \"github.com/x/y\"\n").unwrap();

    assert!(cache.get(&path).is_none());
    let stats = cache.stats();
    assert_eq!(stats.invalidations, 1);
    assert_eq!(cache.read_through(&path).unwrap().lines().count(), 3);
}

#[test]
fn hit_carries_the_stamp_it_was_stored_with() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(10, 1024).unwrap();
    let path = write(dir.path(), "lib.rs", "use serde;\n");
    let (content, stamp) = read_file(&path).unwrap();
    cache.put(&path, Arc::clone(&content), stamp).unwrap();

    let (cached, cached_stamp) = cache.get_stamped(&path).unwrap();
    assert_eq!(cached, content);
    assert_eq!(cached_stamp, stamp);
    assert_eq!(cached_stamp, FileStamp::read(&path).unwrap());
}

#[test]
fn deleted_file_is_dropped() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(10, 1024).unwrap();
    let path = write(dir.path(), "gone.rb", "require 'x'\n");
    cache.read_through(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(cache.get(&path).is_none());
    assert!(cache.is_empty());
    assert!(matches!(cache.read_through(&path), Err(CacheError::Read { .. })));
}

#[test]
fn hit_ratio_tracks_lookups() {
    let dir = TempDir::new().unwrap();
    let cache = FileCache::new(10, 1024).unwrap();
    let path = write(dir.path(), "x.c", "#include \"x.h\"\n");

    cache.read_through(&path).unwrap();
    cache.read_through(&path).unwrap();
    cache.read_through(&path).unwrap();

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
    assert!((stats.hit_ratio() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn invalid_utf8_is_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.py");
    fs::write(&path, b"import caf\xe9\n").unwrap();
    let (content, stamp) = read_file(&path).unwrap();
    assert!(content.contains('\u{FFFD}'));
    assert_eq!(stamp.size, 12);
}

#[test]
fn shared_between_threads() {
    let dir = TempDir::new().unwrap();
    let cache = Arc::new(FileCache::new(64, 1024 * 1024).unwrap());
    let paths: Arc<Vec<PathBuf>> = Arc::new(
        (0..16)
            .map(|i| write(dir.path(), &format!("m{i}.js"), &format!("import x{i} from 'x{i}';\n")))
            .collect(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let paths = Arc::clone(&paths);
            thread::spawn(move || {
                for path in paths.iter() {
                    cache.read_through(path).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.stats();
    assert_eq!(stats.entries, 16);
    assert_eq!(stats.hits + stats.misses, 64);
}

#[test]
fn zero_limits_are_rejected() {
    assert!(matches!(FileCache::new(0, 10), Err(CacheError::InvalidLimits { .. })));
    assert!(matches!(FileCache::new(10, 0), Err(CacheError::InvalidLimits { .. })));
}
