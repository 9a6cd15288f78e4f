//! Incremental coordinator: reuse results for unchanged files, re-extract
//! the rest, and record how each file's dependency set moved.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, trace, warn};

use depscan_core::errors::{PipelineError, StateError};
use depscan_core::types::{FxHashMap, FxHashSet};

use super::fingerprint::FingerprintStore;
use super::state::{self, PersistedResult, PersistedState};
use super::types::{
    unix_now, DependencyChange, FileFingerprint, FileState, IncrementalOptions,
    IncrementalOutcome, IncrementalStats,
};
use crate::cache::{read_file, FileCache};
use crate::call_graph::MethodTable;
use crate::extractors::{extract_language, ExtractedDependency};
use crate::grammar::LayerMask;
use crate::patterns::PatternCache;
use crate::scanner::hasher::{hash_content, hash_strings};
use crate::scanner::language_detect::Language;
use crate::scanner::stamp::FileStamp;

#[derive(Debug, Default)]
struct Counters {
    analyzed: AtomicU64,
    skipped: AtomicU64,
    cache_hits: AtomicU64,
    changes: AtomicU64,
    deleted: AtomicU64,
    moved: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&self) {
        for c in [
            &self.analyzed,
            &self.skipped,
            &self.cache_hits,
            &self.changes,
            &self.deleted,
            &self.moved,
        ] {
            c.store(0, Ordering::Relaxed);
        }
    }
}

/// Shared between dispatcher workers via `Arc`.
pub struct IncrementalCoordinator {
    patterns: Arc<PatternCache>,
    methods: Arc<MethodTable>,
    files: Option<Arc<FileCache>>,
    options: IncrementalOptions,
    store: Mutex<FingerprintStore>,
    results: Mutex<FxHashMap<PathBuf, Vec<ExtractedDependency>>>,
    changes: Mutex<Vec<DependencyChange>>,
    /// Fingerprints removed by `detect_deleted`, kept for move pairing.
    deleted: Mutex<Vec<FileFingerprint>>,
    counters: Counters,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn dependency_keys(deps: &[ExtractedDependency]) -> Vec<String> {
    deps.iter().map(|d| format!("{}:{}", d.layer, d.target)).collect()
}

impl IncrementalCoordinator {
    pub fn new(
        patterns: Arc<PatternCache>,
        methods: Arc<MethodTable>,
        files: Option<Arc<FileCache>>,
        options: IncrementalOptions,
    ) -> Self {
        Self {
            patterns,
            methods,
            files,
            options,
            store: Mutex::new(FingerprintStore::new()),
            results: Mutex::new(FxHashMap::default()),
            changes: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            counters: Counters::default(),
        }
    }

    pub fn options(&self) -> &IncrementalOptions {
        &self.options
    }

    pub fn methods(&self) -> &Arc<MethodTable> {
        &self.methods
    }

    /// Analyze one file, reusing the previous result when it is unchanged.
    pub fn analyze(&self, path: &Path, language: Language) -> Result<IncrementalOutcome, PipelineError> {
        let stamp_state = guard(&self.store).state_of(path);
        if !self.options.verify_content_hash && stamp_state == FileState::Unchanged {
            if let Some(outcome) = self.reuse(path) {
                return Ok(outcome);
            }
        }

        let (content, stamp) = self.read(path)?;
        let content_hash = hash_content(content.as_bytes());

        let state = if self.options.verify_content_hash {
            let by_hash = guard(&self.store).state_by_hash(path, content_hash);
            if by_hash == FileState::Unchanged {
                if let Some(outcome) = self.reuse(path) {
                    guard(&self.store).touch(path, stamp, FileState::Unchanged);
                    return Ok(outcome);
                }
            }
            by_hash
        } else {
            stamp_state
        };

        let deps = extract_language(&self.patterns, language, path, &content, self.options.layers)?;
        self.methods.ingest_file(path, &deps)?;

        let keys = dependency_keys(&deps);
        let dependency_hash = hash_strings(keys.iter().map(String::as_str));
        guard(&self.store).track(path, stamp, content_hash, dependency_hash, state);

        let previous = guard(&self.results).insert(path.to_path_buf(), deps.clone());
        Counters::bump(&self.counters.analyzed);

        let changed = match previous {
            Some(previous) => self.record_change(path, previous, &deps),
            None => false,
        };
        trace!(path = %path.display(), ?state, deps = deps.len(), changed, "analyzed");

        Ok(IncrementalOutcome {
            path: path.to_path_buf(),
            state,
            dependencies: deps,
            reused: false,
            changed,
        })
    }

    fn reuse(&self, path: &Path) -> Option<IncrementalOutcome> {
        let deps = guard(&self.results).get(path).cloned()?;
        if let Some(fp) = guard(&self.store).get_mut(path) {
            fp.state = FileState::Unchanged;
        }
        Counters::bump(&self.counters.skipped);
        trace!(path = %path.display(), "unchanged, reusing previous result");
        Some(IncrementalOutcome {
            path: path.to_path_buf(),
            state: FileState::Unchanged,
            dependencies: deps,
            reused: true,
            changed: false,
        })
    }

    fn read(&self, path: &Path) -> Result<(Arc<str>, FileStamp), PipelineError> {
        let Some(cache) = self.files.as_deref() else {
            return Ok(read_file(path)?);
        };
        if let Some(hit) = cache.get_stamped(path) {
            Counters::bump(&self.counters.cache_hits);
            return Ok(hit);
        }
        let (content, stamp) = read_file(path)?;
        if let Err(e) = cache.put(path, Arc::clone(&content), stamp) {
            debug!(path = %path.display(), error = %e, "file not cached");
        }
        Ok((content, stamp))
    }

    /// Push a change when the `layer:target` set differs from `previous`.
    fn record_change(&self, path: &Path, previous: Vec<ExtractedDependency>, current: &[ExtractedDependency]) -> bool {
        let before: FxHashSet<String> = dependency_keys(&previous).into_iter().collect();
        let after: FxHashSet<String> = dependency_keys(current).into_iter().collect();

        let mut added: Vec<String> = after.difference(&before).cloned().collect();
        let mut removed: Vec<String> = before.difference(&after).cloned().collect();
        if added.is_empty() && removed.is_empty() {
            return false;
        }
        added.sort();
        removed.sort();

        let layers = previous
            .iter()
            .chain(current)
            .filter(|d| {
                let key = format!("{}:{}", d.layer, d.target);
                before.contains(&key) != after.contains(&key)
            })
            .fold(LayerMask::NONE, |mask, d| mask.with(d.layer));

        debug!(
            path = %path.display(),
            added = added.len(),
            removed = removed.len(),
            "dependencies changed"
        );
        guard(&self.changes).push(DependencyChange {
            path: path.to_path_buf(),
            previous,
            current: current.to_vec(),
            added,
            removed,
            layers,
            timestamp: unix_now(),
        });
        Counters::bump(&self.counters.changes);
        true
    }

    /// Forget tracked files that are gone from disk. Paths in `seen` were
    /// found by the current walk and are kept. Returns the deleted paths.
    pub fn detect_deleted(&self, seen: &[PathBuf]) -> Result<Vec<PathBuf>, PipelineError> {
        let seen: FxHashSet<&Path> = seen.iter().map(PathBuf::as_path).collect();
        let gone: Vec<FileFingerprint> = {
            let mut store = guard(&self.store);
            store
                .paths()
                .into_iter()
                .filter(|p| !seen.contains(p.as_path()) && !p.exists())
                .filter_map(|p| store.remove(&p))
                .collect()
        };

        let mut paths = Vec::with_capacity(gone.len());
        for mut fingerprint in gone {
            let path = fingerprint.path.clone();
            self.methods.remove_file(&path)?;
            if let Some(cache) = self.files.as_deref() {
                cache.invalidate(&path);
            }
            let previous = guard(&self.results).remove(&path).unwrap_or_default();
            if !previous.is_empty() {
                self.record_change(&path, previous, &[]);
            }
            fingerprint.state = FileState::Deleted;
            guard(&self.deleted).push(fingerprint);
            Counters::bump(&self.counters.deleted);
            debug!(path = %path.display(), "tracked file deleted");
            paths.push(path);
        }
        Ok(paths)
    }

    /// Pair newly seen files with deleted ones of identical content.
    /// Returns `(from, to)` pairs; matched entries are marked Moved.
    pub fn detect_moves(&self) -> Vec<(PathBuf, PathBuf)> {
        let mut deleted = guard(&self.deleted);
        if deleted.is_empty() {
            return Vec::new();
        }
        let mut store = guard(&self.store);
        let mut moves = Vec::new();
        for path in store.paths() {
            let Some(fp) = store.get_mut(&path) else { continue };
            if fp.state != FileState::New {
                continue;
            }
            let Some(pos) = deleted.iter().position(|d| d.content_hash == fp.content_hash) else {
                continue;
            };
            let old = deleted.remove(pos);
            fp.state = FileState::Moved;
            fp.moved_from = Some(old.path.clone());
            moves.push((old.path, path));
        }
        if !moves.is_empty() {
            self.counters.moved.fetch_add(moves.len() as u64, Ordering::Relaxed);
            info!(moves = moves.len(), "moved files detected");
        }
        moves
    }

    pub fn changes(&self) -> Vec<DependencyChange> {
        guard(&self.changes).clone()
    }

    pub fn take_changes(&self) -> Vec<DependencyChange> {
        std::mem::take(&mut *guard(&self.changes))
    }

    pub fn fingerprint(&self, path: &Path) -> Option<FileFingerprint> {
        guard(&self.store).get(path).cloned()
    }

    pub fn result_of(&self, path: &Path) -> Option<Vec<ExtractedDependency>> {
        guard(&self.results).get(path).cloned()
    }

    pub fn stats(&self) -> IncrementalStats {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        IncrementalStats {
            tracked: guard(&self.store).len(),
            analyzed: load(&self.counters.analyzed),
            skipped: load(&self.counters.skipped),
            cache_hits: load(&self.counters.cache_hits),
            changes: load(&self.counters.changes),
            deleted: load(&self.counters.deleted),
            moved: load(&self.counters.moved),
        }
    }

    /// Force the next `analyze` of `path` to re-extract.
    pub fn invalidate(&self, path: &Path) {
        guard(&self.store).remove(path);
        guard(&self.results).remove(path);
        if let Some(cache) = self.files.as_deref() {
            cache.invalidate(path);
        }
    }

    pub fn clear(&self) {
        guard(&self.store).clear();
        guard(&self.results).clear();
        guard(&self.changes).clear();
        guard(&self.deleted).clear();
        self.counters.reset();
    }

    /// Replace in-memory state with the contents of `path` and re-ingest
    /// the loaded results into the method table. A missing file leaves the
    /// store empty; an unusable one is logged and ignored. Returns the
    /// number of fingerprints loaded.
    pub fn load_state(&self, path: &Path) -> usize {
        let persisted = match state::read_state(path) {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                debug!(path = %path.display(), "no incremental state yet");
                return 0;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unusable incremental state");
                return 0;
            }
        };

        let store = FingerprintStore::from_fingerprints(persisted.fingerprints);
        let mut results = FxHashMap::default();
        for result in persisted.results {
            if !store.contains(&result.path) {
                continue;
            }
            if let Err(e) = self.methods.ingest_file(&result.path, &result.dependencies) {
                warn!(path = %result.path.display(), error = %e, "failed to restore methods");
            }
            results.insert(result.path, result.dependencies);
        }

        let loaded = store.len();
        *guard(&self.store) = store;
        *guard(&self.results) = results;
        info!(path = %path.display(), fingerprints = loaded, "incremental state loaded");
        loaded
    }

    pub fn save_state(&self, path: &Path) -> Result<(), StateError> {
        let fingerprints = guard(&self.store).fingerprints();
        let mut results: Vec<PersistedResult> = guard(&self.results)
            .iter()
            .map(|(path, deps)| PersistedResult {
                path: path.clone(),
                dependencies: deps.clone(),
            })
            .collect();
        results.sort_by(|a, b| a.path.cmp(&b.path));
        state::write_state(path, &PersistedState::new(fingerprints, results))
    }
}

impl Drop for IncrementalCoordinator {
    fn drop(&mut self) {
        if !self.options.auto_save {
            return;
        }
        if let Some(path) = self.options.state_file.clone() {
            if let Err(e) = self.save_state(&path) {
                warn!(path = %path.display(), error = %e, "auto-save of incremental state failed");
            }
        }
    }
}
