//! Fingerprint store: per-file change state machine.

use std::path::{Path, PathBuf};

use depscan_core::types::FxHashMap;

use super::types::{unix_now, FileFingerprint, FileState};
use crate::scanner::stamp::FileStamp;

#[derive(Debug, Default, Clone)]
pub struct FingerprintStore {
    entries: FxHashMap<PathBuf, FileFingerprint>,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fingerprints(fingerprints: impl IntoIterator<Item = FileFingerprint>) -> Self {
        Self {
            entries: fingerprints.into_iter().map(|f| (f.path.clone(), f)).collect(),
        }
    }

    /// Untracked → New; stat fails → Deleted; size and mtime equal →
    /// Unchanged; otherwise Modified.
    pub fn state_of(&self, path: &Path) -> FileState {
        let Some(known) = self.entries.get(path) else {
            return FileState::New;
        };
        match FileStamp::read(path) {
            Err(_) => FileState::Deleted,
            Ok(current) if current == known.stamp => FileState::Unchanged,
            Ok(_) => FileState::Modified,
        }
    }

    /// Like [`state_of`](Self::state_of), deciding by content hash.
    pub fn state_by_hash(&self, path: &Path, content_hash: u64) -> FileState {
        match self.entries.get(path) {
            None => FileState::New,
            Some(known) if known.content_hash == content_hash => FileState::Unchanged,
            Some(_) => FileState::Modified,
        }
    }

    /// Record a fresh analysis of `path`.
    pub fn track(
        &mut self,
        path: &Path,
        stamp: FileStamp,
        content_hash: u64,
        dependency_hash: u64,
        state: FileState,
    ) {
        self.entries.insert(
            path.to_path_buf(),
            FileFingerprint {
                path: path.to_path_buf(),
                stamp,
                content_hash,
                dependency_hash,
                state,
                last_analyzed: unix_now(),
                moved_from: None,
            },
        );
    }

    /// Refresh the stamp and state of an entry without re-analysis.
    pub fn touch(&mut self, path: &Path, stamp: FileStamp, state: FileState) {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.stamp = stamp;
            entry.state = state;
        }
    }

    pub fn get(&self, path: &Path) -> Option<&FileFingerprint> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut FileFingerprint> {
        self.entries.get_mut(path)
    }

    pub fn remove(&mut self, path: &Path) -> Option<FileFingerprint> {
        self.entries.remove(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Tracked paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.entries.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Fingerprints sorted by path.
    pub fn fingerprints(&self) -> Vec<FileFingerprint> {
        let mut all: Vec<FileFingerprint> = self.entries.values().cloned().collect();
        all.sort_by(|a, b| a.path.cmp(&b.path));
        all
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_machine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.go");
        std::fs::write(&path, "package a\n").unwrap();

        let mut store = FingerprintStore::new();
        assert_eq!(store.state_of(&path), FileState::New);

        store.track(&path, FileStamp::read(&path).unwrap(), 1, 2, FileState::New);
        assert_eq!(store.state_of(&path), FileState::Unchanged);

        std::fs::write(&path, "package ab\n").unwrap();
        assert_eq!(store.state_of(&path), FileState::Modified);

        std::fs::remove_file(&path).unwrap();
        assert_eq!(store.state_of(&path), FileState::Deleted);
    }

    #[test]
    fn hash_based_state() {
        let mut store = FingerprintStore::new();
        let path = Path::new("x.rs");
        assert_eq!(store.state_by_hash(path, 7), FileState::New);
        store.track(path, FileStamp::default(), 7, 0, FileState::New);
        assert_eq!(store.state_by_hash(path, 7), FileState::Unchanged);
        assert_eq!(store.state_by_hash(path, 8), FileState::Modified);
    }
}
