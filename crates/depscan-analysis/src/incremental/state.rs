//! Versioned JSON persistence for incremental state.
//!
//! Writes go to a sibling temp file that is renamed over the target while
//! an exclusive lock is held on `<state>.lock`.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use depscan_core::constants::STATE_FORMAT_VERSION;
use depscan_core::errors::StateError;

use super::types::FileFingerprint;
use crate::extractors::ExtractedDependency;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    pub fingerprints: Vec<FileFingerprint>,
    pub results: Vec<PersistedResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedResult {
    pub path: PathBuf,
    pub dependencies: Vec<ExtractedDependency>,
}

impl PersistedState {
    pub fn new(fingerprints: Vec<FileFingerprint>, results: Vec<PersistedResult>) -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            fingerprints,
            results,
        }
    }
}

/// Read a state file. `Ok(None)` when it does not exist.
pub fn read_state(path: &Path) -> Result<Option<PersistedState>, StateError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StateError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let state: PersistedState = serde_json::from_slice(&bytes).map_err(|e| StateError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if state.version != STATE_FORMAT_VERSION {
        return Err(StateError::VersionMismatch {
            path: path.to_path_buf(),
            found: state.version,
            expected: STATE_FORMAT_VERSION,
        });
    }
    Ok(Some(state))
}

/// Atomically replace the state file.
pub fn write_state(path: &Path, state: &PersistedState) -> Result<(), StateError> {
    let io_err = |source| StateError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(sibling(path, "lock"))
        .map_err(io_err)?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock.try_write().map_err(|_| StateError::Locked {
        path: path.to_path_buf(),
    })?;

    let json = serde_json::to_vec_pretty(state).map_err(|e| StateError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let tmp = sibling(path, "tmp");
    {
        let mut file = fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(&json).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
    }
    fs::rename(&tmp, path).map_err(io_err)?;

    debug!(
        path = %path.display(),
        fingerprints = state.fingerprints.len(),
        bytes = json.len(),
        "incremental state saved"
    );
    Ok(())
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incremental::types::FileState;
    use crate::scanner::stamp::FileStamp;

    fn fingerprint(path: &str) -> FileFingerprint {
        FileFingerprint {
            path: PathBuf::from(path),
            stamp: FileStamp {
                size: 10,
                mtime_secs: 1_700_000_000,
                mtime_nanos: 5,
            },
            content_hash: 42,
            dependency_hash: 7,
            state: FileState::New,
            last_analyzed: 1_700_000_001,
            moved_from: None,
        }
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_state(&dir.path().join("absent.json")).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state.json");
        let state = PersistedState::new(vec![fingerprint("a.py")], Vec::new());
        write_state(&path, &state).unwrap();

        let loaded = read_state(&path).unwrap().unwrap();
        assert_eq!(loaded.fingerprints, state.fingerprints);
        assert!(!dir.path().join("nested/state.json.tmp").exists());
    }

    #[test]
    fn corrupt_and_version_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_state(&path), Err(StateError::Corrupt { .. })));

        fs::write(&path, r#"{"version":999,"fingerprints":[],"results":[]}"#).unwrap();
        assert!(matches!(
            read_state(&path),
            Err(StateError::VersionMismatch { found: 999, .. })
        ));
    }
}
