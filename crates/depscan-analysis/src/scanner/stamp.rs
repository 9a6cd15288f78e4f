//! Size and mtime snapshot used for change detection.

use std::fs::Metadata;
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FileStamp {
    pub size: u64,
    pub mtime_secs: i64,
    pub mtime_nanos: u32,
}

impl FileStamp {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let (mtime_secs, mtime_nanos) = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| (d.as_secs() as i64, d.subsec_nanos()))
            .unwrap_or((0, 0));
        Self {
            size: metadata.len(),
            mtime_secs,
            mtime_nanos,
        }
    }

    /// Stat `path`.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        std::fs::metadata(path).map(|m| Self::from_metadata(&m))
    }

    /// True when `path` is missing or its size or mtime differ from `self`.
    pub fn is_stale(&self, path: &Path) -> bool {
        match Self::read(path) {
            Ok(current) => current != *self,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_stale() {
        let stamp = FileStamp::default();
        assert!(stamp.is_stale(Path::new("/definitely/not/here.rs")));
    }

    #[test]
    fn fresh_stamp_is_not_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "import os\n").unwrap();
        let stamp = FileStamp::read(&path).unwrap();
        assert_eq!(stamp.size, 10);
        assert!(!stamp.is_stale(&path));
        std::fs::write(&path, "import numpy\n").unwrap();
        assert!(stamp.is_stale(&path));
    }
}
