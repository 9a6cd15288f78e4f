//! Bounded LRU cache of file contents.
//!
//! Bounded by entry count and total bytes; whichever is exceeded first
//! triggers eviction from the least-recently-used end. Entries are
//! validated against the file's size and mtime on every hit.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use depscan_core::config::CacheConfig;
use depscan_core::errors::CacheError;

use crate::scanner::stamp::FileStamp;

/// One cached file.
#[derive(Debug, Clone)]
pub struct CachedFile {
    pub path: PathBuf,
    pub content: Arc<str>,
    /// Size and mtime when the content was loaded.
    pub stamp: FileStamp,
    pub cached_at: SystemTime,
    pub access_count: u64,
}

impl CachedFile {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCacheStats {
    pub entries: usize,
    pub bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
    /// Entries refused because they alone exceed the byte budget.
    pub rejected: u64,
}

impl FileCacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Inner {
    entries: LruCache<PathBuf, CachedFile>,
    bytes: usize,
    stats: FileCacheStats,
}

impl Inner {
    fn remove(&mut self, path: &Path) -> bool {
        match self.entries.pop(path) {
            Some(old) => {
                self.bytes = self.bytes.saturating_sub(old.size());
                true
            }
            None => false,
        }
    }
}

pub struct FileCache {
    inner: Mutex<Inner>,
    max_entries: usize,
    max_bytes: usize,
}

impl FileCache {
    pub fn new(max_entries: usize, max_bytes: usize) -> Result<Self, CacheError> {
        if max_entries == 0 || max_bytes == 0 {
            return Err(CacheError::InvalidLimits {
                message: format!("max_entries={max_entries}, max_bytes={max_bytes}; both must be > 0"),
            });
        }
        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                bytes: 0,
                stats: FileCacheStats::default(),
            }),
            max_entries,
            max_bytes,
        })
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        Self::new(config.effective_max_entries(), config.effective_max_bytes())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached content for `path`. A stale entry (file changed or gone) is
    /// dropped and reported as a miss.
    pub fn get(&self, path: &Path) -> Option<Arc<str>> {
        self.get_stamped(path).map(|(content, _)| content)
    }

    /// Like [`get`](Self::get), plus the stamp the hit was validated against.
    pub fn get_stamped(&self, path: &Path) -> Option<(Arc<str>, FileStamp)> {
        let mut inner = self.lock();
        let stale = inner
            .entries
            .get(path)
            .map(|entry| Self::is_modified(path, &entry.stamp));
        let Some(stale) = stale else {
            inner.stats.misses += 1;
            return None;
        };
        if stale {
            inner.remove(path);
            inner.stats.invalidations += 1;
            inner.stats.misses += 1;
            trace!(path = %path.display(), "stale cache entry dropped");
            return None;
        }
        inner.stats.hits += 1;
        let entry = inner.entries.get_mut(path)?;
        entry.access_count += 1;
        Some((Arc::clone(&entry.content), entry.stamp))
    }

    /// Insert or replace `path`, evicting least-recently-used entries until
    /// both bounds hold again.
    pub fn put(&self, path: &Path, content: Arc<str>, stamp: FileStamp) -> Result<(), CacheError> {
        let size = content.len();
        if size > self.max_bytes {
            self.lock().stats.rejected += 1;
            return Err(CacheError::EntryTooLarge {
                path: path.to_path_buf(),
                size,
                budget: self.max_bytes,
            });
        }

        let mut inner = self.lock();
        inner.remove(path);
        inner.entries.put(
            path.to_path_buf(),
            CachedFile {
                path: path.to_path_buf(),
                content,
                stamp,
                cached_at: SystemTime::now(),
                access_count: 0,
            },
        );
        inner.bytes += size;

        while inner.entries.len() > self.max_entries || inner.bytes > self.max_bytes {
            let Some((evicted, old)) = inner.entries.pop_lru() else {
                break;
            };
            inner.bytes = inner.bytes.saturating_sub(old.size());
            inner.stats.evictions += 1;
            trace!(path = %evicted.display(), "evicted from file cache");
        }
        Ok(())
    }

    /// Drop `path` if cached. Returns whether an entry was removed.
    pub fn invalidate(&self, path: &Path) -> bool {
        let mut inner = self.lock();
        let removed = inner.remove(path);
        if removed {
            inner.stats.invalidations += 1;
        }
        removed
    }

    /// Membership check that does not touch recency.
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().entries.contains(path)
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.bytes = 0;
    }

    /// True when the file is gone or its size or mtime no longer match.
    pub fn is_modified(path: &Path, stamp: &FileStamp) -> bool {
        stamp.is_stale(path)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> FileCacheStats {
        let inner = self.lock();
        FileCacheStats {
            entries: inner.entries.len(),
            bytes: inner.bytes,
            ..inner.stats
        }
    }

    /// Cached content, or read it from disk and cache it. Files too large
    /// for the byte budget are returned without being cached. Invalid UTF-8
    /// is replaced rather than rejected.
    pub fn read_through(&self, path: &Path) -> Result<Arc<str>, CacheError> {
        if let Some(content) = self.get(path) {
            return Ok(content);
        }
        let (content, stamp) = read_file(path)?;
        match self.put(path, Arc::clone(&content), stamp) {
            Ok(()) => {}
            Err(CacheError::EntryTooLarge { size, budget, .. }) => {
                debug!(path = %path.display(), size, budget, "file not cached, larger than budget");
            }
            Err(e) => return Err(e),
        }
        Ok(content)
    }
}

/// Read a file as text along with the stamp taken just before reading.
pub fn read_file(path: &Path) -> Result<(Arc<str>, FileStamp), CacheError> {
    let read_err = |source| CacheError::Read {
        path: path.to_path_buf(),
        source,
    };
    let stamp = FileStamp::read(path).map_err(read_err)?;
    let bytes = std::fs::read(path).map_err(read_err)?;
    let content: Arc<str> = match String::from_utf8(bytes) {
        Ok(text) => Arc::from(text),
        Err(e) => Arc::from(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    };
    Ok((content, stamp))
}
