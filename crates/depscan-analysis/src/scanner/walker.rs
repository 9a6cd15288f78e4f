//! Depth-first directory walk.
//!
//! Hidden entries and well-known dependency directories are skipped.
//! Entries are visited in sorted order so the file list is deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use depscan_core::config::ScanConfig;
use depscan_core::constants::DEFAULT_IGNORE_DIRS;
use depscan_core::errors::ScanError;
use depscan_core::traits::{Cancellable, CancellationToken};
use depscan_core::types::FxHashSet;

/// Walk settings resolved from [`ScanConfig`].
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory levels below each root to descend; `None` is unlimited.
    pub max_depth: Option<usize>,
    pub max_file_size: u64,
    pub exclude: Vec<String>,
    pub follow_symlinks: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl ScanOptions {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_file_size: config.effective_max_file_size(),
            exclude: config.exclude.clone(),
            follow_symlinks: config.effective_follow_symlinks(),
        }
    }
}

/// Files found by a walk plus what was left out.
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub files: Vec<PathBuf>,
    pub skipped_excluded: usize,
    pub skipped_too_large: usize,
    /// Unreadable nested entries; the walk continued past them.
    pub errors: Vec<ScanError>,
}

struct Walker<'a> {
    options: &'a ScanOptions,
    exclude: GlobSet,
    cancel: &'a CancellationToken,
    visited: FxHashSet<PathBuf>,
    out: WalkOutput,
}

/// Walk every root. A root that is a file is yielded as-is; a root that
/// is missing or unreadable is an error.
pub fn walk(
    roots: &[PathBuf],
    options: &ScanOptions,
    cancel: &CancellationToken,
) -> Result<WalkOutput, ScanError> {
    let mut walker = Walker {
        options,
        exclude: build_exclude(&options.exclude)?,
        cancel,
        visited: FxHashSet::default(),
        out: WalkOutput::default(),
    };

    for root in roots {
        let metadata = fs::metadata(root).map_err(|_| ScanError::InvalidRoot { path: root.clone() })?;
        if metadata.is_file() {
            walker.consider_file(root, metadata.len());
            continue;
        }
        let entries = fs::read_dir(root).map_err(|source| ScanError::IoError {
            path: root.clone(),
            source,
        })?;
        if options.follow_symlinks {
            if let Ok(canonical) = root.canonicalize() {
                walker.visited.insert(canonical);
            }
        }
        walker.walk_entries(root, root, entries, 0)?;
    }

    debug!(
        files = walker.out.files.len(),
        excluded = walker.out.skipped_excluded,
        too_large = walker.out.skipped_too_large,
        "walk finished"
    );
    Ok(walker.out)
}

fn build_exclude(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidExclude {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidExclude {
        pattern: patterns.join(","),
        message: e.to_string(),
    })
}

impl Walker<'_> {
    fn walk_dir(&mut self, root: &Path, dir: &Path, depth: usize) -> Result<(), ScanError> {
        match fs::read_dir(dir) {
            Ok(entries) => self.walk_entries(root, dir, entries, depth),
            Err(source) => {
                debug!(path = %dir.display(), error = %source, "skipping unreadable directory");
                self.out.errors.push(ScanError::IoError {
                    path: dir.to_path_buf(),
                    source,
                });
                Ok(())
            }
        }
    }

    fn walk_entries(
        &mut self,
        root: &Path,
        dir: &Path,
        entries: fs::ReadDir,
        depth: usize,
    ) -> Result<(), ScanError> {
        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            if self.cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if self.exclude.is_match(relative) {
                self.out.skipped_excluded += 1;
                continue;
            }

            let link = fs::symlink_metadata(&path);
            let is_link = link.as_ref().is_ok_and(|m| m.file_type().is_symlink());
            if is_link && !self.options.follow_symlinks {
                continue;
            }
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(source) => {
                    self.out.errors.push(ScanError::IoError { path: path.clone(), source });
                    continue;
                }
            };

            if metadata.is_dir() {
                if DEFAULT_IGNORE_DIRS.contains(&name) {
                    continue;
                }
                if self.options.max_depth.is_some_and(|max| depth >= max) {
                    continue;
                }
                if is_link {
                    let Ok(canonical) = path.canonicalize() else { continue };
                    if !self.visited.insert(canonical) {
                        continue;
                    }
                }
                self.walk_dir(root, &path, depth + 1)?;
            } else if metadata.is_file() {
                self.consider_file(&path, metadata.len());
            }
        }
        Ok(())
    }

    fn consider_file(&mut self, path: &Path, size: u64) {
        if size > self.options.max_file_size {
            debug!(path = %path.display(), size, max = self.options.max_file_size, "skipping large file");
            self.out.skipped_too_large += 1;
            return;
        }
        self.out.files.push(path.to_path_buf());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("b.rs"), "fn b() {}").unwrap();
        fs::write(root.join("a.py"), "import os").unwrap();
        fs::write(root.join(".hidden.rs"), "").unwrap();
        fs::write(root.join("src/lib.rs"), "mod x;").unwrap();
        fs::write(root.join("src/nested/deep.go"), "package deep").unwrap();
        fs::write(root.join(".git/config"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        dir
    }

    fn relative(dir: &Path, out: &WalkOutput) -> Vec<String> {
        out.files
            .iter()
            .map(|p| p.strip_prefix(dir).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn sorted_and_skips_hidden_and_dependency_dirs() {
        let dir = tree();
        let out = walk(&[dir.path().to_path_buf()], &ScanOptions::default(), &CancellationToken::new()).unwrap();
        assert_eq!(relative(dir.path(), &out), vec!["a.py", "b.rs", "src/lib.rs", "src/nested/deep.go"]);
    }

    #[test]
    fn max_depth_limits_descent() {
        let dir = tree();
        let options = ScanOptions {
            max_depth: Some(1),
            ..ScanOptions::default()
        };
        let out = walk(&[dir.path().to_path_buf()], &options, &CancellationToken::new()).unwrap();
        assert_eq!(relative(dir.path(), &out), vec!["a.py", "b.rs", "src/lib.rs"]);
    }

    #[test]
    fn exclude_globs_and_size_limit() {
        let dir = tree();
        let options = ScanOptions {
            exclude: vec!["src/nested".into(), "*.py".into()],
            max_file_size: 8,
            ..ScanOptions::default()
        };
        let out = walk(&[dir.path().to_path_buf()], &options, &CancellationToken::new()).unwrap();
        assert_eq!(relative(dir.path(), &out), vec!["src/lib.rs"]);
        assert_eq!(out.skipped_excluded, 2);
        assert_eq!(out.skipped_too_large, 1);
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = walk(&[PathBuf::from("/no/such/root")], &ScanOptions::default(), &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidRoot { .. }));
    }

    #[test]
    fn invalid_exclude_pattern() {
        let options = ScanOptions {
            exclude: vec!["a[".into()],
            ..ScanOptions::default()
        };
        let err = walk(&[], &options, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, ScanError::InvalidExclude { .. }));
    }

    #[test]
    fn cancelled_walk_stops() {
        let dir = tree();
        let token = CancellationToken::new();
        token.cancel();
        let err = walk(&[dir.path().to_path_buf()], &ScanOptions::default(), &token).unwrap_err();
        assert!(matches!(err, ScanError::Cancelled));
    }

    #[test]
    fn file_root_is_yielded() {
        let dir = tree();
        let file = dir.path().join("b.rs");
        let out = walk(&[file.clone()], &ScanOptions::default(), &CancellationToken::new()).unwrap();
        assert_eq!(out.files, vec![file]);
    }
}
