//! Top-level depscan configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, CacheConfig, PerformanceConfig, ScanConfig};
use crate::constants::{LAYER_NAMES, MAX_THREAD_COUNT, PROJECT_CONFIG_FILE};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sections.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`DEPSCAN_*`)
/// 3. Project config (`depscan.toml` in the project root)
/// 4. User config (`~/.depscan/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DepscanConfig {
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
    pub performance: PerformanceConfig,
    pub cache: CacheConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub max_depth: Option<usize>,
    pub threads: Option<usize>,
    pub parallel: Option<bool>,
    pub incremental: Option<bool>,
    pub cache_enabled: Option<bool>,
    pub state_file: Option<PathBuf>,
    pub layers: Vec<String>,
    pub exclude: Vec<String>,
}

impl DepscanConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. Unreadable user config is not fatal,
        // malformed TOML is.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        ::tracing::warn!(path = %user_config_path.display(), error = %err, "ignoring user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load only from an explicit file, then apply env and CLI layers.
    pub fn load_file(path: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::merge_toml_file(&mut config, path)?;
        Self::apply_env_overrides(&mut config);
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &DepscanConfig) -> Result<(), ConfigError> {
        if let Some(threads) = config.performance.threads {
            if threads == 0 || threads > MAX_THREAD_COUNT {
                return Err(ConfigError::ValidationFailed {
                    field: "performance.threads".to_string(),
                    message: format!("must be between 1 and {MAX_THREAD_COUNT}"),
                });
            }
        }
        if config.performance.queue_capacity == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "performance.queue_capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.cache.max_entries == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "cache.max_entries".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.cache.max_bytes == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "cache.max_bytes".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for layer in &config.analysis.layers {
            if !LAYER_NAMES.iter().any(|name| name.eq_ignore_ascii_case(layer)) {
                return Err(ConfigError::InvalidValue {
                    field: "analysis.layers".to_string(),
                    message: format!("unknown layer '{layer}', expected one of {LAYER_NAMES:?}"),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.depscan/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut DepscanConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: DepscanConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut DepscanConfig, other: &DepscanConfig) {
        // Scan
        if other.scan.max_depth.is_some() {
            base.scan.max_depth = other.scan.max_depth;
        }
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if !other.scan.exclude.is_empty() {
            base.scan.exclude = other.scan.exclude.clone();
        }
        if other.scan.follow_symlinks.is_some() {
            base.scan.follow_symlinks = other.scan.follow_symlinks;
        }

        // Analysis
        if !other.analysis.layers.is_empty() {
            base.analysis.layers = other.analysis.layers.clone();
        }
        if other.analysis.detect_cycles.is_some() {
            base.analysis.detect_cycles = other.analysis.detect_cycles;
        }
        if other.analysis.structure_index.is_some() {
            base.analysis.structure_index = other.analysis.structure_index;
        }

        // Performance
        if other.performance.parallel.is_some() {
            base.performance.parallel = other.performance.parallel;
        }
        if other.performance.threads.is_some() {
            base.performance.threads = other.performance.threads;
        }
        if other.performance.queue_capacity.is_some() {
            base.performance.queue_capacity = other.performance.queue_capacity;
        }

        // Cache
        if other.cache.enabled.is_some() {
            base.cache.enabled = other.cache.enabled;
        }
        if other.cache.max_entries.is_some() {
            base.cache.max_entries = other.cache.max_entries;
        }
        if other.cache.max_bytes.is_some() {
            base.cache.max_bytes = other.cache.max_bytes;
        }
        if other.cache.incremental.is_some() {
            base.cache.incremental = other.cache.incremental;
        }
        if other.cache.state_file.is_some() {
            base.cache.state_file = other.cache.state_file.clone();
        }
        if other.cache.verify_content_hash.is_some() {
            base.cache.verify_content_hash = other.cache.verify_content_hash;
        }
        if other.cache.track_moves.is_some() {
            base.cache.track_moves = other.cache.track_moves;
        }
        if other.cache.auto_save.is_some() {
            base.cache.auto_save = other.cache.auto_save;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `DEPSCAN_SCAN_MAX_DEPTH`, `DEPSCAN_THREADS`, etc.
    fn apply_env_overrides(config: &mut DepscanConfig) {
        if let Some(v) = env_parse::<usize>("DEPSCAN_SCAN_MAX_DEPTH") {
            config.scan.max_depth = Some(v);
        }
        if let Some(v) = env_parse::<u64>("DEPSCAN_SCAN_MAX_FILE_SIZE") {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = env_parse::<usize>("DEPSCAN_THREADS") {
            config.performance.threads = Some(v);
        }
        if let Some(v) = env_parse::<bool>("DEPSCAN_PARALLEL") {
            config.performance.parallel = Some(v);
        }
        if let Some(v) = env_parse::<bool>("DEPSCAN_INCREMENTAL") {
            config.cache.incremental = Some(v);
        }
        if let Some(v) = env_parse::<usize>("DEPSCAN_CACHE_MAX_ENTRIES") {
            config.cache.max_entries = Some(v);
        }
        if let Some(v) = env_parse::<usize>("DEPSCAN_CACHE_MAX_BYTES") {
            config.cache.max_bytes = Some(v);
        }
        if let Ok(val) = std::env::var("DEPSCAN_STATE_FILE") {
            config.cache.state_file = Some(PathBuf::from(val));
        }
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(config: &mut DepscanConfig, cli: &CliOverrides) {
        if let Some(v) = cli.max_depth {
            config.scan.max_depth = Some(v);
        }
        if let Some(v) = cli.threads {
            config.performance.threads = Some(v);
        }
        if let Some(v) = cli.parallel {
            config.performance.parallel = Some(v);
        }
        if let Some(v) = cli.incremental {
            config.cache.incremental = Some(v);
        }
        if let Some(v) = cli.cache_enabled {
            config.cache.enabled = Some(v);
        }
        if let Some(ref v) = cli.state_file {
            config.cache.state_file = Some(v.clone());
        }
        if !cli.layers.is_empty() {
            config.analysis.layers = cli.layers.clone();
        }
        if !cli.exclude.is_empty() {
            config.scan.exclude.extend(cli.exclude.iter().cloned());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

/// Returns the user-level config directory: `~/.depscan/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".depscan"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
