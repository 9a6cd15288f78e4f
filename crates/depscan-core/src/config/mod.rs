//! Configuration system for depscan.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod analysis_config;
pub mod cache_config;
pub mod depscan_config;
pub mod performance_config;
pub mod scan_config;

pub use analysis_config::AnalysisConfig;
pub use cache_config::CacheConfig;
pub use depscan_config::{CliOverrides, DepscanConfig};
pub use performance_config::PerformanceConfig;
pub use scan_config::ScanConfig;
