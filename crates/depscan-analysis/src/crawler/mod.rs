//! Crawler: end-to-end analysis of one or more source roots.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Crawler;
pub use types::{CrawlMode, CrawlStats, DependencyGraph, FileFailure};
