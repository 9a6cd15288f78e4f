//! Compiled grammar patterns, keyed by (language, layer).

pub mod cache;

pub use cache::{CompiledPattern, CompiledPatterns, PatternCache};
