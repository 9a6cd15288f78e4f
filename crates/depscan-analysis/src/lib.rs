//! depscan-analysis: the dependency extraction engine.
//!
//! - Grammar: per-language regex tables for the module, struct, and method layers
//! - Patterns: compiled pattern cache, built once and shared read-only
//! - Extractors: per-language extraction of imports, type declarations, and methods
//! - Call graph: process-wide method table with cross-file references and cycles
//! - Structures: type declarations and the files that mention them
//! - Cache: bounded LRU of file contents validated by size and mtime
//! - Incremental: fingerprints, change records, persisted state
//! - Dispatcher: bounded work queue and worker pool
//! - Scanner and crawler: directory walk and end-to-end orchestration

pub mod cache;
pub mod call_graph;
pub mod crawler;
pub mod dispatcher;
pub mod extractors;
pub mod grammar;
pub mod incremental;
pub mod patterns;
pub mod scanner;
pub mod structures;

pub use call_graph::{MethodDefinition, MethodTable};
pub use crawler::{Crawler, DependencyGraph};
pub use extractors::{extract, extract_language, DependencyDetail, ExtractedDependency};
pub use grammar::{Layer, LayerMask};
pub use patterns::PatternCache;
pub use scanner::Language;
pub use structures::{StructureEntry, StructureIndex};
