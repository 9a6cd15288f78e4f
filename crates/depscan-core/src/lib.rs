//! Core building blocks shared by every depscan crate.
//!
//! Errors, layered configuration, tracing setup, collection aliases, and
//! constants. Nothing in here touches the filesystem except config loading.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

pub use config::DepscanConfig;
pub use errors::{DepscanErrorCode, PipelineError, PipelineResult};
