//! Error handling for depscan.
//! One error enum per subsystem, `thiserror` only.

pub mod cache_error;
pub mod call_graph_error;
pub mod config_error;
pub mod dispatch_error;
pub mod error_code;
pub mod extract_error;
pub mod pattern_error;
pub mod pipeline_error;
pub mod scan_error;
pub mod state_error;

pub use cache_error::CacheError;
pub use call_graph_error::CallGraphError;
pub use config_error::ConfigError;
pub use dispatch_error::DispatchError;
pub use error_code::DepscanErrorCode;
pub use extract_error::ExtractError;
pub use pattern_error::PatternError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use scan_error::ScanError;
pub use state_error::StateError;
