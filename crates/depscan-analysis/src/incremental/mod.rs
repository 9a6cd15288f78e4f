//! Incremental analysis: fingerprints, change detection, persisted state.

pub mod coordinator;
pub mod fingerprint;
pub mod state;
pub mod types;

pub use coordinator::IncrementalCoordinator;
pub use fingerprint::FingerprintStore;
pub use types::{
    DependencyChange, FileFingerprint, FileState, IncrementalOptions, IncrementalOutcome,
    IncrementalStats,
};
