//! Scanner subsystem: file discovery, language detection, content hashing.

pub mod hasher;
pub mod language_detect;
pub mod stamp;
pub mod walker;

pub use language_detect::Language;
pub use stamp::FileStamp;
pub use walker::{walk, ScanOptions, WalkOutput};
