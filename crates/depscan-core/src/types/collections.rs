//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for capture-group indices.
pub type SmallVec4<T> = SmallVec<[T; 4]>;
