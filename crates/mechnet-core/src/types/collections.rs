//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec sized for a DFS branch under the default depth bound (6).
pub type SmallVec8<T> = SmallVec<[T; 8]>;
