//! Bounded upstream traversal: the "crisis subgraph" of causes feeding a
//! set of target factors.

pub mod types;
mod upstream;

pub use types::{Subgraph, SubgraphNode, SubgraphReason, SubgraphSummary, UpstreamQuery};
pub use upstream::explore_upstream;
