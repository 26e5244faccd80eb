//! Configuration system for mechnet.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod defaults;
pub mod mechnet_config;
pub mod pathfinding_config;
pub mod propagation_config;
pub mod traversal_config;
pub mod weighting_config;

pub use mechnet_config::{ConfigOverrides, MechnetConfig};
pub use pathfinding_config::PathfindingConfig;
pub use propagation_config::PropagationConfig;
pub use traversal_config::TraversalConfig;
pub use weighting_config::{CovariateShift, WeightingConfig};
