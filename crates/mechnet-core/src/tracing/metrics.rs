//! Structured span field definitions for mechnet query metrics.
//!
//! Consistent field names keep log queries and dashboards uniform across
//! the query services.

/// Pathfinding: wall time of one `find_paths` call in microseconds.
pub const PATHFINDING_TIME: &str = "pathfinding_time_us";

/// Traversal: wall time of one `explore_upstream` call in microseconds.
pub const TRAVERSAL_TIME: &str = "traversal_time_us";

/// Weighting: wall time of one posterior computation in microseconds.
pub const WEIGHTING_TIME: &str = "weighting_time_us";

/// Propagation: wall time of one `propagate` call in microseconds.
pub const PROPAGATION_TIME: &str = "propagation_time_us";

/// Pathfinding: number of paths returned.
pub const PATHS_RETURNED: &str = "paths_returned";

/// Traversal: number of nodes in the resulting subgraph.
pub const NODES_VISITED: &str = "nodes_visited";
