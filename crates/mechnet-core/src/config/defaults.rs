// Single source of truth for all default values.

// --- Pathfinding ---
pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const DEFAULT_MAX_RESULTS: usize = 50;
pub const DEFAULT_TOP_K: usize = 5;

// --- Traversal ---
pub const DEFAULT_MAX_DEGREES: usize = 3;

// --- Weighting ---
pub const DEFAULT_LITERATURE_CI_LEVEL: f64 = 0.95;
pub const DEFAULT_CREDIBLE_LEVEL: f64 = 0.95;
pub const DEFAULT_SAMPLING_DRAWS: usize = 20_000;

// --- Propagation ---
pub const DEFAULT_N_SAMPLES: usize = 1_000;
pub const DEFAULT_SEED: u64 = 0x5eed_cafe_f00d;
pub const DEFAULT_INTERVAL_LEVEL: f64 = 0.90;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "mechnet=info";
pub const LOG_ENV_VAR: &str = "MECHNET_LOG";
