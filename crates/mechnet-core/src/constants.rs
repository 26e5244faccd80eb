//! Numeric floors and documented tolerances shared across the engine.

/// Smallest weight any evidence or sampled value is allowed to take.
/// Values at or below zero are raised to this and annotated with a warning.
pub const EPSILON_WEIGHT: f64 = 1e-9;

/// Smallest log-space standard deviation used for priors and context observations.
pub const MIN_LOG_SD: f64 = 1e-6;

/// Max relative error between the sampling and analytic posterior point estimates
/// when the sampling path runs with at least `SAMPLING_MIN_DRAWS` draws.
pub const SAMPLING_TOLERANCE: f64 = 0.02;

/// Max relative error between sampling and analytic credible interval bounds.
pub const SAMPLING_INTERVAL_TOLERANCE: f64 = 0.05;

/// Draw count at which the sampling tolerances above are documented to hold.
pub const SAMPLING_MIN_DRAWS: usize = 20_000;

/// Max relative spread of the geometric-mean aggregate's mean across seeds
/// at 10 000 Monte Carlo samples.
pub const CONVERGENCE_TOLERANCE: f64 = 0.05;

/// Crate version, surfaced in engine logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
