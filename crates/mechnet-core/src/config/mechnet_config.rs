//! Top-level mechnet configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{PathfindingConfig, PropagationConfig, TraversalConfig, WeightingConfig};
use crate::errors::ConfigError;
use crate::types::{EvidenceGrade, GradeWeights};

/// Project config filename looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "mechnet.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`MECHNET_*`)
/// 3. Project config (`mechnet.toml` in project root)
/// 4. User config (`~/.mechnet/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MechnetConfig {
    pub pathfinding: PathfindingConfig,
    pub traversal: TraversalConfig,
    pub weighting: WeightingConfig,
    pub propagation: PropagationConfig,
}

/// Caller-supplied overrides, e.g. from a CLI or request parameters.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_depth: Option<usize>,
    pub max_results: Option<usize>,
    pub max_degrees: Option<usize>,
    pub n_samples: Option<usize>,
    pub seed: Option<u64>,
}

impl MechnetConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): explicit overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        tracing::debug!(root = %root.display(), "configuration resolved");
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &MechnetConfig) -> Result<(), ConfigError> {
        if config.pathfinding.max_depth == Some(0) {
            return Err(invalid("pathfinding.max_depth", "must be at least 1"));
        }
        if config.pathfinding.max_results == Some(0) {
            return Err(invalid("pathfinding.max_results", "must be at least 1"));
        }
        if config.pathfinding.top_k == Some(0) {
            return Err(invalid("pathfinding.top_k", "must be at least 1"));
        }
        if let Some(weights) = config.pathfinding.grade_weights {
            validate_grade_weights(&weights)?;
        }
        for (field, level) in [
            ("weighting.literature_ci_level", config.weighting.literature_ci_level),
            ("weighting.credible_level", config.weighting.credible_level),
            ("propagation.interval_level", config.propagation.interval_level),
        ] {
            if let Some(level) = level {
                if !(level > 0.0 && level < 1.0) {
                    return Err(invalid(field, "must be strictly between 0.0 and 1.0"));
                }
            }
        }
        if config.weighting.sampling_draws == Some(0) {
            return Err(invalid("weighting.sampling_draws", "must be at least 1"));
        }
        for (name, shift) in &config.weighting.covariates {
            if !shift.log_shift.is_finite() || !shift.sd.is_finite() || shift.sd < 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: format!("weighting.covariates.{name}"),
                    message: "log_shift must be finite and sd finite and non-negative"
                        .to_string(),
                });
            }
        }
        if config.propagation.n_samples == Some(0) {
            return Err(invalid("propagation.n_samples", "must be at least 1"));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.mechnet/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".mechnet").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut MechnetConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: MechnetConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut MechnetConfig, other: &MechnetConfig) {
        // Pathfinding
        if other.pathfinding.max_depth.is_some() {
            base.pathfinding.max_depth = other.pathfinding.max_depth;
        }
        if other.pathfinding.max_results.is_some() {
            base.pathfinding.max_results = other.pathfinding.max_results;
        }
        if other.pathfinding.top_k.is_some() {
            base.pathfinding.top_k = other.pathfinding.top_k;
        }
        if other.pathfinding.min_grade.is_some() {
            base.pathfinding.min_grade = other.pathfinding.min_grade;
        }
        if other.pathfinding.grade_weights.is_some() {
            base.pathfinding.grade_weights = other.pathfinding.grade_weights;
        }

        // Traversal
        if other.traversal.max_degrees.is_some() {
            base.traversal.max_degrees = other.traversal.max_degrees;
        }
        if other.traversal.min_grade.is_some() {
            base.traversal.min_grade = other.traversal.min_grade;
        }

        // Weighting
        if other.weighting.literature_ci_level.is_some() {
            base.weighting.literature_ci_level = other.weighting.literature_ci_level;
        }
        if other.weighting.credible_level.is_some() {
            base.weighting.credible_level = other.weighting.credible_level;
        }
        if other.weighting.sampling_draws.is_some() {
            base.weighting.sampling_draws = other.weighting.sampling_draws;
        }
        for (name, shift) in &other.weighting.covariates {
            base.weighting.covariates.insert(name.clone(), *shift);
        }

        // Propagation
        if other.propagation.n_samples.is_some() {
            base.propagation.n_samples = other.propagation.n_samples;
        }
        if other.propagation.default_seed.is_some() {
            base.propagation.default_seed = other.propagation.default_seed;
        }
        if other.propagation.interval_level.is_some() {
            base.propagation.interval_level = other.propagation.interval_level;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `MECHNET_PATHFINDING_MAX_DEPTH`, `MECHNET_PROPAGATION_SEED`, etc.
    fn apply_env_overrides(config: &mut MechnetConfig) {
        if let Some(v) = env_parse::<usize>("MECHNET_PATHFINDING_MAX_DEPTH") {
            config.pathfinding.max_depth = Some(v);
        }
        if let Some(v) = env_parse::<usize>("MECHNET_PATHFINDING_MAX_RESULTS") {
            config.pathfinding.max_results = Some(v);
        }
        if let Ok(val) = std::env::var("MECHNET_PATHFINDING_MIN_GRADE") {
            if let Ok(grade) = val.parse::<EvidenceGrade>() {
                config.pathfinding.min_grade = Some(grade);
            }
        }
        if let Some(v) = env_parse::<usize>("MECHNET_TRAVERSAL_MAX_DEGREES") {
            config.traversal.max_degrees = Some(v);
        }
        if let Some(v) = env_parse::<usize>("MECHNET_PROPAGATION_SAMPLES") {
            config.propagation.n_samples = Some(v);
        }
        if let Some(v) = env_parse::<u64>("MECHNET_PROPAGATION_SEED") {
            config.propagation.default_seed = Some(v);
        }
    }

    /// Apply explicit overrides (highest priority).
    pub fn apply_overrides(config: &mut MechnetConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.max_depth {
            config.pathfinding.max_depth = Some(v);
        }
        if let Some(v) = overrides.max_results {
            config.pathfinding.max_results = Some(v);
        }
        if let Some(v) = overrides.max_degrees {
            config.traversal.max_degrees = Some(v);
        }
        if let Some(v) = overrides.n_samples {
            config.propagation.n_samples = Some(v);
        }
        if let Some(v) = overrides.seed {
            config.propagation.default_seed = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn validate_grade_weights(weights: &GradeWeights) -> Result<(), ConfigError> {
    for grade in EvidenceGrade::ALL {
        let w = weights.weight(grade);
        if !w.is_finite() || w > 1.0 {
            return Err(ConfigError::ValidationFailed {
                field: format!("pathfinding.grade_weights.{grade}"),
                message: "must be finite and at most 1.0".to_string(),
            });
        }
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
