//! Evidence weighting integration tests.

use std::collections::BTreeMap;

use mechnet_analysis::pathfinding::{find_paths, PathAlgorithm, PathConstraints};
use mechnet_analysis::weighting::{
    ContextAdjustment, ContextObservation, ContextVector, EvidenceWeigher, WeightBasis,
    WeightingMethod,
};
use mechnet_analysis::MechanismGraph;
use mechnet_core::config::{CovariateShift, WeightingConfig};
use mechnet_core::constants::{SAMPLING_INTERVAL_TOLERANCE, SAMPLING_MIN_DRAWS, SAMPLING_TOLERANCE};
use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::types::{EvidenceGrade, QueryWarning};

const DOC: &str = r#"{
    "nodes": [
        {"id": "eviction", "category": "political", "scale": 1},
        {"id": "housing_instability", "category": "built_environment", "scale": 3},
        {"id": "food_insecurity", "category": "economic", "scale": 5},
        {"id": "diabetes", "category": "biological", "scale": 7}
    ],
    "mechanisms": [
        {"id": "m-evict-housing", "source": "eviction", "target": "housing_instability",
         "direction": "amplifying", "category": "political", "grade": "strong",
         "effect_size": 2.1, "ci_lower": 1.6, "ci_upper": 2.8},
        {"id": "m-housing-food", "source": "housing_instability", "target": "food_insecurity",
         "direction": "amplifying", "category": "economic", "grade": "moderate"},
        {"id": "m-food-diabetes", "source": "food_insecurity", "target": "diabetes",
         "direction": "amplifying", "category": "healthcare", "grade": "moderate",
         "effect_size": 1.4, "ci_lower": 1.1, "ci_upper": 1.8},
        {"id": "m-undirected", "source": "eviction", "target": "food_insecurity",
         "category": "social", "grade": "weak",
         "effect_size": 1.2, "ci_lower": 1.0, "ci_upper": 1.5}
    ]
}"#;

fn config() -> WeightingConfig {
    let mut covariates = BTreeMap::new();
    covariates.insert("rural".to_string(), CovariateShift { log_shift: 0.15, sd: 0.1 });
    covariates.insert("medicaid_expansion".to_string(), CovariateShift { log_shift: -0.2, sd: 0.05 });
    WeightingConfig {
        covariates,
        ..WeightingConfig::default()
    }
}

fn graph() -> MechanismGraph {
    MechanismGraph::from_json_str(DOC).unwrap()
}

#[test]
fn test_empty_context_round_trips_literature_estimate() {
    let g = graph();
    let weigher = EvidenceWeigher::new(&config());
    for (id, effect) in [("m-evict-housing", 2.1), ("m-food-diabetes", 1.4)] {
        let weighted = weigher
            .weigh_edge(g.mechanism(id).unwrap(), &ContextVector::new())
            .unwrap();
        assert!((weighted.point - effect).abs() < 1e-9, "{id}: {}", weighted.point);
        assert_eq!(weighted.basis, WeightBasis::Literature);
    }
}

#[test]
fn test_literature_interval_is_reproduced_at_matching_level() {
    let g = graph();
    let weighted = EvidenceWeigher::new(&config())
        .weigh_edge(g.mechanism("m-food-diabetes").unwrap(), &ContextVector::new())
        .unwrap();
    // Point is the geometric centre of the CI, so bounds come back up to the
    // asymmetry of the literature interval.
    let geometric_centre = (1.1f64 * 1.8).sqrt();
    let ratio = 1.4 / geometric_centre;
    assert!((weighted.interval.lower - 1.1 * ratio).abs() < 1e-9);
    assert!((weighted.interval.upper - 1.8 * ratio).abs() < 1e-9);
    assert_eq!(weighted.interval.level, 0.95);
}

#[test]
fn test_opposing_covariates_move_point_in_their_directions() {
    let g = graph();
    let weigher = EvidenceWeigher::new(&config());
    let mechanism = g.mechanism("m-evict-housing").unwrap();
    let base = weigher.weigh_edge(mechanism, &ContextVector::new()).unwrap();
    let up = weigher
        .weigh_edge(mechanism, &ContextVector::from([("rural".to_string(), 1.0)]))
        .unwrap();
    let down = weigher
        .weigh_edge(
            mechanism,
            &ContextVector::from([("medicaid_expansion".to_string(), 1.0)]),
        )
        .unwrap();
    assert!(up.point > base.point);
    assert!(down.point < base.point);
}

#[test]
fn test_partial_activation_moves_less_than_full() {
    let g = graph();
    let weigher = EvidenceWeigher::new(&config());
    let mechanism = g.mechanism("m-evict-housing").unwrap();
    let half = weigher
        .weigh_edge(mechanism, &ContextVector::from([("rural".to_string(), 0.5)]))
        .unwrap();
    let full = weigher
        .weigh_edge(mechanism, &ContextVector::from([("rural".to_string(), 1.0)]))
        .unwrap();
    assert!(half.point > 2.1);
    assert!(half.point < full.point);
}

#[test]
fn test_topology_only_edge_is_neutral_and_unbounded() {
    let g = graph();
    let weighted = EvidenceWeigher::new(&config())
        .weigh_edge(g.mechanism("m-housing-food").unwrap(), &ContextVector::new())
        .unwrap();
    assert_eq!(weighted.point, 1.0);
    assert_eq!(weighted.basis, WeightBasis::Neutral);
    assert!(!weighted.interval.is_bounded());

    let json = serde_json::to_value(&weighted).unwrap();
    assert!(json["interval"]["upper"].is_null());
    let back: mechnet_analysis::WeightedEdge = serde_json::from_value(json).unwrap();
    assert!(back.interval.upper.is_infinite());
}

#[test]
fn test_missing_direction_is_missing_data() {
    let g = graph();
    let err = EvidenceWeigher::new(&config())
        .weigh_edge(g.mechanism("m-undirected").unwrap(), &ContextVector::new())
        .unwrap_err();
    assert!(matches!(err, MechanismError::MissingData { ref field, .. } if field == "direction"));
}

#[test]
fn test_weigh_path_preserves_order() {
    let g = graph();
    let result = find_paths(
        &g,
        "eviction",
        "diabetes",
        PathAlgorithm::Shortest,
        &PathConstraints::default().with_min_grade(EvidenceGrade::Moderate),
    )
    .unwrap();
    let path = &result.paths[0];
    let weighted = EvidenceWeigher::new(&config())
        .weigh_path(&g, path, &ContextVector::new())
        .unwrap();
    let ids: Vec<&str> = weighted.iter().map(|w| w.edge_id.as_str()).collect();
    assert_eq!(ids, vec!["m-evict-housing", "m-housing-food", "m-food-diabetes"]);
    assert!(!weighted[1].is_quantified());
}

#[test]
fn test_sampling_path_within_documented_tolerance() {
    let g = graph();
    let weigher = EvidenceWeigher::new(&config());
    let ctx = ContextVector::from([
        ("rural".to_string(), 1.0),
        ("medicaid_expansion".to_string(), 0.5),
    ]);
    for id in ["m-evict-housing", "m-food-diabetes"] {
        let report = weigher
            .consistency_check(g.mechanism(id).unwrap(), &ctx, SAMPLING_MIN_DRAWS, 2024)
            .unwrap();
        assert!(report.point_error <= SAMPLING_TOLERANCE, "{id}: {report:?}");
        assert!(report.lower_error <= SAMPLING_INTERVAL_TOLERANCE, "{id}: {report:?}");
        assert!(report.upper_error <= SAMPLING_INTERVAL_TOLERANCE, "{id}: {report:?}");
    }
}

#[test]
fn test_sampling_method_is_seed_deterministic() {
    let g = graph();
    let weigher = EvidenceWeigher::new(&config());
    let mechanism = g.mechanism("m-food-diabetes").unwrap();
    let method = WeightingMethod::Sampling { draws: 5_000, seed: 9 };
    let a = weigher.weigh_edge_with(mechanism, &ContextVector::new(), method).unwrap();
    let b = weigher.weigh_edge_with(mechanism, &ContextVector::new(), method).unwrap();
    assert_eq!(a, b);
}

/// Context model that pins the local effect to a fixed ratio.
struct Pinned(f64);

impl ContextAdjustment for Pinned {
    fn observe(
        &self,
        _prior_mu: f64,
        context: &ContextVector,
        _warnings: &mut Vec<QueryWarning>,
    ) -> MechnetResult<Option<ContextObservation>> {
        if context.is_empty() {
            return Ok(None);
        }
        Ok(Some(ContextObservation {
            mean: self.0.ln(),
            sd: 1e-3,
        }))
    }
}

#[test]
fn test_custom_context_adjustment_is_pluggable() {
    let g = graph();
    let weigher = EvidenceWeigher::with_adjustment(&config(), Pinned(3.0));
    let weighted = weigher
        .weigh_edge(
            g.mechanism("m-evict-housing").unwrap(),
            &ContextVector::from([("anything".to_string(), 1.0)]),
        )
        .unwrap();
    assert!((weighted.point - 3.0).abs() < 0.01);
    assert_eq!(weighted.basis, WeightBasis::Contextual);
}
