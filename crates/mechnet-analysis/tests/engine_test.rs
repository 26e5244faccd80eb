//! End-to-end tests through the engine facade: load, configure, query.

use std::fs;

use mechnet_analysis::pathfinding::PathAlgorithm;
use mechnet_analysis::weighting::ContextVector;
use mechnet_analysis::{MechanismEngine, MechanismGraph};
use mechnet_core::config::ConfigOverrides;
use mechnet_core::errors::MechanismError;
use mechnet_core::MechnetConfig;

const NETWORK: &str = r#"{
    "nodes": [
        {"id": "minimum_wage", "label": "Minimum wage policy", "category": "political", "scale": 1},
        {"id": "income", "category": "economic", "scale": 3},
        {"id": "food_security", "category": "economic", "scale": 4},
        {"id": "stress", "category": "behavioral", "scale": 5},
        {"id": "hypertension", "category": "biological", "scale": 7}
    ],
    "mechanisms": [
        {"id": "m01", "source": "minimum_wage", "target": "income", "direction": "amplifying",
         "category": "economic", "grade": "strong", "study_count": 12,
         "effect_size": 1.3, "ci_lower": 1.15, "ci_upper": 1.45},
        {"id": "m02", "source": "income", "target": "food_security", "direction": "amplifying",
         "category": "economic", "grade": "moderate",
         "effect_size": 1.2, "ci_lower": 1.05, "ci_upper": 1.4},
        {"id": "m03", "source": "food_security", "target": "stress", "direction": "attenuating",
         "category": "social", "grade": "moderate",
         "effect_size": 0.8, "ci_lower": 0.7, "ci_upper": 0.9},
        {"id": "m04", "source": "stress", "target": "hypertension", "direction": "amplifying",
         "category": "healthcare", "grade": "strong",
         "effect_size": 1.5, "ci_lower": 1.3, "ci_upper": 1.7},
        {"id": "m05", "source": "income", "target": "stress", "direction": "attenuating",
         "category": "social", "grade": "weak"},
        {"id": "m06", "source": "stress", "target": "income", "direction": "attenuating",
         "category": "economic", "grade": "weak"}
    ]
}"#;

fn engine() -> MechanismEngine {
    mechnet_core::tracing::init_tracing();
    let graph = MechanismGraph::from_json_str(NETWORK).unwrap();
    MechanismEngine::new(graph, MechnetConfig::default())
}

#[test]
fn test_shortest_path_then_propagate() {
    let engine = engine();
    let result = engine
        .find_paths_named("minimum_wage", "hypertension", "shortest")
        .unwrap();
    assert_eq!(result.paths.len(), 1);
    let ids: Vec<&str> = result.paths[0]
        .edges
        .iter()
        .map(|s| s.mechanism_id.as_str())
        .collect();
    assert_eq!(ids, vec!["m01", "m05", "m04"]);

    let distributions = engine
        .propagate_paths(&result, &ContextVector::new(), Some(17))
        .unwrap();
    let dist = &distributions["shortest-000"];
    assert_eq!(dist.edge_count, 3);
    assert_eq!(dist.unquantified_edges, 1);
}

#[test]
fn test_strongest_evidence_prefers_graded_route() {
    let engine = engine();
    let result = engine
        .find_paths_named("minimum_wage", "hypertension", "strongest-evidence")
        .unwrap();
    let best: Vec<&str> = result.paths[0]
        .edges
        .iter()
        .map(|s| s.mechanism_id.as_str())
        .collect();
    // 1.0 · 0.7 · 0.7 · 1.0 = 0.49 beats 1.0 · 0.4 · 1.0 = 0.4
    assert_eq!(best, vec!["m01", "m02", "m03", "m04"]);
    assert_eq!(result.algorithm, PathAlgorithm::StrongestEvidence);
}

#[test]
fn test_unknown_algorithm_name_is_invalid() {
    let err = engine()
        .find_paths_named("minimum_wage", "hypertension", "dijkstra")
        .unwrap_err();
    assert!(matches!(err, MechanismError::InvalidRequest { .. }));
}

#[test]
fn test_crisis_subgraph_finds_policy_lever() {
    let engine = engine();
    let query = engine.upstream_query(["hypertension"]);
    let sub = engine.explore_upstream(&query).unwrap();
    let levers: Vec<&str> = sub.policy_levers().map(|n| n.id.as_str()).collect();
    assert_eq!(levers, vec!["minimum_wage"]);
    assert_eq!(sub.node("minimum_wage").unwrap().degree, 3);
}

#[test]
fn test_weigh_edge_by_id() {
    let engine = engine();
    let weighted = engine.weigh_edge("m03", &ContextVector::new()).unwrap();
    assert!((weighted.point - 0.8).abs() < 1e-9);
    assert!(matches!(
        engine.weigh_edge("m99", &ContextVector::new()),
        Err(MechanismError::NotFound { .. })
    ));
}

#[test]
fn test_feedback_loops_reported_not_rejected() {
    let loops = engine().feedback_loops();
    assert_eq!(loops.len(), 1);
    let members: Vec<&str> = loops[0].members.iter().map(|m| m.as_str()).collect();
    assert_eq!(members, vec!["food_security", "income", "stress"]);
}

#[test]
fn test_config_file_drives_engine_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("mechnet.toml"),
        r#"
[pathfinding]
max_depth = 2

[propagation]
n_samples = 250
default_seed = 99

[weighting.covariates.low_income_area]
log_shift = 0.2
sd = 0.05
"#,
    )
    .unwrap();
    let overrides = ConfigOverrides {
        max_results: Some(5),
        ..ConfigOverrides::default()
    };
    let config = MechnetConfig::load(dir.path(), Some(&overrides)).unwrap();
    let graph = MechanismGraph::from_json_str(NETWORK).unwrap();
    let engine = MechanismEngine::new(graph, config);

    let constraints = engine.default_constraints();
    assert_eq!(constraints.max_depth, 2);
    assert_eq!(constraints.max_results, 5);

    let result = engine
        .find_paths("minimum_wage", "hypertension", PathAlgorithm::AllPaths, &constraints)
        .unwrap();
    assert!(result.is_empty());

    let ctx = ContextVector::from([("low_income_area".to_string(), 1.0)]);
    let local = engine.weigh_edge("m01", &ctx).unwrap();
    assert!(local.point > 1.3);

    let paths = engine
        .find_paths_named("minimum_wage", "food_security", "shortest")
        .unwrap();
    let dist = engine.propagate_paths(&paths, &ctx, None).unwrap();
    assert_eq!(dist["shortest-000"].n_samples, 250);
}

#[test]
fn test_clones_share_the_graph() {
    let engine = engine();
    let clone = engine.clone();
    assert!(std::sync::Arc::ptr_eq(&engine.shared_graph(), &clone.shared_graph()));
    assert_eq!(clone.stats().mechanisms, 6);
}

#[test]
fn test_consistency_check_uses_configured_draws() {
    let config = MechnetConfig::from_toml("[weighting]\nsampling_draws = 3000\n").unwrap();
    let graph = MechanismGraph::from_json_str(NETWORK).unwrap();
    let engine = MechanismEngine::new(graph, config);
    assert_eq!(engine.weigher().sampling_draws(), 3_000);

    let neutral = engine.consistency_check("m05", &ContextVector::new(), 5).unwrap();
    assert_eq!(neutral.effective_sample_size, 3_000.0);
    assert!(neutral.within_tolerance);

    let quantified = engine.consistency_check("m01", &ContextVector::new(), 5).unwrap();
    assert!(quantified.effective_sample_size <= 3_000.0 + 1e-6);
    assert!(quantified.effective_sample_size > 0.0);
    assert!(engine.consistency_check("m99", &ContextVector::new(), 5).is_err());
}
