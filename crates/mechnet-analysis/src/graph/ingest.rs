//! Ingestion records: the loosely typed shape the extraction pipeline emits.
//!
//! Records are converted into typed nodes and mechanisms with `TryFrom`.
//! Parsing JSON text is supported; reading files is the caller's job.

use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::types::{Category, EvidenceGrade, MechanismDirection, Scale};
use serde::{Deserialize, Serialize};

use super::indexed::MechanismGraph;
use super::types::{EffectEstimate, EffectEvidence, FactorNode, Mechanism};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub category: String,
    pub scale: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismRecord {
    pub id: String,
    #[serde(alias = "from")]
    pub source: String,
    #[serde(alias = "to")]
    pub target: String,
    #[serde(default)]
    pub direction: Option<String>,
    pub category: String,
    #[serde(alias = "evidence_quality")]
    pub grade: String,
    #[serde(default)]
    pub study_count: Option<u32>,
    #[serde(default)]
    pub effect_size: Option<f64>,
    #[serde(default)]
    pub ci_lower: Option<f64>,
    #[serde(default)]
    pub ci_upper: Option<f64>,
}

/// A full node list plus mechanism list, as handed over by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default, alias = "edges")]
    pub mechanisms: Vec<MechanismRecord>,
}

impl TryFrom<NodeRecord> for FactorNode {
    type Error = MechanismError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let category: Category = record.category.parse()?;
        let scale = Scale::new(record.scale)?;
        let label = record.label.unwrap_or_else(|| record.id.clone());
        Ok(FactorNode::new(record.id, label, category, scale))
    }
}

impl TryFrom<MechanismRecord> for Mechanism {
    type Error = MechanismError;

    fn try_from(record: MechanismRecord) -> Result<Self, Self::Error> {
        // A missing direction is kept as `None`; the weighing step reports it.
        let direction = record
            .direction
            .as_deref()
            .map(str::parse::<MechanismDirection>)
            .transpose()?;
        let category: Category = record.category.parse()?;
        let grade: EvidenceGrade = record.grade.parse()?;

        let evidence = match (record.effect_size, record.ci_lower, record.ci_upper) {
            (Some(effect), Some(lower), Some(upper)) => {
                EffectEvidence::Quantified(EffectEstimate::new(effect, lower, upper)?)
            }
            (None, None, None) => EffectEvidence::TopologyOnly,
            (None, _, _) => return Err(MechanismError::missing(&record.id, "effect_size")),
            (Some(_), _, _) => {
                return Err(MechanismError::missing(&record.id, "confidence interval"))
            }
        };

        Ok(Mechanism {
            id: record.id.into(),
            source: record.source.into(),
            target: record.target.into(),
            direction,
            category,
            grade,
            study_count: record.study_count.unwrap_or(0),
            evidence,
        })
    }
}

impl MechanismGraph {
    /// Build a graph from an ingestion document. Nodes are inserted first;
    /// the first invalid record aborts the build.
    pub fn from_document(document: GraphDocument) -> MechnetResult<Self> {
        let mut graph = Self::new();
        for record in document.nodes {
            graph.add_node(FactorNode::try_from(record)?)?;
        }
        for record in document.mechanisms {
            graph.add_mechanism(Mechanism::try_from(record)?)?;
        }
        tracing::info!(
            nodes = graph.node_count(),
            mechanisms = graph.edge_count(),
            "mechanism graph loaded"
        );
        Ok(graph)
    }

    /// Parse a JSON `GraphDocument` and build the graph.
    pub fn from_json_str(json: &str) -> MechnetResult<Self> {
        let document: GraphDocument = serde_json::from_str(json)
            .map_err(|e| MechanismError::invalid(format!("malformed graph document: {e}")))?;
        Self::from_document(document)
    }
}

#[cfg(test)]
mod tests {
    use mechnet_core::errors::EntityKind;

    use super::*;

    const DOC: &str = r#"{
        "nodes": [
            {"id": "policy", "label": "Rent control", "category": "political", "scale": 1},
            {"id": "housing", "category": "built_environment", "scale": 3},
            {"id": "stress", "category": "behavioral", "scale": 6}
        ],
        "edges": [
            {"id": "m1", "from": "policy", "to": "housing", "direction": "attenuating",
             "category": "economic", "grade": "A", "study_count": 4,
             "effect_size": 0.8, "ci_lower": 0.7, "ci_upper": 0.92},
            {"id": "m2", "source": "housing", "target": "stress",
             "category": "social", "evidence_quality": "moderate"}
        ]
    }"#;

    #[test]
    fn test_document_round_trip_into_graph() {
        let graph = MechanismGraph::from_json_str(DOC).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let m1 = graph.mechanism("m1").unwrap();
        assert_eq!(m1.grade, EvidenceGrade::Strong);
        assert_eq!(m1.direction, Some(MechanismDirection::Attenuating));
        assert!(m1.evidence.is_quantified());

        let m2 = graph.mechanism("m2").unwrap();
        assert_eq!(m2.direction, None);
        assert_eq!(m2.evidence, EffectEvidence::TopologyOnly);
        assert_eq!(graph.node("housing").unwrap().label, "housing");
    }

    #[test]
    fn test_partial_effect_is_missing_data() {
        let record = MechanismRecord {
            id: "m9".to_string(),
            source: "a".to_string(),
            target: "b".to_string(),
            direction: Some("amplifying".to_string()),
            category: "social".to_string(),
            grade: "weak".to_string(),
            study_count: None,
            effect_size: Some(1.4),
            ci_lower: None,
            ci_upper: None,
        };
        let err = Mechanism::try_from(record).unwrap_err();
        assert!(matches!(err, MechanismError::MissingData { .. }));
    }

    #[test]
    fn test_dangling_edge_is_not_found() {
        let doc = r#"{"nodes": [{"id": "a", "category": "social", "scale": 2}],
                      "mechanisms": [{"id": "m1", "source": "a", "target": "b",
                                      "category": "social", "grade": "weak"}]}"#;
        match MechanismGraph::from_json_str(doc).unwrap_err() {
            MechanismError::NotFound { kind, id } => {
                assert_eq!(kind, EntityKind::Node);
                assert_eq!(id, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_is_invalid_request() {
        let err = MechanismGraph::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, MechanismError::InvalidRequest { .. }));
    }
}
