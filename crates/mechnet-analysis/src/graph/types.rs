//! Node and mechanism types.
//!
//! A mechanism's literature evidence is a tagged variant: either a quantified
//! effect with its confidence interval, or topology only (the link and its
//! direction are known, the magnitude is not).

use mechnet_core::errors::{MechanismError, MechnetResult};
use mechnet_core::types::{Category, EdgeId, EvidenceGrade, MechanismDirection, NodeId, Scale};
use serde::{Deserialize, Serialize};

/// A causal factor in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorNode {
    pub id: NodeId,
    pub label: String,
    pub category: Category,
    /// Causal distance from policy; fixed once the node is in the graph.
    pub scale: Scale,
}

impl FactorNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, category: Category, scale: Scale) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            scale,
        }
    }

    pub fn is_policy_lever_tier(&self) -> bool {
        self.scale.is_most_upstream()
    }
}

/// A literature effect size on the ratio scale (risk ratio, odds ratio, ...)
/// with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEffectEstimate")]
pub struct EffectEstimate {
    effect_size: f64,
    ci_lower: f64,
    ci_upper: f64,
}

impl EffectEstimate {
    /// Requires `0 < ci_lower <= effect_size <= ci_upper`, all finite.
    pub fn new(effect_size: f64, ci_lower: f64, ci_upper: f64) -> MechnetResult<Self> {
        let finite = effect_size.is_finite() && ci_lower.is_finite() && ci_upper.is_finite();
        if !finite || ci_lower <= 0.0 {
            return Err(MechanismError::invalid(format!(
                "effect estimate must be positive and finite (got {effect_size} [{ci_lower}, {ci_upper}])"
            )));
        }
        if !(ci_lower <= effect_size && effect_size <= ci_upper) {
            return Err(MechanismError::invalid(format!(
                "effect size {effect_size} lies outside its interval [{ci_lower}, {ci_upper}]"
            )));
        }
        Ok(Self {
            effect_size,
            ci_lower,
            ci_upper,
        })
    }

    pub fn effect_size(&self) -> f64 {
        self.effect_size
    }

    pub fn ci_lower(&self) -> f64 {
        self.ci_lower
    }

    pub fn ci_upper(&self) -> f64 {
        self.ci_upper
    }
}

#[derive(Deserialize)]
struct RawEffectEstimate {
    effect_size: f64,
    ci_lower: f64,
    ci_upper: f64,
}

impl TryFrom<RawEffectEstimate> for EffectEstimate {
    type Error = MechanismError;

    fn try_from(raw: RawEffectEstimate) -> Result<Self, Self::Error> {
        Self::new(raw.effect_size, raw.ci_lower, raw.ci_upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectEvidence {
    Quantified(EffectEstimate),
    TopologyOnly,
}

impl EffectEvidence {
    pub fn is_quantified(&self) -> bool {
        matches!(self, Self::Quantified(_))
    }
}

/// A directed, evidence-annotated causal mechanism.
///
/// A reverse mechanism is its own edge with its own evidence; nothing is
/// inferred from the forward direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mechanism {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// `None` only when ingestion supplied no direction; such mechanisms can
    /// be traversed but not weighed.
    pub direction: Option<MechanismDirection>,
    pub category: Category,
    pub grade: EvidenceGrade,
    pub study_count: u32,
    pub evidence: EffectEvidence,
}

impl Mechanism {
    /// A topology-only mechanism; attach evidence with [`Mechanism::with_effect`].
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        direction: MechanismDirection,
        category: Category,
        grade: EvidenceGrade,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            direction: Some(direction),
            category,
            grade,
            study_count: 0,
            evidence: EffectEvidence::TopologyOnly,
        }
    }

    pub fn with_effect(mut self, estimate: EffectEstimate) -> Self {
        self.evidence = EffectEvidence::Quantified(estimate);
        self
    }

    pub fn with_study_count(mut self, study_count: u32) -> Self {
        self.study_count = study_count;
        self
    }
}
