//! Shared vocabulary: identifiers, closed tag sets, and result annotations.

pub mod category;
pub mod collections;
pub mod evidence;
pub mod identifiers;
pub mod scale;
pub mod warnings;

pub use category::Category;
pub use collections::{FxHashMap, FxHashSet};
pub use evidence::{EvidenceGrade, GradeWeights, MechanismDirection};
pub use identifiers::{EdgeId, NodeId};
pub use scale::Scale;
pub use warnings::QueryWarning;
