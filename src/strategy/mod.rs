//! Fusion strategies.
//!
//! A strategy is a pure function from a validated [`ValueSet`] to an
//! [`Evaluation`]. Strategies are intentionally free of I/O and shared
//! state so a fusion result can be reproduced deterministically given the
//! same input (the external-model adapter is the one documented exception:
//! its determinism is out of contract).

mod consensus;
mod external;
mod fuzzy;
mod weighted;

pub use consensus::ConsensusThreshold;
pub use external::{ExternalModel, ExternalModelStrategy, FnModel};
pub use fuzzy::FuzzyRule;
pub use weighted::{SelfWeighted, WeightedConfidence};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExecutionError;
use crate::values::ValueSet;

/// Identifier of a fusion strategy.
///
/// This is a closed enumeration: the boundary exchanges these as snake_case
/// strings, and an unrecognized string fails as
/// [`ExecutionError::UnknownStrategy`] rather than silently defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    /// Consensus detection with a median fallback.
    Consensus,

    /// Fuzzy rule cascade with majority-side tie-breaking.
    Fuzzy,

    /// Weighted average using the values as their own weights.
    Weighted,

    /// Confidence-weighted average; the engine default.
    WeightedConfidence,

    /// Delegated to a pluggable external model. No determinism guarantee.
    ExternalModel,
}

impl StrategyId {
    /// Returns a short stable identifier suitable for logging and the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Consensus => "consensus",
            Self::Fuzzy => "fuzzy",
            Self::Weighted => "weighted",
            Self::WeightedConfidence => "weighted_confidence",
            Self::ExternalModel => "external_model",
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StrategyId {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consensus" => Ok(Self::Consensus),
            "fuzzy" => Ok(Self::Fuzzy),
            "weighted" => Ok(Self::Weighted),
            "weighted_confidence" => Ok(Self::WeightedConfidence),
            "external_model" => Ok(Self::ExternalModel),
            other => Err(ExecutionError::UnknownStrategy {
                name: other.to_string(),
            }),
        }
    }
}

/// Raw output of a strategy, before the engine's finite-check and clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The fused scalar. The engine clamps this to [0.0, 1.0].
    pub fused: f64,

    /// Aggregate confidence, for strategies that define one.
    ///
    /// This is the raw aggregate and may exceed 1.0 when callers supply
    /// confidences outside [0, 1]; see `WeightedConfidence`.
    pub confidence: Option<f64>,

    /// True when an all-zero confidence sum was recovered by substituting
    /// uniform weights.
    pub degenerate_weights: bool,
}

impl Evaluation {
    /// An evaluation carrying only a fused scalar.
    #[must_use]
    pub const fn of(fused: f64) -> Self {
        Self {
            fused,
            confidence: None,
            degenerate_weights: false,
        }
    }
}

/// A pure fusion algorithm with a uniform input/output contract.
pub trait FusionStrategy: Send + Sync {
    /// The identifier this strategy is registered under.
    fn id(&self) -> StrategyId;

    /// Fuses the validated input into a single evaluation.
    ///
    /// Implementations may assume the [`ValueSet`] invariants (non-empty
    /// values, length-matched confidences) and must not fail; degenerate
    /// inputs are handled by documented policies, not errors.
    fn evaluate(&self, input: &ValueSet) -> Evaluation;
}

impl fmt::Debug for dyn FusionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FusionStrategy").field("id", &self.id()).finish()
    }
}
