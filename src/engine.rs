//! Fusion engine.
//!
//! The engine is the one place where raw input becomes a validated
//! [`ValueSet`], a strategy is resolved, and the strategy's raw output is
//! finite-checked and clamped into a [`FusionOutcome`]. Strategies never
//! clamp their own results; centralizing the postcondition here keeps the
//! [0, 1] range invariant in exactly one spot.
//!
//! The engine holds no mutable state and performs no I/O, so it is safe to
//! share across threads and call concurrently without locking.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ExecutionError, FusorResult};
use crate::protocol::FuseRequest;
use crate::registry::StrategyRegistry;
use crate::strategy::StrategyId;
use crate::values::ValueSet;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Result of a fusion call.
///
/// Constructed once per request, immediately serialized by the boundary,
/// then discarded; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionOutcome {
    /// The fused scalar. Always finite and within [0.0, 1.0].
    pub fused: f64,

    /// Aggregate confidence, present only for strategies that define one.
    ///
    /// This is the raw aggregate of the supplied confidences and may exceed
    /// 1.0 when callers pass confidences outside [0, 1]; it is finite but
    /// deliberately not clamped.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,

    /// The strategy that produced the result, for audit.
    pub strategy_used: StrategyId,

    /// True when an all-zero confidence sum was recovered by substituting
    /// uniform weights. Serialized only when set.
    #[serde(skip_serializing_if = "is_false", default)]
    pub degenerate_weights: bool,
}

impl FusionOutcome {
    /// Serializes the outcome to JSON.
    ///
    /// # Errors
    ///
    /// Internal error if serialization fails.
    pub fn to_json(&self) -> FusorResult<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::error::FusorError::internal(format!("serialize outcome: {e}")))
    }
}

/// The fusion engine: validation, strategy dispatch, and the central
/// range/finiteness postcondition.
///
/// # Examples
///
/// ```
/// use fusor::{FuseRequest, FusionEngine, StrategyId};
///
/// let engine = FusionEngine::with_defaults();
/// let outcome = engine
///     .fuse(FuseRequest::new(vec![0.2, 0.8]).strategy(StrategyId::Consensus))
///     .unwrap();
/// assert!((0.0..=1.0).contains(&outcome.fused));
/// ```
#[derive(Clone)]
pub struct FusionEngine {
    registry: Arc<StrategyRegistry>,
}

impl FusionEngine {
    /// Creates an engine over the given registry.
    #[must_use]
    pub fn new(registry: StrategyRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Creates an engine with the default deterministic strategies.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(StrategyRegistry::with_defaults())
    }

    /// The registry backing this engine.
    #[must_use]
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Fuses a request.
    ///
    /// Validation runs before any strategy executes; a request that fails
    /// validation never yields a fused value. The requested strategy (or
    /// [`StrategyRegistry::DEFAULT`] when none is named) is resolved,
    /// invoked on the validated input, and its output finite-checked and
    /// clamped to [0.0, 1.0].
    ///
    /// # Errors
    ///
    /// Validation errors from [`ValueSet::new`],
    /// [`ExecutionError::UnknownStrategy`] for unresolvable identifiers,
    /// and [`ExecutionError::NonFiniteResult`] if the strategy produced
    /// NaN or an infinity.
    pub fn fuse(&self, request: FuseRequest) -> FusorResult<FusionOutcome> {
        let strategy_id = request.strategy;
        let input = request.into_value_set()?;
        self.fuse_set(&input, strategy_id)
    }

    /// Fuses an already-validated [`ValueSet`].
    ///
    /// # Errors
    ///
    /// Same as [`FusionEngine::fuse`], minus the validation errors.
    pub fn fuse_set(
        &self,
        input: &ValueSet,
        strategy_id: Option<StrategyId>,
    ) -> FusorResult<FusionOutcome> {
        let id = strategy_id.unwrap_or(StrategyRegistry::DEFAULT);
        let strategy = self.registry.get(id)?;

        let eval = strategy.evaluate(input);
        if !eval.fused.is_finite() || eval.confidence.is_some_and(|c| !c.is_finite()) {
            return Err(ExecutionError::NonFiniteResult { strategy: id }.into());
        }

        Ok(FusionOutcome {
            fused: eval.fused.clamp(0.0, 1.0),
            confidence: eval.confidence,
            strategy_used: id,
            degenerate_weights: eval.degenerate_weights,
        })
    }

    /// Fuses a raw JSON request and returns the outcome.
    ///
    /// # Errors
    ///
    /// The [`FuseRequest::from_json`] parse errors plus everything
    /// [`FusionEngine::fuse`] can fail with.
    pub fn fuse_json(&self, raw: &str) -> FusorResult<FusionOutcome> {
        self.fuse(FuseRequest::from_json(raw)?)
    }
}
