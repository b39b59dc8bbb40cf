//! External-model fusion adapter.
//!
//! Learning-based fusion (regression forests, small feed-forward predictors)
//! lives behind a single capability trait. The contract is deliberately
//! thin: a model is a function of the input vector returning a value in
//! [0, 1], with no determinism guarantee. Training, artifact loading and
//! model lifecycle are the model's own business; the engine only provides
//! the same finite-check and clamp it applies to every strategy.

use std::sync::Arc;

use crate::strategy::{Evaluation, FusionStrategy, StrategyId};
use crate::values::ValueSet;

/// A pluggable fusion model.
///
/// Implementations should return a value in [0, 1] for any input vector;
/// the engine clamps and finite-checks the output regardless. Per-call cost
/// is unbounded, so the runtime routes these calls to a dedicated worker
/// pool (see `FusionRuntime`).
pub trait ExternalModel: Send + Sync {
    /// Identifier of the model (e.g. an artifact name), for audit.
    fn model_id(&self) -> &str;

    /// Produces a fused estimate for the given observations.
    fn predict(&self, values: &[f64]) -> f64;
}

/// A closure-backed model, mainly useful as a test double or for wiring in
/// an inference call without a dedicated type.
pub struct FnModel<F> {
    id: String,
    f: F,
}

impl<F> FnModel<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Wraps a closure as an [`ExternalModel`].
    pub fn new(id: impl Into<String>, f: F) -> Self {
        Self { id: id.into(), f }
    }
}

impl<F> ExternalModel for FnModel<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn model_id(&self) -> &str {
        &self.id
    }

    fn predict(&self, values: &[f64]) -> f64 {
        (self.f)(values)
    }
}

/// Adapts an [`ExternalModel`] to the [`FusionStrategy`] contract.
pub struct ExternalModelStrategy {
    model: Arc<dyn ExternalModel>,
}

impl ExternalModelStrategy {
    /// Wraps the given model.
    #[must_use]
    pub fn new(model: Arc<dyn ExternalModel>) -> Self {
        Self { model }
    }

    /// Identifier of the wrapped model.
    #[must_use]
    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }
}

impl FusionStrategy for ExternalModelStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::ExternalModel
    }

    fn evaluate(&self, input: &ValueSet) -> Evaluation {
        Evaluation::of(self.model.predict(input.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn mean_model() -> Arc<dyn ExternalModel> {
        Arc::new(FnModel::new("mean-proxy", |values: &[f64]| {
            values.iter().sum::<f64>() / values.len() as f64
        }))
    }

    #[test]
    fn test_adapter_delegates_to_model() {
        let strategy = ExternalModelStrategy::new(mean_model());
        let set = ValueSet::unweighted(vec![0.2, 0.4, 0.6]).unwrap();
        let eval = strategy.evaluate(&set);
        assert!((eval.fused - 0.4).abs() < 1e-12);
        assert!(eval.confidence.is_none());
    }

    #[test]
    fn test_adapter_reports_external_model_id() {
        let strategy = ExternalModelStrategy::new(mean_model());
        assert_eq!(strategy.id(), StrategyId::ExternalModel);
        assert_eq!(strategy.model_id(), "mean-proxy");
    }

    #[test]
    fn test_model_output_is_passed_through_raw() {
        // Clamping is the engine's job, not the adapter's.
        let strategy = ExternalModelStrategy::new(Arc::new(FnModel::new("wild", |_: &[f64]| 1.7)));
        let set = ValueSet::unweighted(vec![0.5]).unwrap();
        assert!((strategy.evaluate(&set).fused - 1.7).abs() < 1e-12);
    }
}
