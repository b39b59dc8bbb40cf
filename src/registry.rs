//! Strategy registry.
//!
//! Maps a [`StrategyId`] to its implementation. The registry is built once,
//! handed to the engine, and read-only from then on; it is the only
//! process-wide structure in the crate.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ExecutionError;
use crate::strategy::{
    ConsensusThreshold, ExternalModel, ExternalModelStrategy, FusionStrategy, FuzzyRule,
    SelfWeighted, StrategyId, WeightedConfidence,
};

/// Registry of fusion strategies.
///
/// [`StrategyRegistry::with_defaults`] registers the four deterministic
/// strategies. The external-model slot is empty until a model is installed
/// with [`StrategyRegistry::with_external_model`]; requesting it before
/// then fails as [`ExecutionError::UnknownStrategy`], like any identifier
/// the registry cannot serve.
///
/// # Examples
///
/// ```
/// use fusor::{StrategyRegistry, StrategyId};
///
/// let registry = StrategyRegistry::with_defaults();
/// let strategy = registry.get(StrategyId::Consensus).unwrap();
/// assert_eq!(strategy.id(), StrategyId::Consensus);
/// ```
pub struct StrategyRegistry {
    strategies: HashMap<StrategyId, Arc<dyn FusionStrategy>>,
}

impl StrategyRegistry {
    /// The strategy used when a request names none.
    ///
    /// `weighted_confidence` is the most general choice: it degrades to
    /// uniform averaging when no confidences are supplied.
    pub const DEFAULT: StrategyId = StrategyId::WeightedConfidence;

    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Creates a registry with the four deterministic strategies.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ConsensusThreshold));
        registry.register(Arc::new(FuzzyRule));
        registry.register(Arc::new(SelfWeighted));
        registry.register(Arc::new(WeightedConfidence));
        registry
    }

    /// Registers a strategy under its own identifier, replacing any
    /// previous registration.
    pub fn register(&mut self, strategy: Arc<dyn FusionStrategy>) {
        self.strategies.insert(strategy.id(), strategy);
    }

    /// Installs an external model behind the `external_model` identifier.
    #[must_use]
    pub fn with_external_model(mut self, model: Arc<dyn ExternalModel>) -> Self {
        self.register(Arc::new(ExternalModelStrategy::new(model)));
        self
    }

    /// Looks up a strategy.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::UnknownStrategy`] if nothing is registered under
    /// the identifier.
    pub fn get(&self, id: StrategyId) -> Result<Arc<dyn FusionStrategy>, ExecutionError> {
        self.strategies
            .get(&id)
            .cloned()
            .ok_or_else(|| ExecutionError::UnknownStrategy {
                name: id.name().to_string(),
            })
    }

    /// Returns true if the identifier has a registered implementation.
    #[must_use]
    pub fn contains(&self, id: StrategyId) -> bool {
        self.strategies.contains_key(&id)
    }

    /// Identifiers with registered implementations, in no particular order.
    #[must_use]
    pub fn registered(&self) -> Vec<StrategyId> {
        self.strategies.keys().copied().collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::FnModel;

    #[test]
    fn test_defaults_register_deterministic_strategies() {
        let registry = StrategyRegistry::with_defaults();
        for id in [
            StrategyId::Consensus,
            StrategyId::Fuzzy,
            StrategyId::Weighted,
            StrategyId::WeightedConfidence,
        ] {
            assert!(registry.contains(id), "missing {id}");
            assert_eq!(registry.get(id).unwrap().id(), id);
        }
    }

    #[test]
    fn test_external_model_absent_by_default() {
        let registry = StrategyRegistry::with_defaults();
        let err = registry.get(StrategyId::ExternalModel).unwrap_err();
        let ExecutionError::UnknownStrategy { name } = err else {
            panic!("expected UnknownStrategy, got {err:?}");
        };
        assert_eq!(name, "external_model");
    }

    #[test]
    fn test_with_external_model_registers_adapter() {
        let registry = StrategyRegistry::with_defaults()
            .with_external_model(Arc::new(FnModel::new("stub", |_: &[f64]| 0.5)));
        assert!(registry.contains(StrategyId::ExternalModel));
    }

    #[test]
    fn test_default_identifier_is_weighted_confidence() {
        assert_eq!(StrategyRegistry::DEFAULT, StrategyId::WeightedConfidence);
        assert!(StrategyRegistry::default().contains(StrategyRegistry::DEFAULT));
    }

    #[test]
    fn test_registered_lists_all() {
        let registry = StrategyRegistry::with_defaults();
        let mut ids = registry.registered();
        ids.sort_by_key(StrategyId::name);
        assert_eq!(ids.len(), 4);
    }
}
