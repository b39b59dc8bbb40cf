//! # fusor - Deterministic multi-strategy scalar fusion
//!
//! fusor ingests a set of scalar observations (per-agent or per-sensor
//! confidence estimates, each expected in the unit interval) and produces
//! one fused scalar plus an optional aggregate confidence. The decision
//! layer selects among competing fusion rules with distinct tie-break and
//! degeneracy policies: strict consensus detection, fuzzy rule cascades,
//! and (self- or confidence-) weighted averaging, with learning-based
//! fusion abstracted behind a pluggable external-model adapter.
//!
//! ## Core Concepts
//!
//! - **ValueSet**: validated, immutable input — ordered observations plus
//!   optional parallel confidence weights
//! - **Strategy**: a pure, named, swappable fusion algorithm
//! - **StrategyRegistry**: identifier-to-strategy mapping with a documented
//!   default (`weighted_confidence`)
//! - **FusionEngine**: validate, dispatch, finite-check, clamp to [0, 1]
//! - **FusionRuntime**: bounded worker pools isolating unbounded-cost
//!   external-model calls from deterministic fusion
//!
//! ## Usage
//!
//! ```rust
//! use fusor::{FuseRequest, FusionEngine, StrategyId};
//!
//! let engine = FusionEngine::with_defaults();
//!
//! let outcome = engine
//!     .fuse(
//!         FuseRequest::new(vec![0.2, 0.8])
//!             .confidences(vec![1.0, 3.0])
//!             .strategy(StrategyId::WeightedConfidence),
//!     )
//!     .unwrap();
//!
//! assert!((outcome.fused - 0.65).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod runtime;
pub mod strategy;
pub mod values;

// Re-export primary types at crate root for convenience
pub use engine::{FusionEngine, FusionOutcome};
pub use error::{ExecutionError, FusorError, FusorResult, ValidationError};
pub use protocol::{error_body, FuseRequest};
pub use registry::StrategyRegistry;
pub use runtime::{
    DefaultRouter, ExecutionHandle, ExecutionPath, FusionRuntime, FusionRuntimeConfig,
    StrategyRouter,
};
pub use strategy::{
    ConsensusThreshold, Evaluation, ExternalModel, ExternalModelStrategy, FnModel,
    FusionStrategy, FuzzyRule, SelfWeighted, StrategyId, WeightedConfidence,
};
pub use values::{ValueSet, MAX_VALUES};
