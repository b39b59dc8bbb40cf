//! Consensus-threshold fusion.

use crate::strategy::{Evaluation, FusionStrategy, StrategyId};
use crate::values::ValueSet;

/// Detects whether the observations already agree; falls back to a robust
/// estimator when they do not.
///
/// Each observation is checked against the arithmetic mean: a value within
/// [`ConsensusThreshold::TOLERANCE`] of the mean counts toward the consensus
/// ratio. When more than [`ConsensusThreshold::STRONG_RATIO`] of the
/// observations agree, the mean is trusted; otherwise the median is used to
/// stay robust against outliers.
///
/// A single observation always has ratio 1.0 and fuses to itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsensusThreshold;

impl ConsensusThreshold {
    /// Maximum distance from the mean that still counts as agreement.
    pub const TOLERANCE: f64 = 0.2;

    /// Consensus ratio above which the mean is trusted over the median.
    pub const STRONG_RATIO: f64 = 0.7;
}

impl FusionStrategy for ConsensusThreshold {
    fn id(&self) -> StrategyId {
        StrategyId::Consensus
    }

    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, input: &ValueSet) -> Evaluation {
        let mean = input.mean();
        let within = input
            .values()
            .iter()
            .filter(|v| (**v - mean).abs() < Self::TOLERANCE)
            .count();
        let ratio = within as f64 / input.len() as f64;

        let fused = if ratio > Self::STRONG_RATIO {
            mean
        } else {
            input.median()
        };
        Evaluation::of(fused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuse(values: Vec<f64>) -> f64 {
        let set = ValueSet::unweighted(values).unwrap();
        ConsensusThreshold.evaluate(&set).fused
    }

    #[test]
    fn test_strong_consensus_returns_mean() {
        // Mean is 0.6225; three of four values are within 0.2 of it,
        // so ratio 0.75 > 0.7 and the mean wins.
        let fused = fuse(vec![0.5, 0.51, 0.49, 0.99]);
        assert!((fused - 0.6225).abs() < 1e-12);
    }

    #[test]
    fn test_weak_consensus_falls_back_to_median() {
        // Mean 0.5, every value 0.4 away from it: ratio 0 <= 0.7.
        let fused = fuse(vec![0.1, 0.9, 0.1, 0.9]);
        assert!((fused - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_returns_itself() {
        let fused = fuse(vec![0.33]);
        assert!((fused - 0.33).abs() < 1e-12);
    }

    #[test]
    fn test_identical_values_return_that_value() {
        let fused = fuse(vec![0.6, 0.6, 0.6]);
        assert!((fused - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_agreement_check_is_strict() {
        // Both values sit exactly TOLERANCE away from the mean; the strict
        // comparison counts neither, so the median path is taken.
        let set = ValueSet::unweighted(vec![0.3, 0.7]).unwrap();
        let fused = ConsensusThreshold.evaluate(&set).fused;
        assert!((fused - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_no_confidence_output() {
        let set = ValueSet::unweighted(vec![0.4, 0.5]).unwrap();
        assert!(ConsensusThreshold.evaluate(&set).confidence.is_none());
    }
}
