//! Fuzzy-rule fusion.

use crate::strategy::{Evaluation, FusionStrategy, StrategyId};
use crate::values::ValueSet;

/// A cascade of mutually exclusive rules evaluated in fixed priority order;
/// the first match wins.
///
/// Over the mean `m` and population standard deviation `s`:
///
/// 1. `m > 0.8` and `s < 0.1` fuses to 0.95 (confident-high override);
/// 2. `m < 0.2` and `s < 0.1` fuses to 0.05 (confident-low override);
/// 3. `s < 0.2` fuses to `m` (moderate agreement, trust the mean);
/// 4. otherwise the observations are split at 0.5 and the majority side is
///    averaged (bimodal disagreement tie-break).
///
/// In rule 4 the partition is exhaustive, so the side selected by the branch
/// condition is never empty: `high.len() > n/2` guarantees a non-empty
/// `high`, and a failed majority test with `n >= 1` guarantees a non-empty
/// `low`. This is a closed case, not a defensive check.
#[derive(Debug, Default, Clone, Copy)]
pub struct FuzzyRule;

impl FuzzyRule {
    /// Fused value returned by the confident-high override.
    pub const HIGH_OVERRIDE: f64 = 0.95;

    /// Fused value returned by the confident-low override.
    pub const LOW_OVERRIDE: f64 = 0.05;
}

impl FusionStrategy for FuzzyRule {
    fn id(&self) -> StrategyId {
        StrategyId::Fuzzy
    }

    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, input: &ValueSet) -> Evaluation {
        let mean = input.mean();
        let stddev = input.stddev();

        if mean > 0.8 && stddev < 0.1 {
            return Evaluation::of(Self::HIGH_OVERRIDE);
        }
        if mean < 0.2 && stddev < 0.1 {
            return Evaluation::of(Self::LOW_OVERRIDE);
        }
        if stddev < 0.2 {
            return Evaluation::of(mean);
        }

        // High disagreement: average the majority side of the 0.5 split.
        let n = input.len();
        let high: Vec<f64> = input.values().iter().copied().filter(|v| *v > 0.5).collect();
        let side = if high.len() * 2 > n {
            high
        } else {
            input.values().iter().copied().filter(|v| *v <= 0.5).collect()
        };
        let fused = side.iter().sum::<f64>() / side.len() as f64;
        Evaluation::of(fused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuse(values: Vec<f64>) -> f64 {
        let set = ValueSet::unweighted(values).unwrap();
        FuzzyRule.evaluate(&set).fused
    }

    #[test]
    fn test_confident_high_override() {
        // mean ~0.877, stddev ~0.02: rule 1 returns the override, not the mean.
        let fused = fuse(vec![0.85, 0.88, 0.9]);
        assert!((fused - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_confident_low_override() {
        let fused = fuse(vec![0.1, 0.12, 0.08]);
        assert!((fused - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_moderate_agreement_returns_mean() {
        // mean 0.5, stddev ~0.14: rules 1 and 2 miss, rule 3 trusts the mean.
        let fused = fuse(vec![0.35, 0.5, 0.65]);
        assert!((fused - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_majority_low_side_average() {
        // stddev ~0.377 >= 0.2; high = {0.9} is not a majority of 3, so the
        // low side {0.1, 0.1} is averaged.
        let fused = fuse(vec![0.9, 0.1, 0.1]);
        assert!((fused - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_majority_high_side_average() {
        let fused = fuse(vec![0.8, 0.9, 0.1]);
        assert!((fused - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_even_split_prefers_low_side() {
        // Exactly half above 0.5: not a strict majority, so the low side wins.
        let fused = fuse(vec![0.1, 0.9]);
        assert!((fused - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_value_counts_as_low() {
        // 0.5 itself belongs to the low partition.
        let fused = fuse(vec![0.5, 0.5, 0.95, 0.95]);
        assert!((fused - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_no_confidence_output() {
        let set = ValueSet::unweighted(vec![0.2, 0.8]).unwrap();
        assert!(FuzzyRule.evaluate(&set).confidence.is_none());
    }
}
