//! Weighted-average fusion.
//!
//! Two weighting schemes share the same Σ v·w core: `SelfWeighted` derives
//! weights from the observations themselves, `WeightedConfidence` from the
//! caller-supplied confidence sequence. Both recover from a zero weight sum
//! by substituting uniform weights rather than dividing by zero.

use crate::strategy::{Evaluation, FusionStrategy, StrategyId};
use crate::values::ValueSet;

/// Weighted average of the values against a weight vector.
///
/// When the weight sum is positive, weights are normalized by it; a
/// non-positive sum falls back to uniform `1/n` weighting. Returns the
/// fused value and whether the fallback was taken.
#[allow(clippy::cast_precision_loss)]
fn weighted_mean(values: &[f64], weights: &[f64]) -> (f64, bool) {
    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        let fused = values
            .iter()
            .zip(weights)
            .map(|(v, w)| v * (w / sum))
            .sum();
        (fused, true)
    } else {
        let n = values.len() as f64;
        (values.iter().sum::<f64>() / n, false)
    }
}

/// Weighted average using the observations as their own weights.
///
/// Larger observations pull the fused value toward themselves, which biases
/// the estimate toward confident-high inputs. An all-zero input degenerates
/// to the uniform mean.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelfWeighted;

impl FusionStrategy for SelfWeighted {
    fn id(&self) -> StrategyId {
        StrategyId::Weighted
    }

    fn evaluate(&self, input: &ValueSet) -> Evaluation {
        let (fused, _) = weighted_mean(input.values(), input.values());
        Evaluation::of(fused)
    }
}

/// Confidence-weighted average with an aggregate-confidence output.
///
/// This is the engine default: with no confidences supplied it degrades to
/// plain uniform averaging, which makes it safe to apply to any input.
///
/// The `confidence` output is the mean of the *raw* confidences (1.0 when
/// none were supplied). It reports how much evidence backed the fusion,
/// independent of the fused value, and is deliberately not normalized or
/// clamped: callers passing confidences outside [0, 1] see that reflected
/// in the aggregate.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedConfidence;

impl FusionStrategy for WeightedConfidence {
    fn id(&self) -> StrategyId {
        StrategyId::WeightedConfidence
    }

    #[allow(clippy::cast_precision_loss)]
    fn evaluate(&self, input: &ValueSet) -> Evaluation {
        let Some(confidences) = input.confidences() else {
            let n = input.len() as f64;
            return Evaluation {
                fused: input.values().iter().sum::<f64>() / n,
                confidence: Some(1.0),
                degenerate_weights: false,
            };
        };

        let (fused, normalized) = weighted_mean(input.values(), confidences);
        let aggregate = confidences.iter().sum::<f64>() / confidences.len() as f64;
        Evaluation {
            fused,
            confidence: Some(aggregate),
            degenerate_weights: !normalized,
        }
    }
}
