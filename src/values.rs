//! Validated fusion input.
//!
//! A `ValueSet` is the single validated form every strategy consumes: an
//! ordered, non-empty sequence of scalar observations plus an optional
//! parallel sequence of confidence weights. Validation happens exactly once,
//! at construction; strategies can then assume the invariants hold.
//!
//! Out-of-range observations are deliberately *not* clamped here. Statistics
//! (mean, median, standard deviation) must see the raw inputs; only the
//! final fused scalar is clamped, centrally, by the engine.

use crate::error::ValidationError;

/// Conservative upper bound for the number of observations in one request.
///
/// This is a safety limit to prevent memory/CPU abuse via unbounded vectors
/// on the embedded/server path.
pub const MAX_VALUES: usize = 65_536;

/// An ordered, validated, immutable set of scalar observations.
///
/// Invariants (enforced at construction):
/// - `values` is non-empty and no longer than [`MAX_VALUES`];
/// - `confidences`, when present, is non-empty and exactly as long as
///   `values`. An explicitly empty confidence list is normalized to
///   "absent", matching the unweighted posture of the weighted strategies.
///
/// # Examples
///
/// ```
/// use fusor::ValueSet;
///
/// let set = ValueSet::new(vec![0.2, 0.8], Some(vec![1.0, 3.0])).unwrap();
/// assert_eq!(set.len(), 2);
/// assert!((set.mean() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSet {
    values: Vec<f64>,
    confidences: Option<Vec<f64>>,
}

impl ValueSet {
    /// Creates a validated value set.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyInput`] if `values` is empty.
    /// - [`ValidationError::TooManyValues`] if `values` exceeds [`MAX_VALUES`].
    /// - [`ValidationError::LengthMismatch`] if a non-empty `confidences`
    ///   list has a different length than `values`.
    pub fn new(
        values: Vec<f64>,
        confidences: Option<Vec<f64>>,
    ) -> Result<Self, ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::EmptyInput);
        }
        if values.len() > MAX_VALUES {
            return Err(ValidationError::TooManyValues {
                count: values.len(),
                max: MAX_VALUES,
            });
        }

        // An empty confidence list means "unweighted", same as absent.
        let confidences = confidences.filter(|c| !c.is_empty());
        if let Some(c) = &confidences {
            if c.len() != values.len() {
                return Err(ValidationError::LengthMismatch {
                    values: values.len(),
                    confidences: c.len(),
                });
            }
        }

        Ok(Self {
            values,
            confidences,
        })
    }

    /// Creates an unweighted value set.
    ///
    /// # Errors
    ///
    /// Same as [`ValueSet::new`] with absent confidences.
    pub fn unweighted(values: Vec<f64>) -> Result<Self, ValidationError> {
        Self::new(values, None)
    }

    /// The observations, in input order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The confidence weights, if any were supplied.
    #[must_use]
    pub fn confidences(&self) -> Option<&[f64]> {
        self.confidences.as_deref()
    }

    /// Number of observations. Always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; kept for API symmetry with slice types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Arithmetic mean of the observations.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Median of the observations.
    ///
    /// Even-length sets average the two middle elements.
    #[must_use]
    pub fn median(&self) -> f64 {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        }
    }

    /// Population standard deviation of the observations.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stddev(&self) -> f64 {
        let mean = self.mean();
        let variance = self
            .values
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / self.values.len() as f64;
        variance.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_values() {
        let err = ValueSet::new(vec![], None).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyInput));
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = ValueSet::new(vec![0.1, 0.2, 0.3], Some(vec![1.0, 2.0])).unwrap_err();
        let ValidationError::LengthMismatch {
            values,
            confidences,
        } = err
        else {
            panic!("expected LengthMismatch, got {err:?}");
        };
        assert_eq!(values, 3);
        assert_eq!(confidences, 2);
    }

    #[test]
    fn test_new_rejects_oversized_input() {
        let err = ValueSet::new(vec![0.5; MAX_VALUES + 1], None).unwrap_err();
        assert!(matches!(err, ValidationError::TooManyValues { .. }));
    }

    #[test]
    fn test_empty_confidences_normalized_to_absent() {
        let set = ValueSet::new(vec![0.1, 0.9], Some(vec![])).unwrap();
        assert!(set.confidences().is_none());
    }

    #[test]
    fn test_values_are_stored_unclamped() {
        let set = ValueSet::unweighted(vec![-0.5, 1.5]).unwrap();
        assert_eq!(set.values(), &[-0.5, 1.5]);
        assert!((set.mean() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mean() {
        let set = ValueSet::unweighted(vec![0.2, 0.4, 0.6]).unwrap();
        assert!((set.mean() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_median_odd() {
        let set = ValueSet::unweighted(vec![0.9, 0.1, 0.5]).unwrap();
        assert!((set.median() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_median_even_averages_middles() {
        let set = ValueSet::unweighted(vec![0.1, 0.9, 0.1, 0.9]).unwrap();
        assert!((set.median() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_median_single_element() {
        let set = ValueSet::unweighted(vec![0.42]).unwrap();
        assert!((set.median() - 0.42).abs() < 1e-12);
    }

    #[test]
    fn test_stddev_is_population() {
        // Population stddev of [0.0, 1.0] is 0.5 (sample would be ~0.707).
        let set = ValueSet::unweighted(vec![0.0, 1.0]).unwrap();
        assert!((set.stddev() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_stddev_constant_input_is_zero() {
        let set = ValueSet::unweighted(vec![0.7, 0.7, 0.7]).unwrap();
        assert!(set.stddev().abs() < 1e-12);
    }

    #[test]
    fn test_len_and_is_empty() {
        let set = ValueSet::unweighted(vec![0.5]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }
}
