//! Request/response payloads for the fusion boundary.
//!
//! Serde already provides JSON serialization for typed clients. This module
//! additionally implements the *raw* request path: untrusted JSON is walked
//! field by field so malformed payloads map to the typed validation errors
//! (`missing_field`, `type_mismatch`, ...) instead of opaque serde messages.
//! Structural defects that have no typed kind (non-JSON bytes, a non-object
//! root) surface as internal errors.

use serde::{Deserialize, Serialize};

use crate::error::{FusorError, FusorResult, ValidationError};
use crate::strategy::StrategyId;
use crate::values::ValueSet;

/// A single fusion request.
///
/// `strategy` absent means the engine default applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuseRequest {
    /// The observations to fuse.
    pub values: Vec<f64>,

    /// Optional parallel confidence weights.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidences: Option<Vec<f64>>,

    /// Requested strategy identifier.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub strategy: Option<StrategyId>,
}

impl FuseRequest {
    /// Creates an unweighted request for the default strategy.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            confidences: None,
            strategy: None,
        }
    }

    /// Sets the confidence weights.
    #[must_use]
    pub fn confidences(mut self, confidences: Vec<f64>) -> Self {
        self.confidences = Some(confidences);
        self
    }

    /// Selects a strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: StrategyId) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Parses a request from raw JSON text.
    ///
    /// # Errors
    ///
    /// Typed validation/execution errors for defects the protocol can name
    /// (missing `values`, non-numeric elements, unknown strategy strings);
    /// an internal error for bytes that are not a JSON object at all.
    pub fn from_json(s: &str) -> FusorResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| FusorError::internal(format!("malformed request JSON: {e}")))?;
        Self::from_value(&raw)
    }

    /// Parses a request from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`FuseRequest::from_json`].
    pub fn from_value(raw: &serde_json::Value) -> FusorResult<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| FusorError::internal("request must be a JSON object"))?;

        let values = match obj.get("values") {
            None | Some(serde_json::Value::Null) => {
                return Err(ValidationError::MissingField {
                    field: "values".to_string(),
                }
                .into());
            }
            Some(v) => numeric_seq("values", v)?,
        };

        let confidences = match obj.get("confidences") {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(numeric_seq("confidences", v)?),
        };

        let strategy = match obj.get("strategy") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.parse::<StrategyId>()?),
            Some(other) => {
                return Err(FusorError::internal(format!(
                    "'strategy' must be a string, got {other}"
                )));
            }
        };

        Ok(Self {
            values,
            confidences,
            strategy,
        })
    }

    /// Validates the request body into a [`ValueSet`].
    ///
    /// # Errors
    ///
    /// The [`ValueSet::new`] validation errors.
    pub fn into_value_set(self) -> Result<ValueSet, ValidationError> {
        ValueSet::new(self.values, self.confidences)
    }

    /// Serializes the request to JSON.
    ///
    /// # Errors
    ///
    /// Internal error if serialization fails.
    pub fn to_json(&self) -> FusorResult<String> {
        serde_json::to_string(self)
            .map_err(|e| FusorError::internal(format!("serialize request: {e}")))
    }
}

/// Extracts a sequence of numbers, failing with a typed error on any
/// non-numeric element (or a non-array field).
fn numeric_seq(field: &'static str, v: &serde_json::Value) -> Result<Vec<f64>, ValidationError> {
    let arr = v.as_array().ok_or_else(|| ValidationError::TypeMismatch {
        field: field.to_string(),
        index: 0,
    })?;

    let mut out = Vec::with_capacity(arr.len());
    for (index, element) in arr.iter().enumerate() {
        let n = element.as_f64().ok_or_else(|| ValidationError::TypeMismatch {
            field: field.to_string(),
            index,
        })?;
        out.push(n);
    }
    Ok(out)
}

/// Builds the structured error body the boundary adapter writes on failure.
///
/// The shape is `{ "error": { "kind": ..., "message": ... } }` with a stable
/// snake_case kind, so callers never receive a fabricated fused value on
/// invalid input.
#[must_use]
pub fn error_body(err: &FusorError) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "kind": err.kind(),
            "message": err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_full_request() {
        let req = FuseRequest::from_json(
            r#"{"values": [0.2, 0.8], "confidences": [1, 3], "strategy": "weighted_confidence"}"#,
        )
        .unwrap();
        assert_eq!(req.values, vec![0.2, 0.8]);
        assert_eq!(req.confidences, Some(vec![1.0, 3.0]));
        assert_eq!(req.strategy, Some(StrategyId::WeightedConfidence));
    }

    #[test]
    fn test_from_json_minimal_request() {
        let req = FuseRequest::from_json(r#"{"values": [0.5]}"#).unwrap();
        assert_eq!(req.values, vec![0.5]);
        assert!(req.confidences.is_none());
        assert!(req.strategy.is_none());
    }

    #[test]
    fn test_from_json_missing_values() {
        let err = FuseRequest::from_json(r#"{"strategy": "fuzzy"}"#).unwrap_err();
        assert_eq!(err.kind(), "missing_field");
    }

    #[test]
    fn test_from_json_null_values_is_missing() {
        let err = FuseRequest::from_json(r#"{"values": null}"#).unwrap_err();
        assert_eq!(err.kind(), "missing_field");
    }

    #[test]
    fn test_from_json_non_numeric_value_element() {
        let err = FuseRequest::from_json(r#"{"values": [0.5, "high"]}"#).unwrap_err();
        let FusorError::Validation(ValidationError::TypeMismatch { field, index }) = err else {
            panic!("expected TypeMismatch, got {err:?}");
        };
        assert_eq!(field, "values");
        assert_eq!(index, 1);
    }

    #[test]
    fn test_from_json_non_numeric_confidence_element() {
        let err =
            FuseRequest::from_json(r#"{"values": [0.5], "confidences": [true]}"#).unwrap_err();
        assert_eq!(err.kind(), "type_mismatch");
    }

    #[test]
    fn test_from_json_values_not_an_array() {
        let err = FuseRequest::from_json(r#"{"values": 0.5}"#).unwrap_err();
        assert_eq!(err.kind(), "type_mismatch");
    }

    #[test]
    fn test_from_json_unknown_strategy() {
        let err = FuseRequest::from_json(r#"{"values": [0.5], "strategy": "psychic"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), "unknown_strategy");
    }

    #[test]
    fn test_from_json_malformed_bytes() {
        let err = FuseRequest::from_json("not json").unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_from_json_non_object_root() {
        let err = FuseRequest::from_json("[0.1, 0.2]").unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_builder_round_trips_through_json() {
        let req = FuseRequest::new(vec![0.1, 0.9])
            .confidences(vec![0.5, 0.5])
            .strategy(StrategyId::Consensus);
        let json = req.to_json().unwrap();
        let decoded = FuseRequest::from_json(&json).unwrap();
        assert_eq!(req, decoded);
    }

    #[test]
    fn test_into_value_set_applies_validation() {
        let err = FuseRequest::new(vec![]).into_value_set().unwrap_err();
        assert!(matches!(err, ValidationError::EmptyInput));

        let err = FuseRequest::new(vec![0.1])
            .confidences(vec![0.5, 0.5])
            .into_value_set()
            .unwrap_err();
        assert!(matches!(err, ValidationError::LengthMismatch { .. }));
    }

    #[test]
    fn test_error_body_shape() {
        let err: FusorError = ValidationError::EmptyInput.into();
        let body = error_body(&err);
        assert_eq!(body["error"]["kind"], "empty_input");
        assert!(body["error"]["message"].as_str().unwrap().contains("at least one"));
    }
}
