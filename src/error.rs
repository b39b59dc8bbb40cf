//! Error types for fusor.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific error conditions and provides clear error messages.
//! Every variant also carries a stable snake_case `kind` identifier so the
//! boundary adapter can report machine-readable failures.

use thiserror::Error;

use crate::strategy::StrategyId;

/// Validation errors that occur while turning raw input into a `ValueSet`.
///
/// All of these are detected before any strategy executes; a request that
/// fails validation never produces a fused value.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("'values' must contain at least one observation")]
    EmptyInput,

    #[error("Element {index} of '{field}' is not a number")]
    TypeMismatch {
        field: String,
        index: usize,
    },

    #[error("'confidences' has {confidences} elements but 'values' has {values}")]
    LengthMismatch {
        values: usize,
        confidences: usize,
    },

    #[error("'values' has {count} elements, exceeding the maximum of {max}")]
    TooManyValues {
        count: usize,
        max: usize,
    },
}

impl ValidationError {
    /// Stable snake_case identifier for this error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::EmptyInput => "empty_input",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::LengthMismatch { .. } => "length_mismatch",
            Self::TooManyValues { .. } => "too_many_values",
        }
    }
}

/// Execution errors that occur after validation, while resolving or running
/// a strategy.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Unknown strategy: '{name}'")]
    UnknownStrategy {
        name: String,
    },

    #[error("Strategy '{strategy}' produced a non-finite result")]
    NonFiniteResult {
        strategy: StrategyId,
    },

    #[error("The {path} queue is full (capacity: {capacity})")]
    QueueFull {
        path: String,
        capacity: usize,
    },

    #[error("The {path} worker pool is disconnected")]
    Disconnected {
        path: String,
    },

    #[error("Fusion call timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },
}

impl ExecutionError {
    /// Stable snake_case identifier for this error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownStrategy { .. } => "unknown_strategy",
            Self::NonFiniteResult { .. } => "non_finite_result",
            Self::QueueFull { .. } => "queue_full",
            Self::Disconnected { .. } => "disconnected",
            Self::Timeout { .. } => "timeout",
        }
    }
}

/// Top-level error type for fusor.
///
/// This enum encompasses all possible errors that can occur when
/// constructing input, resolving a strategy, or executing a fusion call.
#[derive(Debug, Error)]
pub enum FusorError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl FusorError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Stable snake_case identifier for this error kind, suitable for the
    /// boundary adapter's structured error responses.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.kind(),
            Self::Execution(e) => e.kind(),
            Self::Internal { .. } => "internal",
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Fusion is stateless and idempotent, so nothing is retried
    /// automatically; this only tells a caller whether calling again with
    /// the same input could possibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            // Validation errors won't change on retry; the input is wrong.
            Self::Validation(_) => false,
            Self::Execution(e) => matches!(
                e,
                ExecutionError::QueueFull { .. } | ExecutionError::Timeout { .. }
            ),
            Self::Internal { .. } => false,
        }
    }
}

/// Result type alias for fusor operations.
pub type FusorResult<T> = Result<T, FusorError>;
