//! Error types for ACCORD operations

use thiserror::Error;

/// Event normalization errors.
///
/// A malformed event is never fatal: the engine classifies the record as a
/// non-conflict and surfaces the error out-of-band.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Required field missing: {field}")]
    MissingField { field: &'static str },

    #[error("Unsupported action: {action}")]
    UnsupportedAction { action: String },

    #[error("Malformed permission change payload: {action}")]
    MalformedPermissionChange { action: String },

    #[error("Malformed move payload: {action}")]
    MalformedMove { action: String },

    #[error("Invalid activity time '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

/// Constraint parsing errors.
///
/// In lenient builds a malformed constraint is dropped and the build
/// continues; in strict builds the first one fails the batch atomically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("Unknown action kind: {value}")]
    UnknownActionKind { value: String },

    #[error("Invalid comparator: {value}")]
    InvalidComparator { value: String },

    #[error("Constraint covers no documents")]
    EmptyDocumentSet,

    #[error("Constraint restricts no actors")]
    EmptyActorSet,

    #[error("Invalid allowed value '{value}' for edit constraint: {reason}")]
    InvalidAllowedValue { value: String, reason: String },
}

/// Master error type for all ACCORD errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccordError {
    #[error("Malformed event: {0}")]
    Event(#[from] EventError),

    #[error("Malformed constraint: {0}")]
    Constraint(#[from] ConstraintError),
}

/// Result type alias for ACCORD operations.
pub type AccordResult<T> = Result<T, AccordError>;
