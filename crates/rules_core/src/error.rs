//! Error types for rule-driven validation.
//!
//! Validation is fail-fast: the first violated constraint aborts the whole
//! call and surfaces as a single [`ValidationError`]. Callers that need to
//! react to a particular failure should match on [`ValidationError::kind`]
//! rather than on the rendered message.

use thiserror::Error;

/// Result type for validation operations.
pub type Result<T = ()> = std::result::Result<T, ValidationError>;

/// Errors raised while validating a value against a rule tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The value handed to the validator (or a list item) is null.
    #[error("Object cannot be null")]
    NullTarget,

    /// A scalar field carrying a `required` rule is null.
    #[error("{field} is required")]
    RequiredFieldMissing { field: String },

    /// A nested-object field carrying a `required` rule is null.
    #[error("Required nested object cannot be null")]
    RequiredObjectNull { field: String },

    /// A list field carrying a `required` rule is null.
    #[error("Required list cannot be null")]
    RequiredListNull { field: String },

    /// A list field carrying a `required` rule has no elements.
    #[error("Required list cannot be empty")]
    RequiredListEmpty { field: String },

    /// The field's string form does not fully match the configured pattern.
    #[error("{field} {message}")]
    PatternMismatch { field: String, message: String },

    /// The field's string form is shorter or longer than allowed.
    #[error("{field} {message}")]
    LengthViolation { field: String, message: String },

    /// A numeric field is below its lower bound.
    #[error("{field} must be at least {min}")]
    RangeViolation { field: String, min: f64, actual: f64 },

    /// A constraint rule names a checker that was never registered.
    #[error("Unknown validation type: {0}")]
    UnknownValidatorType(String),

    /// The named field cannot be read from the current value.
    #[error("Error accessing field: {field} (on {target})")]
    FieldAccess { field: String, target: String },

    /// A value has a different shape than the rule expects.
    #[error("Type mismatch for field '{field}': expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// A constraint rule is missing a parameter or carries an unusable one.
    #[error("Invalid '{rule}' rule: {message}")]
    InvalidRule { rule: String, message: String },

    /// Failure reported by a user-registered checker.
    #[error("{field} {message}")]
    ConstraintViolation { field: String, message: String },
}

/// Discriminant of a [`ValidationError`], for structured handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NullTarget,
    RequiredFieldMissing,
    RequiredObjectNull,
    RequiredListNull,
    RequiredListEmpty,
    PatternMismatch,
    LengthViolation,
    RangeViolation,
    UnknownValidatorType,
    FieldAccess,
    TypeMismatch,
    InvalidRule,
    ConstraintViolation,
}

impl ValidationError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NullTarget => ErrorKind::NullTarget,
            Self::RequiredFieldMissing { .. } => ErrorKind::RequiredFieldMissing,
            Self::RequiredObjectNull { .. } => ErrorKind::RequiredObjectNull,
            Self::RequiredListNull { .. } => ErrorKind::RequiredListNull,
            Self::RequiredListEmpty { .. } => ErrorKind::RequiredListEmpty,
            Self::PatternMismatch { .. } => ErrorKind::PatternMismatch,
            Self::LengthViolation { .. } => ErrorKind::LengthViolation,
            Self::RangeViolation { .. } => ErrorKind::RangeViolation,
            Self::UnknownValidatorType(_) => ErrorKind::UnknownValidatorType,
            Self::FieldAccess { .. } => ErrorKind::FieldAccess,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::InvalidRule { .. } => ErrorKind::InvalidRule,
            Self::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
        }
    }

    /// Returns the field the error is attached to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::RequiredFieldMissing { field }
            | Self::RequiredObjectNull { field }
            | Self::RequiredListNull { field }
            | Self::RequiredListEmpty { field }
            | Self::PatternMismatch { field, .. }
            | Self::LengthViolation { field, .. }
            | Self::RangeViolation { field, .. }
            | Self::FieldAccess { field, .. }
            | Self::TypeMismatch { field, .. }
            | Self::ConstraintViolation { field, .. } => Some(field),
            Self::NullTarget | Self::UnknownValidatorType(_) | Self::InvalidRule { .. } => None,
        }
    }

    /// Creates a new required-field error.
    pub fn required(field: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field: field.into(),
        }
    }

    /// Creates a new field access error.
    pub fn field_access(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self::FieldAccess {
            field: field.into(),
            target: target.into(),
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a new invalid rule error.
    pub fn invalid_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Creates a new constraint violation error.
    pub fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            field: field.into(),
            message: message.into(),
        }
    }
}
