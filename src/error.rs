//! Error types for the GA engine.
//!
//! Two families exist, both fatal and never retried:
//!
//! - [`ConstraintViolation`]: a chromosome that does not fit its bounds.
//! - [`ConfigError`]: a run that cannot start, either because a parameter
//!   is out of range or because an operator strategy does not support the
//!   population's individual representation.

use crate::ga::Representation;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GaError>;

/// Top-level error for every fallible operation in the crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GaError {
    #[error("constraint violation: {0}")]
    ConstraintViolation(#[from] ConstraintViolation),
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// A chromosome assignment that breaks the bounds invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("chromosome has {actual} genes, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("gene {gene} = {value} lies outside [{lower}, {upper}]")]
    OutOfBounds {
        gene: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },
}

/// A run that is rejected before the first generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{operator} operator does not support {representation:?} individuals")]
    Incompatible {
        operator: &'static str,
        representation: Representation,
    },
    #[error("{0}")]
    Invalid(String),
}

impl GaError {
    /// Shorthand for an invalid-parameter configuration error.
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        GaError::Configuration(ConfigError::Invalid(message.into()))
    }

    /// Returns `true` for [`GaError::ConstraintViolation`].
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, GaError::ConstraintViolation(_))
    }

    /// Returns `true` for [`GaError::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, GaError::Configuration(_))
    }
}
