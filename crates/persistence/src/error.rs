//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates model construction errors, translation
//! errors and backend errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use tessera_model::{CoercionError, ConditionOperator, ModelError};

use crate::core::BackendKind;

/// The primary error type for all persistence operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Model construction errors (null arguments, malformed conditions)
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Query translation errors
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors raised while rendering a model query into a native request.
///
/// Translation is all-or-nothing: a translator never returns a partially
/// rendered request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// The backend has no equivalent for the operator.
    #[error("{backend} does not support {operator}: {reason}")]
    UnsupportedCondition {
        backend: BackendKind,
        operator: ConditionOperator,
        reason: String,
    },

    /// The backend cannot express the LIKE pattern.
    #[error("{backend} cannot express LIKE pattern '{pattern}': {reason}")]
    UnsupportedPattern {
        backend: BackendKind,
        pattern: String,
        reason: String,
    },

    /// The backend cannot express a query feature (sort, skip, projection).
    #[error("{backend} does not support {feature}")]
    UnsupportedFeature {
        backend: BackendKind,
        feature: String,
    },

    /// An operand could not be coerced to the form the backend needs.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// A model value was invalid.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TranslationError {
    /// Creates an [`TranslationError::UnsupportedCondition`].
    pub fn unsupported(
        backend: BackendKind,
        operator: ConditionOperator,
        reason: impl Into<String>,
    ) -> Self {
        TranslationError::UnsupportedCondition {
            backend,
            operator,
            reason: reason.into(),
        }
    }

    /// Creates an [`TranslationError::UnsupportedPattern`].
    pub fn pattern(backend: BackendKind, pattern: &str, reason: impl Into<String>) -> Self {
        TranslationError::UnsupportedPattern {
            backend,
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an [`TranslationError::UnsupportedFeature`].
    pub fn feature(backend: BackendKind, feature: impl Into<String>) -> Self {
        TranslationError::UnsupportedFeature {
            backend,
            feature: feature.into(),
        }
    }
}

/// Backend-specific errors.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The requested entity or collection was not found.
    #[error("not found: {entity}/{id}")]
    NotFound { entity: String, id: String },

    /// A single result was requested but several entities matched.
    #[error("expected a single {entity}, found {count}")]
    NonUniqueResult { entity: String, count: usize },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// Backend configuration is invalid.
    #[error("invalid configuration for {backend_name}: {message}")]
    InvalidConfiguration {
        backend_name: String,
        message: String,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for translation.
pub type TranslationResult<T> = Result<T, TranslationError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::from(err))
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Internal {
            backend_name: "io".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<CoercionError> for StorageError {
    fn from(err: CoercionError) -> Self {
        StorageError::Translation(TranslationError::Coercion(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Backend(BackendError::NotFound {
            entity: "person".to_string(),
            id: "123".to_string(),
        });
        assert_eq!(err.to_string(), "not found: person/123");
    }

    #[test]
    fn test_unsupported_condition_display() {
        let err = TranslationError::unsupported(
            BackendKind::Cassandra,
            ConditionOperator::Or,
            "CQL has no disjunction",
        );
        assert_eq!(
            err.to_string(),
            "cassandra does not support OR: CQL has no disjunction"
        );
    }

    #[test]
    fn test_model_error_is_transparent() {
        let err: StorageError = ModelError::null_argument("condition").into();
        assert_eq!(err.to_string(), "required argument 'condition' is missing");
    }

    #[test]
    fn test_serde_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::SerializationError { .. })
        ));
    }
}
