//! Error types for the data model.
//!
//! Model errors are raised synchronously at the point of detection:
//!
//! - [`ModelError::NullArgument`] when a required input is missing
//! - [`ModelError::Configuration`] when a condition or query is malformed
//! - [`CoercionError`] when a value cannot satisfy a requested target type

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for model construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A required argument was missing (null, `None` or empty).
    #[error("required argument '{argument}' is missing")]
    NullArgument { argument: &'static str },

    /// A condition or query was constructed with an invalid shape.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// A value could not be coerced while building the model.
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

impl ModelError {
    /// Creates a [`ModelError::NullArgument`] for the named argument.
    pub fn null_argument(argument: &'static str) -> Self {
        ModelError::NullArgument { argument }
    }

    /// Creates a [`ModelError::Configuration`] with the given message.
    pub fn configuration(message: impl Into<String>) -> Self {
        ModelError::Configuration {
            message: message.into(),
        }
    }
}

/// Errors raised when a stored value cannot be read as a target type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// No reader is registered for the (stored kind, target) pair.
    #[error("cannot coerce {from} to {to}")]
    Unsupported { from: String, to: String },

    /// The stored text is not a valid literal of the target type.
    #[error("cannot parse '{input}' as {to}: {message}")]
    Parse {
        input: String,
        to: String,
        message: String,
    },

    /// The stored number does not fit in the target type.
    #[error("value {input} is out of range for {to}")]
    OutOfRange { input: String, to: String },

    /// The stored shape (scalar, sequence, structure) does not match the target.
    #[error("expected {expected}, found {found}")]
    Shape { expected: String, found: String },

    /// A raw sequence or structure contained a null element.
    #[error("null element at position {position}")]
    NullElement { position: String },
}

impl CoercionError {
    pub(crate) fn unsupported(from: impl ToString, to: impl ToString) -> Self {
        CoercionError::Unsupported {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub(crate) fn parse(input: impl Into<String>, to: impl ToString, message: impl ToString) -> Self {
        CoercionError::Parse {
            input: input.into(),
            to: to.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn out_of_range(input: impl ToString, to: impl ToString) -> Self {
        CoercionError::OutOfRange {
            input: input.to_string(),
            to: to.to_string(),
        }
    }
}

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
