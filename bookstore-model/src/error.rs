//! Error types for the model layer.

use bookstore_types::EntityKind;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while converting entity values.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value of one kind was used where another kind was required.
    #[error("expected a {expected} but got a {found}")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    /// Entity JSON must be an object.
    #[error("{kind} value is not a JSON object")]
    NotAnObject { kind: EntityKind },
}
