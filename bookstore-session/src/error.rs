//! Error types for the session layer.

use crate::state::SessionPhase;
use bookstore_model::ModelError;
use bookstore_types::{EntityKind, RecordId};
use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur in edit sessions and their collaborators.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Entity conversion error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The edit screen of this kind has no such field.
    #[error("{kind} form has no field `{field}`")]
    UnknownField { kind: EntityKind, field: String },

    /// A value does not fit the field it was written to.
    #[error("field `{field}` expects {expected}")]
    FieldTypeMismatch {
        field: String,
        expected: &'static str,
    },

    /// The operation is not valid in the session's current phase.
    #[error("cannot {operation} while {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: SessionPhase,
    },

    /// A save is already in flight and overlapping saves are rejected.
    #[error("a save is already in flight")]
    SaveInFlight,

    /// Entity not found.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: RecordId },

    /// The backend refused the request.
    #[error("bad request for {kind} ({key}): {message}")]
    BadRequest {
        kind: EntityKind,
        key: &'static str,
        message: String,
    },

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// Timeout.
    #[error("operation timed out")]
    Timeout,
}
