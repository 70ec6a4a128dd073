//! Core type definitions for the bookstore admin.
//!
//! This crate defines the small, dependency-free vocabulary shared by the
//! model, reconciliation and session crates:
//! - Record identifiers assigned by the backing store
//! - Edit session identifiers (UUID v7) for log correlation
//! - The closed set of entity kinds and their routing metadata

mod ids;
mod kind;

pub use ids::{RecordId, SessionId};
pub use kind::EntityKind;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid record id: {0}")]
    InvalidRecordId(#[from] std::num::ParseIntError),

    #[error("invalid session id: {0}")]
    InvalidSessionId(#[from] uuid::Error),

    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),
}
