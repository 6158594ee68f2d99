//! Entity repository error types.

use thiserror::Error;

/// Errors from reads against the relational business store.
#[derive(Debug, Error)]
pub enum EntityRepositoryError {
    /// Underlying database failure.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// A stored row could not be decoded into an entity record.
    #[error("Invalid entity record: {0}")]
    InvalidRecord(String),
}

impl EntityRepositoryError {
    /// Create an invalid-record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
