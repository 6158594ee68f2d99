//! Index status store error types.

use thiserror::Error;

/// Errors from index status persistence operations.
#[derive(Debug, Error)]
pub enum IndexStatusError {
    /// Underlying database failure.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// A stored row could not be decoded into a status record.
    #[error("Invalid status record: {0}")]
    InvalidRecord(String),
}

impl IndexStatusError {
    /// Create an invalid-record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
