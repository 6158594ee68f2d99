//! Queue store error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors from index queue persistence operations.
#[derive(Debug, Error)]
pub enum QueueStoreError {
    /// Underlying database failure.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// No queue item exists with the given id.
    #[error("Queue item not found: {0}")]
    ItemNotFound(Uuid),

    /// A stored row could not be decoded into a queue item.
    #[error("Invalid queue item: {0}")]
    InvalidItem(String),
}

impl QueueStoreError {
    /// Create an invalid-item error.
    pub fn invalid_item(msg: impl Into<String>) -> Self {
        Self::InvalidItem(msg.into())
    }
}
