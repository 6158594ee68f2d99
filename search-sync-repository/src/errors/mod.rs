//! Error types for the search sync repository.
//!
//! Each repository interface has its own error enum so callers can match on
//! the concern that failed without a catch-all error type.

mod entity_repository_error;
mod index_status_error;
mod queue_store_error;
mod search_index_error;

pub use entity_repository_error::EntityRepositoryError;
pub use index_status_error::IndexStatusError;
pub use queue_store_error::QueueStoreError;
pub use search_index_error::SearchIndexError;
