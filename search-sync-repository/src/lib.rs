//! # Search Sync Repository
//!
//! This crate provides traits and implementations for the durable stores and
//! external collaborators of the search sync pipeline: the index queue, the
//! index status store, the entity repository boundary, and the search index
//! provider. It includes PostgreSQL backends for the durable stores, an
//! OpenSearch backend for the search index, and in-memory backends used by
//! tests and local development.

pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod opensearch;
pub mod postgres;
pub mod types;

pub use errors::{
    EntityRepositoryError, IndexStatusError, QueueStoreError, SearchIndexError,
};
pub use interfaces::{EntityRepository, IndexQueue, IndexStatusStore, SearchIndexProvider};
pub use opensearch::OpenSearchProvider;
pub use postgres::{PostgresEntityRepository, PostgresIndexQueue, PostgresIndexStatusStore};
pub use types::{
    DeleteDocumentRequest, EntityPage, EntityRecord, IndexDocumentRequest, NewQueueItem,
    QueueStatusFilter, StatusUpdate,
};
