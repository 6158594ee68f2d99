//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search engine operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch,
//! recording test doubles).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::{DeleteDocumentRequest, IndexDocumentRequest};
use search_sync_shared::EntityType;

/// Abstracts the underlying search engine.
///
/// Implementations are injected into the queue processor to enable dependency
/// injection and testing with recording doubles.
///
/// # Idempotence
///
/// `index_document` is a full-document overwrite: re-indexing the same id
/// replaces the previous document. There is no partial update path, which is
/// what makes at-least-once queue delivery safe.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the index for one `(tenant_id, entity_type)` pair exists,
    /// creating it if necessary.
    ///
    /// Should be called during application startup, before document
    /// operations.
    async fn ensure_index_exists(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
    ) -> Result<(), SearchIndexError>;

    /// Index a document, overwriting any existing document with the same id.
    async fn index_document(&self, request: &IndexDocumentRequest)
        -> Result<(), SearchIndexError>;

    /// Delete a document from the search index.
    ///
    /// If the document doesn't exist, the operation is considered successful.
    async fn delete_document(
        &self,
        request: &DeleteDocumentRequest,
    ) -> Result<(), SearchIndexError>;
}
