//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    DeleteParts, IndexParts, OpenSearch,
};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::types::{DeleteDocumentRequest, IndexDocumentRequest};
use search_sync_shared::EntityType;

/// OpenSearch provider implementation.
///
/// Writes full-document overwrites into per-tenant, per-entity-type indexes.
/// Document ids are the record ids; tenancy is carried by the index name, so
/// no cross-tenant collision is possible.
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing prefix and version
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            prefix = %index_config.prefix,
            version = index_config.version,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ensure_index_exists(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
    ) -> Result<(), SearchIndexError> {
        let index = self.index_config.index_name(tenant_id, entity_type);

        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index))
            .body(get_index_settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Another worker may have created the index concurrently.
            if error_body.contains("resource_already_exists_exception") {
                return Ok(());
            }
            error!(index = %index, status = %status, body = %error_body, "Index creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create index {} failed with status {}: {}",
                index, status, error_body
            )));
        }

        info!(index = %index, "Created search index");
        Ok(())
    }

    async fn index_document(
        &self,
        request: &IndexDocumentRequest,
    ) -> Result<(), SearchIndexError> {
        let index = self
            .index_config
            .index_name(&request.tenant_id, request.entity_type);

        let body = serde_json::to_value(&request.document)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        // Full-document overwrite: the index API replaces any existing
        // document with the same id, which keeps retries idempotent.
        let response = self
            .client
            .index(IndexParts::IndexId(&index, &request.entity_id))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                index = %index,
                entity_id = %request.entity_id,
                status = %status,
                body = %error_body,
                "Index request failed"
            );
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, entity_id = %request.entity_id, "Document indexed");
        Ok(())
    }

    async fn delete_document(
        &self,
        request: &DeleteDocumentRequest,
    ) -> Result<(), SearchIndexError> {
        let index = self
            .index_config
            .index_name(&request.tenant_id, request.entity_type);

        let response = self
            .client
            .delete(DeleteParts::IndexId(&index, &request.entity_id))
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - document may not exist
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                index = %index,
                entity_id = %request.entity_id,
                status = %status,
                body = %error_body,
                "Delete request failed"
            );
            return Err(SearchIndexError::delete(format!(
                "Delete failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, entity_id = %request.entity_id, "Document deleted");
        Ok(())
    }
}
