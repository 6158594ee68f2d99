//! Index status store trait definition.

use async_trait::async_trait;

use crate::errors::IndexStatusError;
use crate::types::StatusUpdate;
use search_sync_shared::{EntityType, IndexStatusRecord};

/// Single source of truth for per-tenant, per-entity-type index health.
///
/// At most one record exists per `(tenant_id, entity_type)` pair; writes are
/// upserts and records are never deleted.
#[async_trait]
pub trait IndexStatusStore: Send + Sync {
    /// Upsert the status record for one `(tenant_id, entity_type)` pair.
    ///
    /// `last_updated` is always refreshed. `document_count` is written only
    /// when the update supplies one; an absent count preserves the previously
    /// stored value. A single-document INDEX does not know the total count and
    /// must not destroy the count established by a REINDEX.
    async fn set_status(&self, update: &StatusUpdate)
        -> Result<IndexStatusRecord, IndexStatusError>;

    /// Read the status record for one `(tenant_id, entity_type)` pair.
    async fn get_index_status(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
    ) -> Result<Option<IndexStatusRecord>, IndexStatusError>;

    /// List all status records for a tenant.
    async fn list_indexes(&self, tenant_id: &str)
        -> Result<Vec<IndexStatusRecord>, IndexStatusError>;
}
