//! Entity repository trait definition.
//!
//! This is the read-only boundary to the relational store holding business
//! entities. The pipeline never writes through it.

use async_trait::async_trait;

use crate::errors::EntityRepositoryError;
use crate::types::{EntityPage, EntityRecord};
use search_sync_shared::EntityType;

/// Read-only access to tenant-scoped business records.
///
/// Implementations must exclude soft-deleted records from both lookups and
/// scans.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Fetch one record by id, or `None` if it does not exist (or is
    /// soft-deleted).
    async fn find_one(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Option<EntityRecord>, EntityRepositoryError>;

    /// Fetch one page of all live records of a type for a tenant.
    ///
    /// Keyset-paginated: pass `None` to start the scan and the returned
    /// `next_cursor` to continue it. A `next_cursor` of `None` terminates the
    /// scan. Reindexing streams pages through this method instead of
    /// materializing a whole tenant in memory.
    async fn find_page(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<EntityPage, EntityRepositoryError>;
}
