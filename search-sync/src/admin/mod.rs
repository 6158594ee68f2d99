//! Operator-facing admin surface.
//!
//! Exposes the reindex trigger and read-only introspection over the queue and
//! the status records. All admin calls are tenant-scoped.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::errors::PipelineError;
use search_sync_repository::{
    IndexQueue, IndexStatusStore, NewQueueItem, QueueStatusFilter, StatusUpdate,
};
use search_sync_shared::{
    EntityType, IndexHealth, IndexOperation, IndexQueueItem, IndexStatusRecord, ALL_ENTITIES,
    REINDEX_PRIORITY,
};

/// Acknowledgement that a reindex was accepted.
///
/// The reindex itself runs later, inside the queue processor; this response
/// only confirms that the work is durably enqueued.
#[derive(Debug, Clone, Serialize)]
pub struct ReindexStarted {
    pub started: bool,
    /// The queue item created for the rebuild.
    pub item: IndexQueueItem,
}

/// Admin façade over the queue and the status store.
pub struct SearchAdmin {
    queue: Arc<dyn IndexQueue>,
    status: Arc<dyn IndexStatusStore>,
}

impl SearchAdmin {
    pub fn new(queue: Arc<dyn IndexQueue>, status: Arc<dyn IndexStatusStore>) -> Self {
        Self { queue, status }
    }

    /// Start a full rebuild of one entity type for one tenant.
    ///
    /// Marks the type's status REBUILDING before enqueuing, so an operator
    /// polling the status sees the rebuild immediately rather than after the
    /// queue drains. The item is enqueued at the highest priority tier and
    /// jumps ahead of routine single-document work. Returns without waiting
    /// for the rebuild to run.
    #[instrument(skip(self), fields(tenant_id = %tenant_id, entity_type = %entity_type))]
    pub async fn reindex(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
    ) -> Result<ReindexStarted, PipelineError> {
        self.status
            .set_status(&StatusUpdate {
                tenant_id: tenant_id.to_string(),
                entity_type,
                status: IndexHealth::Rebuilding,
                last_error: None,
                document_count: None,
            })
            .await?;

        let item = self
            .queue
            .enqueue(&NewQueueItem {
                tenant_id: tenant_id.to_string(),
                entity_type,
                entity_id: ALL_ENTITIES.to_string(),
                operation: IndexOperation::Reindex,
                priority: REINDEX_PRIORITY,
            })
            .await?;

        info!(queue_item_id = %item.id, "Reindex enqueued");
        Ok(ReindexStarted {
            started: true,
            item,
        })
    }

    /// Start a rebuild of every entity type for one tenant.
    pub async fn reindex_all(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<ReindexStarted>, PipelineError> {
        let mut started = Vec::with_capacity(EntityType::ALL.len());
        for entity_type in EntityType::ALL {
            started.push(self.reindex(tenant_id, entity_type).await?);
        }
        Ok(started)
    }

    /// List queue items for a tenant, newest first.
    pub async fn queue_status(
        &self,
        tenant_id: &str,
        filter: Option<QueueStatusFilter>,
        limit: i64,
    ) -> Result<Vec<IndexQueueItem>, PipelineError> {
        Ok(self.queue.list_queue(tenant_id, filter, limit).await?)
    }

    /// List all index status records for a tenant.
    pub async fn list_indexes(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<IndexStatusRecord>, PipelineError> {
        Ok(self.status.list_indexes(tenant_id).await?)
    }

    /// Read one `(tenant, entity_type)` status record.
    pub async fn index_status(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
    ) -> Result<Option<IndexStatusRecord>, PipelineError> {
        Ok(self.status.get_index_status(tenant_id, entity_type).await?)
    }
}
