//! Index queue trait definition.
//!
//! The queue is a durable, tenant-scoped, priority-ordered backlog of pending
//! synchronization work. It holds no knowledge of what a document looks like.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::QueueStoreError;
use crate::types::{NewQueueItem, QueueStatusFilter};
use search_sync_shared::IndexQueueItem;

/// Durable store of pending synchronization work.
///
/// No operation ever removes an item or resets `retry_count`: completion is
/// recorded through `processed_at`, and failed items stay pending until they
/// are completed or purged by an external retention policy.
#[async_trait]
pub trait IndexQueue: Send + Sync {
    /// Create a new pending item with `retry_count = 0` and no `processed_at`.
    ///
    /// There is no deduplication: enqueuing the same target twice creates two
    /// independent items. Delivery is at-least-once by design; downstream
    /// indexing is an idempotent full-document overwrite.
    async fn enqueue(&self, item: &NewQueueItem) -> Result<IndexQueueItem, QueueStoreError>;

    /// List items for a tenant, newest first.
    ///
    /// `filter` of `Pending` restricts to items with `processed_at IS NULL`,
    /// `Processed` to the complement; `None` returns both. Used purely for
    /// observability.
    async fn list_queue(
        &self,
        tenant_id: &str,
        filter: Option<QueueStatusFilter>,
        limit: i64,
    ) -> Result<Vec<IndexQueueItem>, QueueStoreError>;

    /// Atomically claim and lease the next pending item for a tenant.
    ///
    /// Selects the highest-priority, oldest claimable item (`priority ASC,
    /// created_at ASC`) and, in the same operation, increments `retry_count`,
    /// clears `last_error`, and sets `claimed_at`. An item with a live lease
    /// is invisible to further claims until the lease expires, the attempt
    /// fails, or the item completes, so two callers never process the same
    /// item concurrently. Returns `None` when the tenant has no claimable
    /// work.
    async fn claim_next(&self, tenant_id: &str)
        -> Result<Option<IndexQueueItem>, QueueStoreError>;

    /// Record the start of a processing attempt.
    ///
    /// Increments `retry_count`, clears `last_error`, and takes the
    /// processing lease, so a crash mid-attempt is visible as "attempted but
    /// not completed". [`IndexQueue::claim_next`] applies these semantics
    /// atomically; this method exists for drivers that do their own item
    /// selection.
    async fn mark_processing(&self, id: Uuid) -> Result<(), QueueStoreError>;

    /// Record successful completion by setting `processed_at`.
    async fn mark_completed(&self, id: Uuid) -> Result<(), QueueStoreError>;

    /// Record a failed attempt.
    ///
    /// Sets `last_error`, releases the lease, and leaves `processed_at` null
    /// so the item is immediately eligible for a future attempt.
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), QueueStoreError>;
}
