//! In-memory implementation of the index queue.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::errors::QueueStoreError;
use crate::interfaces::IndexQueue;
use crate::types::{NewQueueItem, QueueStatusFilter};
use search_sync_shared::IndexQueueItem;

/// Default claim lease, matching the PostgreSQL backend.
const DEFAULT_CLAIM_LEASE_SECS: i64 = 300;

/// In-memory index queue with the same claim, lease, and listing semantics as
/// the PostgreSQL backend.
///
/// All operations run under a single mutex, so claims are atomic relative to
/// each other.
pub struct InMemoryIndexQueue {
    items: Mutex<Vec<IndexQueueItem>>,
    lease: Duration,
}

impl Default for InMemoryIndexQueue {
    fn default() -> Self {
        Self::with_lease(Duration::seconds(DEFAULT_CLAIM_LEASE_SECS))
    }
}

impl InMemoryIndexQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue with a custom claim lease duration.
    pub fn with_lease(lease: Duration) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            lease,
        }
    }

    /// Fetch one item by id, for test assertions.
    pub fn get(&self, id: Uuid) -> Option<IndexQueueItem> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }
}

#[async_trait]
impl IndexQueue for InMemoryIndexQueue {
    async fn enqueue(&self, item: &NewQueueItem) -> Result<IndexQueueItem, QueueStoreError> {
        let created = IndexQueueItem {
            id: Uuid::new_v4(),
            tenant_id: item.tenant_id.clone(),
            entity_type: item.entity_type,
            entity_id: item.entity_id.clone(),
            operation: item.operation,
            priority: item.priority,
            retry_count: 0,
            last_error: None,
            claimed_at: None,
            created_at: Utc::now(),
            processed_at: None,
        };

        self.items.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_queue(
        &self,
        tenant_id: &str,
        filter: Option<QueueStatusFilter>,
        limit: i64,
    ) -> Result<Vec<IndexQueueItem>, QueueStoreError> {
        let items = self.items.lock().unwrap();

        // Items are appended in creation order, so reverse iteration is
        // newest-first.
        let listed = items
            .iter()
            .rev()
            .filter(|item| item.tenant_id == tenant_id)
            .filter(|item| match filter {
                Some(QueueStatusFilter::Pending) => item.is_pending(),
                Some(QueueStatusFilter::Processed) => !item.is_pending(),
                None => true,
            })
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(listed)
    }

    async fn claim_next(
        &self,
        tenant_id: &str,
    ) -> Result<Option<IndexQueueItem>, QueueStoreError> {
        let mut items = self.items.lock().unwrap();
        let now = Utc::now();

        // A live lease hides the item from further claims until it expires or
        // the attempt fails.
        let claimed = items
            .iter_mut()
            .filter(|item| {
                item.tenant_id == tenant_id
                    && item.is_pending()
                    && item.claimed_at.map_or(true, |at| now - at >= self.lease)
            })
            .min_by_key(|item| (item.priority, item.created_at));

        match claimed {
            Some(item) => {
                item.retry_count += 1;
                item.last_error = None;
                item.claimed_at = Some(now);
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    async fn mark_processing(&self, id: Uuid) -> Result<(), QueueStoreError> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(QueueStoreError::ItemNotFound(id))?;

        item.retry_count += 1;
        item.last_error = None;
        item.claimed_at = Some(Utc::now());
        Ok(())
    }

    async fn mark_completed(&self, id: Uuid) -> Result<(), QueueStoreError> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(QueueStoreError::ItemNotFound(id))?;

        item.processed_at = Some(Utc::now());
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), QueueStoreError> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(QueueStoreError::ItemNotFound(id))?;

        item.last_error = Some(error.to_string());
        item.claimed_at = None;
        Ok(())
    }
}
