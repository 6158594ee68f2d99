//! Queue processor for the search sync pipeline.
//!
//! Turns one pending queue item into zero-or-more search engine writes and one
//! status update. Each item is processed in isolation: one item's failure
//! never blocks or corrupts others.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::errors::PipelineError;
use crate::mapper::MapperRegistry;
use search_sync_repository::{
    DeleteDocumentRequest, EntityRepository, EntityRepositoryError, IndexDocumentRequest,
    IndexQueue, IndexStatusStore, SearchIndexError, SearchIndexProvider, StatusUpdate,
};
use search_sync_shared::{IndexHealth, IndexOperation, IndexQueueItem};

/// Configuration for the queue processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Page size for the cursor-driven reindex scan.
    pub reindex_page_size: i64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            reindex_page_size: 500,
        }
    }
}

/// Result of one processing step.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    /// Whether an item was claimed and attempted.
    pub processed: bool,
    /// Number of documents written by a reindex, when one completed.
    pub indexed: Option<usize>,
    /// Failure message when the attempt failed; the item stays pending.
    pub error: Option<String>,
}

impl ProcessOutcome {
    /// The queue had no pending work.
    pub fn idle() -> Self {
        Self {
            processed: false,
            indexed: None,
            error: None,
        }
    }

    /// An item completed successfully.
    pub fn completed(indexed: Option<usize>) -> Self {
        Self {
            processed: true,
            indexed,
            error: None,
        }
    }

    /// An item was attempted and failed; it remains pending.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            processed: true,
            indexed: None,
            error: Some(error.into()),
        }
    }
}

/// Domain failures from executing one item.
///
/// These are recorded on the queue item and reported through the outcome;
/// they never escape `process_next`.
#[derive(Debug, Error)]
enum TaskError {
    #[error("Entity not found")]
    EntityNotFound,

    #[error("{0}")]
    Search(#[from] SearchIndexError),

    #[error("{0}")]
    Entities(#[from] EntityRepositoryError),
}

/// The queue processing step.
///
/// Invoked as discrete, synchronous steps by an external driver (worker loop,
/// cron, manual trigger). Carries no scheduling, backoff, or retry policy of
/// its own; failed items simply stay pending and are claimed again on a later
/// step.
pub struct QueueProcessor {
    queue: Arc<dyn IndexQueue>,
    status: Arc<dyn IndexStatusStore>,
    entities: Arc<dyn EntityRepository>,
    search: Arc<dyn SearchIndexProvider>,
    mappers: MapperRegistry,
    config: ProcessorConfig,
}

impl QueueProcessor {
    /// Create a processor with the default configuration.
    pub fn new(
        queue: Arc<dyn IndexQueue>,
        status: Arc<dyn IndexStatusStore>,
        entities: Arc<dyn EntityRepository>,
        search: Arc<dyn SearchIndexProvider>,
        mappers: MapperRegistry,
    ) -> Self {
        Self::with_config(
            queue,
            status,
            entities,
            search,
            mappers,
            ProcessorConfig::default(),
        )
    }

    /// Create a processor with custom configuration.
    pub fn with_config(
        queue: Arc<dyn IndexQueue>,
        status: Arc<dyn IndexStatusStore>,
        entities: Arc<dyn EntityRepository>,
        search: Arc<dyn SearchIndexProvider>,
        mappers: MapperRegistry,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            queue,
            status,
            entities,
            search,
            mappers,
            config,
        }
    }

    /// Claim and execute the next pending item for a tenant.
    ///
    /// Returns `ProcessOutcome::idle()` when the tenant has no pending work.
    /// Domain failures (search engine, entity repository, missing records) are
    /// recorded on the item via `mark_failed` and reported in the outcome; the
    /// item stays pending for a later attempt. Only a queue/status store
    /// failure surfaces as `Err`.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn process_next(&self, tenant_id: &str) -> Result<ProcessOutcome, PipelineError> {
        // claim_next takes the processing lease and increments retry_count
        // atomically, so a crash mid-attempt is visible as
        // attempted-but-not-completed and the item stays hidden from other
        // workers until the lease expires.
        let Some(item) = self.queue.claim_next(tenant_id).await? else {
            debug!("No pending work");
            return Ok(ProcessOutcome::idle());
        };

        debug!(
            queue_item_id = %item.id,
            operation = %item.operation,
            entity_type = %item.entity_type,
            entity_id = %item.entity_id,
            retry_count = item.retry_count,
            "Processing queue item"
        );

        match self.execute(&item).await {
            Ok(indexed) => {
                self.queue.mark_completed(item.id).await?;

                // DELETE leaves the status record untouched; the aggregate
                // count is unknown after a single removal.
                match item.operation {
                    IndexOperation::Reindex => {
                        self.status
                            .set_status(&StatusUpdate {
                                tenant_id: item.tenant_id.clone(),
                                entity_type: item.entity_type,
                                status: IndexHealth::Ready,
                                last_error: None,
                                document_count: indexed.map(|n| n as i64),
                            })
                            .await?;
                    }
                    IndexOperation::Index => {
                        self.status
                            .set_status(&StatusUpdate {
                                tenant_id: item.tenant_id.clone(),
                                entity_type: item.entity_type,
                                status: IndexHealth::Ready,
                                last_error: None,
                                document_count: None,
                            })
                            .await?;
                    }
                    IndexOperation::Delete => {}
                }

                info!(
                    queue_item_id = %item.id,
                    operation = %item.operation,
                    indexed = ?indexed,
                    "Queue item completed"
                );
                Ok(ProcessOutcome::completed(indexed))
            }
            Err(task_error) => {
                let message = task_error.to_string();
                warn!(
                    queue_item_id = %item.id,
                    operation = %item.operation,
                    error = %message,
                    "Queue item failed; leaving it pending"
                );
                self.queue.mark_failed(item.id, &message).await?;
                Ok(ProcessOutcome::failed(message))
            }
        }
    }

    /// Execute one claimed item against the external collaborators.
    ///
    /// Returns the number of documents written for REINDEX, `None` otherwise.
    async fn execute(&self, item: &IndexQueueItem) -> Result<Option<usize>, TaskError> {
        match item.operation {
            IndexOperation::Delete => {
                self.search
                    .delete_document(&DeleteDocumentRequest {
                        tenant_id: item.tenant_id.clone(),
                        entity_type: item.entity_type,
                        entity_id: item.entity_id.clone(),
                    })
                    .await?;
                Ok(None)
            }
            IndexOperation::Index => {
                let record = self
                    .entities
                    .find_one(&item.tenant_id, item.entity_type, &item.entity_id)
                    .await?
                    .ok_or(TaskError::EntityNotFound)?;

                let document = self.mappers.map(item.entity_type, &record);
                self.search
                    .index_document(&IndexDocumentRequest {
                        tenant_id: item.tenant_id.clone(),
                        entity_type: item.entity_type,
                        entity_id: item.entity_id.clone(),
                        document,
                    })
                    .await?;
                Ok(None)
            }
            IndexOperation::Reindex => {
                // All-or-nothing: any failure aborts the whole item and no
                // partial count is ever persisted, keeping document_count
                // meaningful.
                let mut indexed = 0usize;
                let mut cursor: Option<String> = None;

                loop {
                    let page = self
                        .entities
                        .find_page(
                            &item.tenant_id,
                            item.entity_type,
                            cursor.as_deref(),
                            self.config.reindex_page_size,
                        )
                        .await?;

                    for record in &page.records {
                        let document = self.mappers.map(item.entity_type, record);
                        self.search
                            .index_document(&IndexDocumentRequest {
                                tenant_id: item.tenant_id.clone(),
                                entity_type: item.entity_type,
                                entity_id: record.id.clone(),
                                document,
                            })
                            .await?;
                        indexed += 1;
                    }

                    match page.next_cursor {
                        Some(next) => cursor = Some(next),
                        None => break,
                    }
                }

                Ok(Some(indexed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_sync_repository::memory::{
        InMemoryEntityRepository, InMemoryIndexQueue, InMemoryIndexStatusStore,
        RecordingSearchProvider,
    };
    use search_sync_repository::{NewQueueItem, QueueStatusFilter};
    use search_sync_shared::{EntityType, DEFAULT_PRIORITY};
    use serde_json::json;

    struct Fixture {
        queue: Arc<InMemoryIndexQueue>,
        status: Arc<InMemoryIndexStatusStore>,
        entities: Arc<InMemoryEntityRepository>,
        search: Arc<RecordingSearchProvider>,
        processor: QueueProcessor,
    }

    fn fixture() -> Fixture {
        fixture_with_page_size(ProcessorConfig::default().reindex_page_size)
    }

    fn fixture_with_page_size(reindex_page_size: i64) -> Fixture {
        let queue = Arc::new(InMemoryIndexQueue::new());
        let status = Arc::new(InMemoryIndexStatusStore::new());
        let entities = Arc::new(InMemoryEntityRepository::new());
        let search = Arc::new(RecordingSearchProvider::new());

        let processor = QueueProcessor::with_config(
            queue.clone(),
            status.clone(),
            entities.clone(),
            search.clone(),
            MapperRegistry::with_defaults(),
            ProcessorConfig { reindex_page_size },
        );

        Fixture {
            queue,
            status,
            entities,
            search,
            processor,
        }
    }

    fn enqueue_request(
        tenant: &str,
        entity_type: EntityType,
        entity_id: &str,
        operation: IndexOperation,
    ) -> NewQueueItem {
        NewQueueItem {
            tenant_id: tenant.to_string(),
            entity_type,
            entity_id: entity_id.to_string(),
            operation,
            priority: DEFAULT_PRIORITY,
        }
    }

    #[tokio::test]
    async fn test_empty_queue_is_a_no_op() {
        let f = fixture();

        let outcome = f.processor.process_next("t1").await.unwrap();

        assert_eq!(outcome, ProcessOutcome::idle());
        assert!(f.status.list_indexes("t1").await.unwrap().is_empty());
        assert_eq!(f.search.indexed_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_calls_engine_once_and_completes() {
        let f = fixture();
        let item = f
            .queue
            .enqueue(&enqueue_request(
                "t1",
                EntityType::Orders,
                "o1",
                IndexOperation::Delete,
            ))
            .await
            .unwrap();

        let outcome = f.processor.process_next("t1").await.unwrap();

        assert_eq!(outcome, ProcessOutcome::completed(None));
        let deleted = f.search.deleted();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].entity_type, EntityType::Orders);
        assert_eq!(deleted[0].entity_id, "o1");
        assert!(!f.queue.get(item.id).unwrap().is_pending());
        // A single delete doesn't know the aggregate count; status untouched.
        assert!(f.status.list_indexes("t1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_missing_entity_is_a_permanent_failure() {
        let f = fixture();
        let item = f
            .queue
            .enqueue(&enqueue_request(
                "t1",
                EntityType::Orders,
                "ghost",
                IndexOperation::Index,
            ))
            .await
            .unwrap();

        let outcome = f.processor.process_next("t1").await.unwrap();

        assert!(outcome.processed);
        assert_eq!(outcome.error.as_deref(), Some("Entity not found"));
        assert_eq!(f.search.indexed_count(), 0);

        let stored = f.queue.get(item.id).unwrap();
        assert!(stored.is_pending());
        assert_eq!(stored.last_error.as_deref(), Some("Entity not found"));
        assert!(f.status.list_indexes("t1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_index_scenario_orders_ord1() {
        let f = fixture();
        f.entities.insert(
            "t1",
            EntityType::Orders,
            "o1",
            json!({"id": "o1", "orderNumber": "ORD-1", "status": "NEW"}),
        );
        f.queue
            .enqueue(&enqueue_request(
                "t1",
                EntityType::Orders,
                "o1",
                IndexOperation::Index,
            ))
            .await
            .unwrap();

        let outcome = f.processor.process_next("t1").await.unwrap();

        assert_eq!(outcome, ProcessOutcome::completed(None));
        let indexed = f.search.indexed();
        assert_eq!(indexed.len(), 1);
        assert_eq!(indexed[0].entity_type, EntityType::Orders);
        assert_eq!(indexed[0].entity_id, "o1");
        assert_eq!(indexed[0].document.id, "o1");
        assert_eq!(indexed[0].document.title, "ORD-1");
        assert_eq!(indexed[0].document.facets["status"], "NEW");

        let record = f
            .status
            .get_index_status("t1", EntityType::Orders)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, IndexHealth::Ready);
        assert!(record.document_count.is_none());
    }

    #[tokio::test]
    async fn test_reindex_indexes_every_live_record() {
        let f = fixture_with_page_size(2);
        for i in 0..5 {
            f.entities.insert(
                "t1",
                EntityType::Carriers,
                format!("c{}", i),
                json!({"name": format!("Carrier {}", i), "status": "ACTIVE"}),
            );
        }
        f.queue
            .enqueue(&NewQueueItem {
                tenant_id: "t1".to_string(),
                entity_type: EntityType::Carriers,
                entity_id: search_sync_shared::ALL_ENTITIES.to_string(),
                operation: IndexOperation::Reindex,
                priority: search_sync_shared::REINDEX_PRIORITY,
            })
            .await
            .unwrap();

        let outcome = f.processor.process_next("t1").await.unwrap();

        assert_eq!(outcome, ProcessOutcome::completed(Some(5)));
        assert_eq!(f.search.indexed_count(), 5);

        let record = f
            .status
            .get_index_status("t1", EntityType::Carriers)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, IndexHealth::Ready);
        assert_eq!(record.document_count, Some(5));
    }

    #[tokio::test]
    async fn test_failed_reindex_persists_no_partial_count() {
        let f = fixture();
        f.entities.insert(
            "t1",
            EntityType::Orders,
            "o1",
            json!({"orderNumber": "ORD-1"}),
        );
        f.queue
            .enqueue(&NewQueueItem {
                tenant_id: "t1".to_string(),
                entity_type: EntityType::Orders,
                entity_id: search_sync_shared::ALL_ENTITIES.to_string(),
                operation: IndexOperation::Reindex,
                priority: search_sync_shared::REINDEX_PRIORITY,
            })
            .await
            .unwrap();
        f.search.fail_with("engine unavailable");

        let outcome = f.processor.process_next("t1").await.unwrap();

        assert!(outcome.processed);
        assert_eq!(outcome.error.as_deref(), Some("Index error: engine unavailable"));
        assert!(f.status.list_indexes("t1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transient_failure_then_retry_succeeds() {
        let f = fixture();
        f.entities.insert(
            "t1",
            EntityType::Orders,
            "o1",
            json!({"orderNumber": "ORD-1"}),
        );
        let item = f
            .queue
            .enqueue(&enqueue_request(
                "t1",
                EntityType::Orders,
                "o1",
                IndexOperation::Index,
            ))
            .await
            .unwrap();

        f.search.fail_with("engine unavailable");
        let first = f.processor.process_next("t1").await.unwrap();
        assert!(first.error.is_some());
        assert!(f.queue.get(item.id).unwrap().is_pending());

        f.search.recover();
        let second = f.processor.process_next("t1").await.unwrap();
        assert_eq!(second, ProcessOutcome::completed(None));

        let stored = f.queue.get(item.id).unwrap();
        assert!(!stored.is_pending());
        assert_eq!(stored.retry_count, 2);
        assert!(stored.last_error.is_none());
    }

    #[tokio::test]
    async fn test_round_trip_surfaces_processed_item() {
        let f = fixture();
        f.entities.insert(
            "t1",
            EntityType::Orders,
            "o1",
            json!({"orderNumber": "ORD-1"}),
        );
        let item = f
            .queue
            .enqueue(&enqueue_request(
                "t1",
                EntityType::Orders,
                "o1",
                IndexOperation::Index,
            ))
            .await
            .unwrap();

        f.processor.process_next("t1").await.unwrap();

        let processed = f
            .queue
            .list_queue("t1", Some(QueueStatusFilter::Processed), 10)
            .await
            .unwrap();
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].id, item.id);
        assert!(processed[0].processed_at.is_some());
        assert_eq!(processed[0].retry_count, 1);
    }

    #[tokio::test]
    async fn test_second_call_after_completion_is_idle() {
        let f = fixture();
        f.entities.insert(
            "t1",
            EntityType::Orders,
            "o1",
            json!({"orderNumber": "ORD-1"}),
        );
        f.queue
            .enqueue(&enqueue_request(
                "t1",
                EntityType::Orders,
                "o1",
                IndexOperation::Index,
            ))
            .await
            .unwrap();

        f.processor.process_next("t1").await.unwrap();

        assert_eq!(
            f.processor.process_next("t1").await.unwrap(),
            ProcessOutcome::idle()
        );
        assert_eq!(
            f.processor.process_next("t1").await.unwrap(),
            ProcessOutcome::idle()
        );
        assert_eq!(f.search.indexed_count(), 1);
    }

    #[tokio::test]
    async fn test_single_index_preserves_reindex_count() {
        let f = fixture();
        for i in 0..3 {
            f.entities.insert(
                "t1",
                EntityType::Orders,
                format!("o{}", i),
                json!({"orderNumber": format!("ORD-{}", i)}),
            );
        }
        f.queue
            .enqueue(&NewQueueItem {
                tenant_id: "t1".to_string(),
                entity_type: EntityType::Orders,
                entity_id: search_sync_shared::ALL_ENTITIES.to_string(),
                operation: IndexOperation::Reindex,
                priority: search_sync_shared::REINDEX_PRIORITY,
            })
            .await
            .unwrap();
        f.processor.process_next("t1").await.unwrap();

        f.queue
            .enqueue(&enqueue_request(
                "t1",
                EntityType::Orders,
                "o1",
                IndexOperation::Index,
            ))
            .await
            .unwrap();
        f.processor.process_next("t1").await.unwrap();

        let record = f
            .status
            .get_index_status("t1", EntityType::Orders)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, IndexHealth::Ready);
        // The single-document INDEX must not destroy the reindex count.
        assert_eq!(record.document_count, Some(3));
    }
}
