//! PostgreSQL implementation of the index queue.
//!
//! Backs the queue with a single `index_queue` table. The claim operation is
//! a single `UPDATE ... WHERE id = (SELECT ... FOR UPDATE SKIP LOCKED)` that
//! also takes a `claimed_at` lease, so two workers can never claim the same
//! item and a claimed item stays invisible until it completes, fails, or its
//! lease expires.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

use crate::errors::QueueStoreError;
use crate::interfaces::IndexQueue;
use crate::types::{NewQueueItem, QueueStatusFilter};
use search_sync_shared::{EntityType, IndexOperation, IndexQueueItem};

const ITEM_COLUMNS: &str = "id, tenant_id, entity_type, entity_id, operation, priority, \
     retry_count, last_error, claimed_at, created_at, processed_at";

/// How long a claim lease holds before the item becomes claimable again.
///
/// Covers a worker that crashed between claiming and marking the outcome; a
/// clean failure releases the lease immediately via `mark_failed`.
const DEFAULT_CLAIM_LEASE_SECS: i64 = 300;

/// PostgreSQL implementation of the index queue.
pub struct PostgresIndexQueue {
    pool: sqlx::PgPool,
    claim_lease_secs: i64,
}

impl PostgresIndexQueue {
    /// Create a new queue store over an existing connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self::with_lease(pool, DEFAULT_CLAIM_LEASE_SECS)
    }

    /// Create a queue store with a custom claim lease duration.
    pub fn with_lease(pool: sqlx::PgPool, claim_lease_secs: i64) -> Self {
        Self {
            pool,
            claim_lease_secs,
        }
    }

    /// Create the `index_queue` table and its claim index if they don't exist.
    ///
    /// Called once during application startup.
    pub async fn ensure_schema(&self) -> Result<(), QueueStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS index_queue (
                id UUID PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                entity_id TEXT NOT NULL,
                operation TEXT NOT NULL,
                priority INTEGER NOT NULL,
                retry_count INTEGER NOT NULL DEFAULT 0,
                last_error TEXT,
                claimed_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL,
                processed_at TIMESTAMPTZ
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS index_queue_pending_idx
            ON index_queue (tenant_id, priority, created_at)
            WHERE processed_at IS NULL
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn item_from_row(row: &PgRow) -> Result<IndexQueueItem, QueueStoreError> {
        let entity_type: String = row.try_get("entity_type")?;
        let operation: String = row.try_get("operation")?;

        Ok(IndexQueueItem {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            entity_type: entity_type
                .parse::<EntityType>()
                .map_err(|e| QueueStoreError::invalid_item(e.to_string()))?,
            entity_id: row.try_get("entity_id")?,
            operation: operation
                .parse::<IndexOperation>()
                .map_err(|e| QueueStoreError::invalid_item(e.to_string()))?,
            priority: row.try_get("priority")?,
            retry_count: row.try_get("retry_count")?,
            last_error: row.try_get("last_error")?,
            claimed_at: row.try_get("claimed_at")?,
            created_at: row.try_get("created_at")?,
            processed_at: row.try_get("processed_at")?,
        })
    }
}

#[async_trait]
impl IndexQueue for PostgresIndexQueue {
    async fn enqueue(&self, item: &NewQueueItem) -> Result<IndexQueueItem, QueueStoreError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO index_queue
                (id, tenant_id, entity_type, entity_id, operation, priority, retry_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
            "#,
        )
        .bind(id)
        .bind(&item.tenant_id)
        .bind(item.entity_type.as_str())
        .bind(&item.entity_id)
        .bind(item.operation.as_str())
        .bind(item.priority)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        debug!(
            queue_item_id = %id,
            tenant_id = %item.tenant_id,
            entity_type = %item.entity_type,
            operation = %item.operation,
            "Enqueued item"
        );

        Ok(IndexQueueItem {
            id,
            tenant_id: item.tenant_id.clone(),
            entity_type: item.entity_type,
            entity_id: item.entity_id.clone(),
            operation: item.operation,
            priority: item.priority,
            retry_count: 0,
            last_error: None,
            claimed_at: None,
            created_at,
            processed_at: None,
        })
    }

    async fn list_queue(
        &self,
        tenant_id: &str,
        filter: Option<QueueStatusFilter>,
        limit: i64,
    ) -> Result<Vec<IndexQueueItem>, QueueStoreError> {
        let sql = match filter {
            Some(QueueStatusFilter::Pending) => format!(
                "SELECT {ITEM_COLUMNS} FROM index_queue \
                 WHERE tenant_id = $1 AND processed_at IS NULL \
                 ORDER BY created_at DESC LIMIT $2"
            ),
            Some(QueueStatusFilter::Processed) => format!(
                "SELECT {ITEM_COLUMNS} FROM index_queue \
                 WHERE tenant_id = $1 AND processed_at IS NOT NULL \
                 ORDER BY created_at DESC LIMIT $2"
            ),
            None => format!(
                "SELECT {ITEM_COLUMNS} FROM index_queue \
                 WHERE tenant_id = $1 \
                 ORDER BY created_at DESC LIMIT $2"
            ),
        };

        let rows = sqlx::query(&sql)
            .bind(tenant_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::item_from_row).collect()
    }

    async fn claim_next(
        &self,
        tenant_id: &str,
    ) -> Result<Option<IndexQueueItem>, QueueStoreError> {
        // The inner SELECT and the UPDATE run as one statement; SKIP LOCKED
        // makes concurrent claimers pick disjoint rows, and the lease taken
        // here keeps the item invisible to later claims while it is being
        // processed.
        let sql = format!(
            r#"
            UPDATE index_queue
            SET retry_count = retry_count + 1, last_error = NULL, claimed_at = NOW()
            WHERE id = (
                SELECT id FROM index_queue
                WHERE tenant_id = $1 AND processed_at IS NULL
                  AND (claimed_at IS NULL
                       OR claimed_at < NOW() - ($2::bigint * INTERVAL '1 second'))
                ORDER BY priority ASC, created_at ASC
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {ITEM_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(tenant_id)
            .bind(self.claim_lease_secs)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let item = Self::item_from_row(&row)?;
                debug!(
                    queue_item_id = %item.id,
                    tenant_id = %tenant_id,
                    retry_count = item.retry_count,
                    "Claimed queue item"
                );
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    async fn mark_processing(&self, id: Uuid) -> Result<(), QueueStoreError> {
        let result = sqlx::query(
            "UPDATE index_queue \
             SET retry_count = retry_count + 1, last_error = NULL, claimed_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(QueueStoreError::ItemNotFound(id));
        }
        Ok(())
    }

    async fn mark_completed(&self, id: Uuid) -> Result<(), QueueStoreError> {
        let result = sqlx::query("UPDATE index_queue SET processed_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(QueueStoreError::ItemNotFound(id));
        }
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), QueueStoreError> {
        let result =
            sqlx::query("UPDATE index_queue SET last_error = $2, claimed_at = NULL WHERE id = $1")
            .bind(id)
            .bind(error)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(QueueStoreError::ItemNotFound(id));
        }
        Ok(())
    }
}
