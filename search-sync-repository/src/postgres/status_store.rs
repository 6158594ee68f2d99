//! PostgreSQL implementation of the index status store.
//!
//! One row per `(tenant_id, entity_type)` pair, written with
//! `ON CONFLICT DO UPDATE`. The `document_count` column uses
//! `COALESCE(EXCLUDED.document_count, existing)` so partial updates never
//! destroy a previously known count.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use tracing::debug;

use crate::errors::IndexStatusError;
use crate::interfaces::IndexStatusStore;
use crate::types::StatusUpdate;
use search_sync_shared::{EntityType, IndexHealth, IndexStatusRecord};

/// PostgreSQL implementation of the index status store.
pub struct PostgresIndexStatusStore {
    pool: sqlx::PgPool,
}

impl PostgresIndexStatusStore {
    /// Create a new status store over an existing connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Create the `index_status` table if it doesn't exist.
    ///
    /// Called once during application startup.
    pub async fn ensure_schema(&self) -> Result<(), IndexStatusError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS index_status (
                tenant_id TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                status TEXT NOT NULL,
                last_error TEXT,
                document_count BIGINT,
                last_updated TIMESTAMPTZ NOT NULL,
                PRIMARY KEY (tenant_id, entity_type)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn record_from_row(row: &PgRow) -> Result<IndexStatusRecord, IndexStatusError> {
        let entity_type: String = row.try_get("entity_type")?;
        let status: String = row.try_get("status")?;

        Ok(IndexStatusRecord {
            tenant_id: row.try_get("tenant_id")?,
            entity_type: entity_type
                .parse::<EntityType>()
                .map_err(|e| IndexStatusError::invalid_record(e.to_string()))?,
            status: status
                .parse::<IndexHealth>()
                .map_err(|e| IndexStatusError::invalid_record(e.to_string()))?,
            last_error: row.try_get("last_error")?,
            document_count: row.try_get("document_count")?,
            last_updated: row.try_get("last_updated")?,
        })
    }
}

#[async_trait]
impl IndexStatusStore for PostgresIndexStatusStore {
    async fn set_status(
        &self,
        update: &StatusUpdate,
    ) -> Result<IndexStatusRecord, IndexStatusError> {
        let row = sqlx::query(
            r#"
            INSERT INTO index_status
                (tenant_id, entity_type, status, last_error, document_count, last_updated)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (tenant_id, entity_type)
            DO UPDATE SET
                status = EXCLUDED.status,
                last_error = EXCLUDED.last_error,
                document_count = COALESCE(EXCLUDED.document_count, index_status.document_count),
                last_updated = NOW()
            RETURNING tenant_id, entity_type, status, last_error, document_count, last_updated
            "#,
        )
        .bind(&update.tenant_id)
        .bind(update.entity_type.as_str())
        .bind(update.status.as_str())
        .bind(&update.last_error)
        .bind(update.document_count)
        .fetch_one(&self.pool)
        .await?;

        let record = Self::record_from_row(&row)?;

        debug!(
            tenant_id = %record.tenant_id,
            entity_type = %record.entity_type,
            status = %record.status,
            document_count = ?record.document_count,
            "Updated index status"
        );

        Ok(record)
    }

    async fn get_index_status(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
    ) -> Result<Option<IndexStatusRecord>, IndexStatusError> {
        let row = sqlx::query(
            r#"
            SELECT tenant_id, entity_type, status, last_error, document_count, last_updated
            FROM index_status
            WHERE tenant_id = $1 AND entity_type = $2
            "#,
        )
        .bind(tenant_id)
        .bind(entity_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn list_indexes(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<IndexStatusRecord>, IndexStatusError> {
        let rows = sqlx::query(
            r#"
            SELECT tenant_id, entity_type, status, last_error, document_count, last_updated
            FROM index_status
            WHERE tenant_id = $1
            ORDER BY entity_type ASC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::record_from_row).collect()
    }
}
