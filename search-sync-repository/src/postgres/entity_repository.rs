//! PostgreSQL implementation of the entity repository boundary.
//!
//! Reads business records from the entity-type tables as JSON projections.
//! Soft-deleted rows (`deleted_at IS NOT NULL`) are excluded everywhere, and
//! scans are keyset-paginated by record id.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::errors::EntityRepositoryError;
use crate::interfaces::EntityRepository;
use crate::types::{EntityPage, EntityRecord};
use search_sync_shared::EntityType;

/// PostgreSQL implementation of the entity repository boundary.
///
/// Each entity type maps to its own table, named by [`EntityType::as_str`].
/// Rows are projected through `to_jsonb` so the pipeline stays agnostic to
/// per-table column shapes; only the document mapper interprets the fields.
pub struct PostgresEntityRepository {
    pool: sqlx::PgPool,
}

impl PostgresEntityRepository {
    /// Create a new entity repository over an existing connection pool.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    fn record_from_row(row: &PgRow) -> Result<EntityRecord, EntityRepositoryError> {
        Ok(EntityRecord {
            id: row.try_get("id")?,
            fields: row.try_get("fields")?,
        })
    }
}

#[async_trait]
impl EntityRepository for PostgresEntityRepository {
    async fn find_one(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Option<EntityRecord>, EntityRepositoryError> {
        // Table names come from the closed EntityType enum, never from input.
        let sql = format!(
            "SELECT t.id::text AS id, to_jsonb(t.*) AS fields \
             FROM {table} t \
             WHERE t.tenant_id = $1 AND t.id::text = $2 AND t.deleted_at IS NULL",
            table = entity_type.as_str()
        );

        let row = sqlx::query(&sql)
            .bind(tenant_id)
            .bind(entity_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn find_page(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<EntityPage, EntityRepositoryError> {
        let sql = format!(
            "SELECT t.id::text AS id, to_jsonb(t.*) AS fields \
             FROM {table} t \
             WHERE t.tenant_id = $1 AND t.deleted_at IS NULL \
               AND ($2::text IS NULL OR t.id::text > $2) \
             ORDER BY t.id::text ASC \
             LIMIT $3",
            table = entity_type.as_str()
        );

        let rows = sqlx::query(&sql)
            .bind(tenant_id)
            .bind(cursor)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let records: Vec<EntityRecord> = rows
            .iter()
            .map(Self::record_from_row)
            .collect::<Result<_, _>>()?;

        // A full page means the scan may continue from the last id seen.
        let next_cursor = if records.len() as i64 == limit {
            records.last().map(|r| r.id.clone())
        } else {
            None
        };

        Ok(EntityPage {
            records,
            next_cursor,
        })
    }
}
