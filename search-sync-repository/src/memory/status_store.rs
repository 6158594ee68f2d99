//! In-memory implementation of the index status store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::IndexStatusError;
use crate::interfaces::IndexStatusStore;
use crate::types::StatusUpdate;
use search_sync_shared::{EntityType, IndexStatusRecord};

/// In-memory index status store with the same preserve-count upsert semantics
/// as the PostgreSQL backend.
#[derive(Default)]
pub struct InMemoryIndexStatusStore {
    records: Mutex<HashMap<(String, EntityType), IndexStatusRecord>>,
}

impl InMemoryIndexStatusStore {
    /// Create an empty status store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndexStatusStore for InMemoryIndexStatusStore {
    async fn set_status(
        &self,
        update: &StatusUpdate,
    ) -> Result<IndexStatusRecord, IndexStatusError> {
        let mut records = self.records.lock().unwrap();
        let key = (update.tenant_id.clone(), update.entity_type);

        let record = match records.get(&key) {
            Some(existing) => IndexStatusRecord {
                tenant_id: update.tenant_id.clone(),
                entity_type: update.entity_type,
                status: update.status,
                last_error: update.last_error.clone(),
                // An absent count preserves the previously known value.
                document_count: update.document_count.or(existing.document_count),
                last_updated: Utc::now(),
            },
            None => IndexStatusRecord {
                tenant_id: update.tenant_id.clone(),
                entity_type: update.entity_type,
                status: update.status,
                last_error: update.last_error.clone(),
                document_count: update.document_count,
                last_updated: Utc::now(),
            },
        };

        records.insert(key, record.clone());
        Ok(record)
    }

    async fn get_index_status(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
    ) -> Result<Option<IndexStatusRecord>, IndexStatusError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .get(&(tenant_id.to_string(), entity_type))
            .cloned())
    }

    async fn list_indexes(
        &self,
        tenant_id: &str,
    ) -> Result<Vec<IndexStatusRecord>, IndexStatusError> {
        let records = self.records.lock().unwrap();

        let mut listed: Vec<IndexStatusRecord> = records
            .values()
            .filter(|record| record.tenant_id == tenant_id)
            .cloned()
            .collect();
        listed.sort_by_key(|record| record.entity_type.as_str());

        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_sync_shared::IndexHealth;

    fn update(
        tenant: &str,
        entity_type: EntityType,
        status: IndexHealth,
        count: Option<i64>,
    ) -> StatusUpdate {
        StatusUpdate {
            tenant_id: tenant.to_string(),
            entity_type,
            status,
            last_error: None,
            document_count: count,
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates_single_record() {
        let store = InMemoryIndexStatusStore::new();

        store
            .set_status(&update("t1", EntityType::Orders, IndexHealth::Rebuilding, None))
            .await
            .unwrap();
        store
            .set_status(&update("t1", EntityType::Orders, IndexHealth::Ready, Some(7)))
            .await
            .unwrap();

        let listed = store.list_indexes("t1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, IndexHealth::Ready);
        assert_eq!(listed[0].document_count, Some(7));
    }

    #[tokio::test]
    async fn test_absent_count_preserves_previous_value() {
        let store = InMemoryIndexStatusStore::new();

        store
            .set_status(&update("t1", EntityType::Orders, IndexHealth::Ready, Some(42)))
            .await
            .unwrap();
        let record = store
            .set_status(&update("t1", EntityType::Orders, IndexHealth::Ready, None))
            .await
            .unwrap();

        assert_eq!(record.document_count, Some(42));
    }

    #[tokio::test]
    async fn test_supplied_count_replaces_previous_value() {
        let store = InMemoryIndexStatusStore::new();

        store
            .set_status(&update("t1", EntityType::Orders, IndexHealth::Ready, Some(42)))
            .await
            .unwrap();
        let record = store
            .set_status(&update("t1", EntityType::Orders, IndexHealth::Ready, Some(3)))
            .await
            .unwrap();

        assert_eq!(record.document_count, Some(3));
    }

    #[tokio::test]
    async fn test_listing_is_tenant_scoped() {
        let store = InMemoryIndexStatusStore::new();

        store
            .set_status(&update("t1", EntityType::Orders, IndexHealth::Ready, None))
            .await
            .unwrap();
        store
            .set_status(&update("t2", EntityType::Loads, IndexHealth::Error, None))
            .await
            .unwrap();

        let listed = store.list_indexes("t1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].entity_type, EntityType::Orders);

        assert!(store
            .get_index_status("t1", EntityType::Loads)
            .await
            .unwrap()
            .is_none());
    }
}
