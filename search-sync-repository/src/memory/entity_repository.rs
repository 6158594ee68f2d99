//! In-memory implementation of the entity repository boundary.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::EntityRepositoryError;
use crate::interfaces::EntityRepository;
use crate::types::{EntityPage, EntityRecord};
use search_sync_shared::EntityType;

/// In-memory entity repository seeded by tests and local development.
#[derive(Default)]
pub struct InMemoryEntityRepository {
    records: Mutex<HashMap<(String, EntityType), Vec<EntityRecord>>>,
}

impl InMemoryEntityRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one record for a tenant.
    pub fn insert(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
        id: impl Into<String>,
        fields: Value,
    ) {
        let mut records = self.records.lock().unwrap();
        records
            .entry((tenant_id.to_string(), entity_type))
            .or_default()
            .push(EntityRecord::new(id, fields));
    }

    /// Remove one record, simulating a deletion in the business store.
    pub fn remove(&self, tenant_id: &str, entity_type: EntityType, id: &str) {
        let mut records = self.records.lock().unwrap();
        if let Some(list) = records.get_mut(&(tenant_id.to_string(), entity_type)) {
            list.retain(|record| record.id != id);
        }
    }
}

#[async_trait]
impl EntityRepository for InMemoryEntityRepository {
    async fn find_one(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Option<EntityRecord>, EntityRepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .get(&(tenant_id.to_string(), entity_type))
            .and_then(|list| list.iter().find(|record| record.id == entity_id))
            .cloned())
    }

    async fn find_page(
        &self,
        tenant_id: &str,
        entity_type: EntityType,
        cursor: Option<&str>,
        limit: i64,
    ) -> Result<EntityPage, EntityRepositoryError> {
        let records = self.records.lock().unwrap();

        let mut live: Vec<EntityRecord> = records
            .get(&(tenant_id.to_string(), entity_type))
            .cloned()
            .unwrap_or_default();
        live.sort_by(|a, b| a.id.cmp(&b.id));

        let page: Vec<EntityRecord> = live
            .into_iter()
            .filter(|record| match cursor {
                Some(cursor) => record.id.as_str() > cursor,
                None => true,
            })
            .take(limit.max(0) as usize)
            .collect();

        let next_cursor = if page.len() as i64 == limit {
            page.last().map(|record| record.id.clone())
        } else {
            None
        };

        Ok(EntityPage {
            records: page,
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_one_is_tenant_scoped() {
        let repo = InMemoryEntityRepository::new();
        repo.insert("t1", EntityType::Orders, "o1", json!({"orderNumber": "ORD-1"}));

        assert!(repo
            .find_one("t1", EntityType::Orders, "o1")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_one("t2", EntityType::Orders, "o1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_find_page_walks_cursor_to_completion() {
        let repo = InMemoryEntityRepository::new();
        for i in 0..5 {
            repo.insert(
                "t1",
                EntityType::Loads,
                format!("l{}", i),
                json!({"loadNumber": format!("L-{}", i)}),
            );
        }

        let mut seen = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = repo
                .find_page("t1", EntityType::Loads, cursor.as_deref(), 2)
                .await
                .unwrap();
            seen.extend(page.records.iter().map(|r| r.id.clone()));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(seen, vec!["l0", "l1", "l2", "l3", "l4"]);
    }

    #[tokio::test]
    async fn test_removed_record_disappears() {
        let repo = InMemoryEntityRepository::new();
        repo.insert("t1", EntityType::Customers, "c1", json!({"name": "Acme"}));
        repo.remove("t1", EntityType::Customers, "c1");

        assert!(repo
            .find_one("t1", EntityType::Customers, "c1")
            .await
            .unwrap()
            .is_none());
    }
}
