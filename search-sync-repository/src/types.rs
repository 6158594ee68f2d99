//! Request and response types for the repository interfaces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use search_sync_shared::{EntityType, IndexOperation, SearchDocument};

/// Request to create a new queue item.
///
/// The store assigns the id and timestamps; `retry_count` starts at 0 and
/// `processed_at` is null. Enqueuing the same `(entity_type, entity_id)` twice
/// creates two independent items: delivery is at-least-once and indexing is an
/// idempotent full-document overwrite.
#[derive(Debug, Clone)]
pub struct NewQueueItem {
    pub tenant_id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub operation: IndexOperation,
    /// Lower values are claimed first.
    pub priority: i32,
}

/// Observability filter for queue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatusFilter {
    /// Items with `processed_at IS NULL`.
    Pending,
    /// Items with `processed_at IS NOT NULL`.
    Processed,
}

impl QueueStatusFilter {
    /// The canonical string tag for this filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatusFilter::Pending => "pending",
            QueueStatusFilter::Processed => "processed",
        }
    }
}

impl fmt::Display for QueueStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(QueueStatusFilter::Pending),
            "processed" => Ok(QueueStatusFilter::Processed),
            other => Err(format!("unknown queue status filter: {}", other)),
        }
    }
}

/// Request to upsert one `(tenant_id, entity_type)` status record.
///
/// `document_count` of `None` means "no new count": the store must preserve
/// any previously known count. A supplied count replaces the stored one.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub tenant_id: String,
    pub entity_type: EntityType,
    pub status: search_sync_shared::IndexHealth,
    pub last_error: Option<String>,
    pub document_count: Option<i64>,
}

/// A business record as read from the relational store.
///
/// The field shape is entity-type-specific and is consumed only by the
/// document mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub id: String,
    pub fields: Value,
}

impl EntityRecord {
    /// Create a record from an id and its JSON field map.
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// One page of a keyset-paginated entity scan.
///
/// `next_cursor` of `None` means the scan is complete.
#[derive(Debug, Clone)]
pub struct EntityPage {
    pub records: Vec<EntityRecord>,
    pub next_cursor: Option<String>,
}

/// Request to index (overwrite) one document.
#[derive(Debug, Clone)]
pub struct IndexDocumentRequest {
    pub tenant_id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub document: SearchDocument,
}

/// Request to delete one document from the search index.
#[derive(Debug, Clone)]
pub struct DeleteDocumentRequest {
    pub tenant_id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_round_trip() {
        for filter in [QueueStatusFilter::Pending, QueueStatusFilter::Processed] {
            let parsed: QueueStatusFilter = filter.as_str().parse().unwrap();
            assert_eq!(parsed, filter);
        }
    }

    #[test]
    fn test_filter_unknown_tag() {
        assert!("failed".parse::<QueueStatusFilter>().is_err());
    }
}
