//! Queue item model for pending synchronization work.
//!
//! An [`IndexQueueItem`] is one unit of work: index, delete, or reindex. Items
//! are never removed by the pipeline; completion is recorded by setting
//! `processed_at`, and failures leave the item pending with `last_error` set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::entity_type::EntityType;
use crate::types::operation::IndexOperation;

/// Sentinel entity id used when an operation targets every record of a type.
pub const ALL_ENTITIES: &str = "*";

/// Default priority for producer-enqueued work (lower is more urgent).
pub const DEFAULT_PRIORITY: i32 = 5;

/// Priority tier used for operator-triggered reindexes.
pub const REINDEX_PRIORITY: i32 = 1;

/// A unit of pending synchronization work.
///
/// An item is *pending* iff `processed_at` is `None`. An item with a non-null
/// `last_error` and null `processed_at` is failed-but-still-pending: it stays
/// visible to the processor and to queue-status queries until completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexQueueItem {
    pub id: Uuid,
    pub tenant_id: String,
    pub entity_type: EntityType,
    /// Target record id, or [`ALL_ENTITIES`] for tenant-wide operations.
    pub entity_id: String,
    pub operation: IndexOperation,
    /// Lower values are claimed first.
    pub priority: i32,
    /// Number of processing attempts made so far.
    pub retry_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// When the item was last claimed for processing. A pending item with a
    /// live lease is invisible to further claims until the lease expires or
    /// the attempt fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl IndexQueueItem {
    /// Create a new pending item.
    pub fn new(
        tenant_id: impl Into<String>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        operation: IndexOperation,
        priority: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.into(),
            entity_type,
            entity_id: entity_id.into(),
            operation,
            priority,
            retry_count: 0,
            last_error: None,
            claimed_at: None,
            created_at: Utc::now(),
            processed_at: None,
        }
    }

    /// Create a tenant-wide reindex item at the reindex priority tier.
    pub fn reindex(tenant_id: impl Into<String>, entity_type: EntityType) -> Self {
        Self::new(
            tenant_id,
            entity_type,
            ALL_ENTITIES,
            IndexOperation::Reindex,
            REINDEX_PRIORITY,
        )
    }

    /// Whether the item is still eligible for processing.
    pub fn is_pending(&self) -> bool {
        self.processed_at.is_none()
    }
}
