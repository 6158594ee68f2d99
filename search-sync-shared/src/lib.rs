//! # Search Sync Shared
//!
//! This crate defines shared data structures and types used across the search sync
//! pipeline. It includes the queue item and status record models, the entity type
//! taxonomy, and the search document projection handed to the search engine.

pub mod types;

pub use types::entity_type::EntityType;
pub use types::operation::IndexOperation;
pub use types::queue_item::{IndexQueueItem, ALL_ENTITIES, DEFAULT_PRIORITY, REINDEX_PRIORITY};
pub use types::search_document::SearchDocument;
pub use types::status_record::{IndexHealth, IndexStatusRecord};
