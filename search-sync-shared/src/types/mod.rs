//! This module defines the core data structures and types used across the search
//! sync pipeline. It re-exports the queue, status, and document types.

pub mod entity_type;
pub mod operation;
pub mod queue_item;
pub mod search_document;
pub mod status_record;

pub use entity_type::EntityType;
pub use operation::IndexOperation;
pub use queue_item::IndexQueueItem;
pub use search_document::SearchDocument;
pub use status_record::{IndexHealth, IndexStatusRecord};
