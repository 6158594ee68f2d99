//! Search document types for the search index.
//!
//! This module defines the engine-facing projection of a domain record. The
//! document is constructed on the fly by the mapper and handed to the search
//! index provider; it is never persisted by the pipeline itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::entity_type::EntityType;

/// Document representation for the search index.
///
/// Every document carries `id`, `entity_type`, and a `title` used for generic
/// display. Filterable facets vary per entity type and are serialized inline
/// alongside the fixed fields. `content` holds the free text selected for
/// full-text matching, when the source record has any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchDocument {
    pub id: String,
    pub entity_type: EntityType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Entity-type-specific filterable fields, serialized inline.
    #[serde(flatten)]
    pub facets: Map<String, Value>,
    pub indexed_at: DateTime<Utc>,
}

impl SearchDocument {
    /// Create a new document with no facets or content.
    pub fn new(id: impl Into<String>, entity_type: EntityType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type,
            title: title.into(),
            content: None,
            facets: Map::new(),
            indexed_at: Utc::now(),
        }
    }

    /// Minimal document for entity types with no registered mapping.
    ///
    /// Uses the record id as the title so the document is still displayable.
    pub fn fallback(id: impl Into<String>, entity_type: EntityType) -> Self {
        let id = id.into();
        let title = id.clone();
        Self::new(id, entity_type, title)
    }

    /// Add a facet field, dropping JSON nulls.
    pub fn facet(mut self, key: impl Into<String>, value: Value) -> Self {
        if !value.is_null() {
            self.facets.insert(key.into(), value);
        }
        self
    }

    /// Set the free-text content field.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_facets_serialize_inline() {
        let doc = SearchDocument::new("o1", EntityType::Orders, "ORD-1")
            .facet("status", json!("NEW"))
            .facet("originCity", json!("Dallas"));

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["id"], "o1");
        assert_eq!(value["entity_type"], "orders");
        assert_eq!(value["title"], "ORD-1");
        assert_eq!(value["status"], "NEW");
        assert_eq!(value["originCity"], "Dallas");
    }

    #[test]
    fn test_null_facets_are_dropped() {
        let doc = SearchDocument::new("c1", EntityType::Carriers, "Acme")
            .facet("mcNumber", Value::Null);

        assert!(doc.facets.is_empty());
    }

    #[test]
    fn test_fallback_uses_id_as_title() {
        let doc = SearchDocument::fallback("x9", EntityType::Documents);

        assert_eq!(doc.id, "x9");
        assert_eq!(doc.title, "x9");
        assert!(doc.content.is_none());
        assert!(doc.facets.is_empty());
    }

    #[test]
    fn test_content_is_optional_in_json() {
        let doc = SearchDocument::new("o1", EntityType::Orders, "ORD-1");
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("content").is_none());

        let with_content = doc.content("fragile freight");
        let value = serde_json::to_value(&with_content).unwrap();
        assert_eq!(value["content"], "fragile freight");
    }
}
