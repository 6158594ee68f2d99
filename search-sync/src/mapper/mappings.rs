//! Per-entity-type document mappings.
//!
//! Each mapping knows which domain fields become the display `title`, which
//! become filterable facets, and which free-text fields feed the `content`
//! field (first non-empty wins, in priority order).

use serde_json::Value;

use crate::mapper::DocumentMapper;
use search_sync_repository::EntityRecord;
use search_sync_shared::{EntityType, SearchDocument};

/// Read one non-empty string field from a record's field map.
fn text_field(fields: &Value, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First non-empty text field among a prioritized list.
fn first_text(fields: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text_field(fields, key))
}

/// Copy the named fields into the document's facets, skipping absent values.
fn with_facets(mut doc: SearchDocument, fields: &Value, keys: &[&str]) -> SearchDocument {
    for key in keys {
        if let Some(value) = fields.get(*key) {
            doc = doc.facet(*key, value.clone());
        }
    }
    doc
}

/// Attach content when the record has any of the given free-text fields.
fn with_content(doc: SearchDocument, fields: &Value, keys: &[&str]) -> SearchDocument {
    match first_text(fields, keys) {
        Some(content) => doc.content(content),
        None => doc,
    }
}

/// Mapping for customer records.
pub struct CustomerMapper;

impl DocumentMapper for CustomerMapper {
    fn map(&self, record: &EntityRecord) -> SearchDocument {
        let title = first_text(&record.fields, &["name", "companyName"])
            .unwrap_or_else(|| record.id.clone());
        let doc = SearchDocument::new(&record.id, EntityType::Customers, title);
        let doc = with_facets(doc, &record.fields, &["status", "customerType", "city", "state"]);
        with_content(doc, &record.fields, &["notes"])
    }
}

/// Mapping for order records.
pub struct OrderMapper;

impl DocumentMapper for OrderMapper {
    fn map(&self, record: &EntityRecord) -> SearchDocument {
        let title =
            text_field(&record.fields, "orderNumber").unwrap_or_else(|| record.id.clone());
        let doc = SearchDocument::new(&record.id, EntityType::Orders, title);
        let doc = with_facets(
            doc,
            &record.fields,
            &["status", "orderType", "originCity", "destinationCity"],
        );
        with_content(doc, &record.fields, &["specialInstructions", "internalNotes"])
    }
}

/// Mapping for load records.
pub struct LoadMapper;

impl DocumentMapper for LoadMapper {
    fn map(&self, record: &EntityRecord) -> SearchDocument {
        let title = text_field(&record.fields, "loadNumber").unwrap_or_else(|| record.id.clone());
        let doc = SearchDocument::new(&record.id, EntityType::Loads, title);
        let doc = with_facets(
            doc,
            &record.fields,
            &["status", "equipmentType", "originCity", "destinationCity"],
        );
        with_content(doc, &record.fields, &["specialInstructions", "internalNotes"])
    }
}

/// Mapping for carrier records.
pub struct CarrierMapper;

impl DocumentMapper for CarrierMapper {
    fn map(&self, record: &EntityRecord) -> SearchDocument {
        let title = text_field(&record.fields, "name").unwrap_or_else(|| record.id.clone());
        let doc = SearchDocument::new(&record.id, EntityType::Carriers, title);
        let doc = with_facets(
            doc,
            &record.fields,
            &["status", "mcNumber", "dotNumber", "city", "state"],
        );
        with_content(doc, &record.fields, &["notes"])
    }
}

/// Mapping for document-file records.
pub struct DocumentFileMapper;

impl DocumentMapper for DocumentFileMapper {
    fn map(&self, record: &EntityRecord) -> SearchDocument {
        let title = text_field(&record.fields, "fileName").unwrap_or_else(|| record.id.clone());
        let doc = SearchDocument::new(&record.id, EntityType::Documents, title);
        let doc = with_facets(doc, &record.fields, &["documentType", "status"]);
        with_content(doc, &record.fields, &["description", "notes"])
    }
}
