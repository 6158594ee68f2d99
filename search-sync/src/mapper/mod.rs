//! Document mapper for the search sync pipeline.
//!
//! Translates domain records into search documents, one mapping per entity
//! type. Mappings are registered in a table so adding an entity type is a
//! local, additive change; unregistered types fall back to a minimal document.

mod mappings;

use std::collections::HashMap;

pub use mappings::{
    CarrierMapper, CustomerMapper, DocumentFileMapper, LoadMapper, OrderMapper,
};

use search_sync_repository::EntityRecord;
use search_sync_shared::{EntityType, SearchDocument};

/// Pure translation from one domain record to its search document.
///
/// Implementations must be side-effect free: the same record always maps to
/// the same document (modulo the indexing timestamp).
pub trait DocumentMapper: Send + Sync {
    fn map(&self, record: &EntityRecord) -> SearchDocument;
}

/// Registry of document mappers keyed by entity type.
pub struct MapperRegistry {
    mappers: HashMap<EntityType, Box<dyn DocumentMapper>>,
}

impl MapperRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            mappers: HashMap::new(),
        }
    }

    /// Create a registry with all supported entity types registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(EntityType::Customers, Box::new(CustomerMapper));
        registry.register(EntityType::Orders, Box::new(OrderMapper));
        registry.register(EntityType::Loads, Box::new(LoadMapper));
        registry.register(EntityType::Carriers, Box::new(CarrierMapper));
        registry.register(EntityType::Documents, Box::new(DocumentFileMapper));
        registry
    }

    /// Register (or replace) the mapper for one entity type.
    pub fn register(&mut self, entity_type: EntityType, mapper: Box<dyn DocumentMapper>) {
        self.mappers.insert(entity_type, mapper);
    }

    /// Map a record, falling back to a minimal `{id, entity_type, title: id}`
    /// document when no mapper is registered for the type.
    pub fn map(&self, entity_type: EntityType, record: &EntityRecord) -> SearchDocument {
        match self.mappers.get(&entity_type) {
            Some(mapper) => mapper.map(record),
            None => SearchDocument::fallback(&record.id, entity_type),
        }
    }
}

impl Default for MapperRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_cover_every_entity_type() {
        let registry = MapperRegistry::with_defaults();
        for entity_type in EntityType::ALL {
            assert!(
                registry.mappers.contains_key(&entity_type),
                "no mapper registered for {}",
                entity_type
            );
        }
    }

    #[test]
    fn test_unregistered_type_falls_back_to_minimal_document() {
        let registry = MapperRegistry::new();
        let record = EntityRecord::new("o1", json!({"orderNumber": "ORD-1"}));

        let doc = registry.map(EntityType::Orders, &record);

        assert_eq!(doc.id, "o1");
        assert_eq!(doc.title, "o1");
        assert_eq!(doc.entity_type, EntityType::Orders);
        assert!(doc.facets.is_empty());
    }

    #[test]
    fn test_registered_type_uses_its_mapper() {
        let registry = MapperRegistry::with_defaults();
        let record = EntityRecord::new("o1", json!({"orderNumber": "ORD-1", "status": "NEW"}));

        let doc = registry.map(EntityType::Orders, &record);

        assert_eq!(doc.title, "ORD-1");
        assert_eq!(doc.facets["status"], "NEW");
    }
}
