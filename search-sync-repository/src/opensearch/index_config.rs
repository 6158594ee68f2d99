//! OpenSearch index configuration and mappings.
//!
//! Indexes are scoped per tenant and per entity type: each `(tenant_id,
//! entity_type)` pair gets its own physical index so tenants never share
//! documents and a reindex can be reasoned about per pair.

use serde_json::{json, Value};

use search_sync_shared::EntityType;

/// Configuration for the search indexes.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Common prefix for all indexes managed by this pipeline.
    pub prefix: String,
    /// The version number for the indexes (e.g., 0 for "search-t1-orders_v0").
    pub version: u32,
}

impl IndexConfig {
    /// Create a new index configuration.
    pub fn new(prefix: impl Into<String>, version: u32) -> Self {
        Self {
            prefix: prefix.into(),
            version,
        }
    }

    /// The versioned physical index name for one `(tenant, entity_type)` pair.
    pub fn index_name(&self, tenant_id: &str, entity_type: EntityType) -> String {
        format!(
            "{}-{}-{}_v{}",
            self.prefix,
            tenant_id,
            entity_type.as_str(),
            self.version
        )
    }
}

/// Get the index settings and mappings for a search document index.
///
/// The configuration includes:
/// - **search_as_you_type** on `title` for autocomplete
/// - **text** on `content` for full-text matching
/// - **Keyword fields** for ids and exact filtering
/// - dynamic mapping for the per-entity-type facet fields
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "dynamic": true,
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "entity_type": {
                    "type": "keyword"
                },
                "title": {
                    "type": "search_as_you_type",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "content": {
                    "type": "text"
                },
                "indexed_at": {
                    "type": "date"
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name_format() {
        let config = IndexConfig::new("search", 0);
        assert_eq!(
            config.index_name("t1", EntityType::Orders),
            "search-t1-orders_v0"
        );

        let config = IndexConfig::new("search", 3);
        assert_eq!(
            config.index_name("acme", EntityType::Carriers),
            "search-acme-carriers_v3"
        );
    }

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings();

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert_eq!(
            settings["mappings"]["properties"]["title"]["type"],
            "search_as_you_type"
        );
        assert_eq!(settings["mappings"]["properties"]["content"]["type"], "text");
        assert_eq!(settings["mappings"]["properties"]["id"]["type"], "keyword");
    }
}
