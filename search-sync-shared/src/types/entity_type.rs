//! Entity type taxonomy for the search sync pipeline.
//!
//! Each entity type names a category of business record with its own document
//! mapping, its own relational table, and its own logical search index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A category of business record tracked by the search sync pipeline.
///
/// The lower-case tag returned by [`EntityType::as_str`] is used on the wire,
/// as the logical index name, and as the relational table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Customers,
    Orders,
    Loads,
    Carriers,
    Documents,
}

impl EntityType {
    /// All supported entity types, in registration order.
    pub const ALL: [EntityType; 5] = [
        EntityType::Customers,
        EntityType::Orders,
        EntityType::Loads,
        EntityType::Carriers,
        EntityType::Documents,
    ];

    /// The canonical string tag for this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Customers => "customers",
            EntityType::Orders => "orders",
            EntityType::Loads => "loads",
            EntityType::Carriers => "carriers",
            EntityType::Documents => "documents",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown entity type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntityType(pub String);

impl fmt::Display for UnknownEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown entity type: {}", self.0)
    }
}

impl std::error::Error for UnknownEntityType {}

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customers" => Ok(EntityType::Customers),
            "orders" => Ok(EntityType::Orders),
            "loads" => Ok(EntityType::Loads),
            "carriers" => Ok(EntityType::Carriers),
            "documents" => Ok(EntityType::Documents),
            other => Err(UnknownEntityType(other.to_string())),
        }
    }
}
