//! Synchronization operations carried by queue items.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of synchronization work a queue item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexOperation {
    /// Index (or overwrite) a single document.
    Index,
    /// Remove a single document from the search index.
    Delete,
    /// Rebuild every document of one entity type for the tenant.
    Reindex,
}

impl IndexOperation {
    /// The canonical string tag for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexOperation::Index => "INDEX",
            IndexOperation::Delete => "DELETE",
            IndexOperation::Reindex => "REINDEX",
        }
    }
}

impl fmt::Display for IndexOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown index operation: {}", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for IndexOperation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INDEX" => Ok(IndexOperation::Index),
            "DELETE" => Ok(IndexOperation::Delete),
            "REINDEX" => Ok(IndexOperation::Reindex),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}
