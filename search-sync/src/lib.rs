//! # Search Sync
//!
//! Tenant-scoped search index synchronization pipeline. Producers enqueue work
//! into a durable queue; the processor drains it one item at a time, mapping
//! relational records into search documents and keeping a per-tenant,
//! per-entity-type status record current.
//!
//! ## Architecture
//!
//! 1. **Queue**: durable, priority-ordered backlog of pending work
//! 2. **Mapper**: pure translation from domain records to search documents
//! 3. **Processor**: claims one item and executes it against the stores
//! 4. **Admin**: operator-triggered reindexes and read-only introspection
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`mapper`]: Per-entity-type document mappings
//! - [`processor`]: The queue processing step
//! - [`admin`]: Reindex trigger and queue/status introspection
//! - [`errors`]: Error types for the pipeline

pub mod admin;
pub mod config;
pub mod errors;
pub mod mapper;
pub mod processor;

pub use config::Dependencies;
pub use errors::PipelineError;

use thiserror::Error;

/// Errors that can occur during pipeline initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] PipelineError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
