//! Error types for the search sync pipeline.

use thiserror::Error;

use search_sync_repository::{IndexStatusError, QueueStoreError};

/// Infrastructure errors from the pipeline's own stores.
///
/// Domain failures (search engine, entity repository, missing records) never
/// surface here: the processor records them on the queue item and reports them
/// through its outcome value. Only a failure of the queue or status store
/// itself, which cannot even be recorded, becomes a `PipelineError`.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The index queue store failed.
    #[error("Queue store error: {0}")]
    QueueStore(#[from] QueueStoreError),

    /// The index status store failed.
    #[error("Status store error: {0}")]
    StatusStore(#[from] IndexStatusError),
}
