//! Recording search provider used by tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::types::{DeleteDocumentRequest, IndexDocumentRequest};
use search_sync_shared::EntityType;

/// Search provider that records every call instead of talking to an engine.
///
/// Tests assert against the recorded requests. A failure message can be armed
/// to simulate a transient engine outage.
#[derive(Default)]
pub struct RecordingSearchProvider {
    indexed: Mutex<Vec<IndexDocumentRequest>>,
    deleted: Mutex<Vec<DeleteDocumentRequest>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingSearchProvider {
    /// Create a provider that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the provider to fail every document operation with this message.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.fail_with.lock().unwrap() = Some(message.into());
    }

    /// Disarm a previously armed failure.
    pub fn recover(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    /// All index requests received so far.
    pub fn indexed(&self) -> Vec<IndexDocumentRequest> {
        self.indexed.lock().unwrap().clone()
    }

    /// All delete requests received so far.
    pub fn deleted(&self) -> Vec<DeleteDocumentRequest> {
        self.deleted.lock().unwrap().clone()
    }

    /// Number of index requests received so far.
    pub fn indexed_count(&self) -> usize {
        self.indexed.lock().unwrap().len()
    }

    /// Number of delete requests received so far.
    pub fn deleted_count(&self) -> usize {
        self.deleted.lock().unwrap().len()
    }

    fn armed_message(&self) -> Option<String> {
        self.fail_with.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndexProvider for RecordingSearchProvider {
    async fn ensure_index_exists(
        &self,
        _tenant_id: &str,
        _entity_type: EntityType,
    ) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn index_document(
        &self,
        request: &IndexDocumentRequest,
    ) -> Result<(), SearchIndexError> {
        if let Some(message) = self.armed_message() {
            return Err(SearchIndexError::index(message));
        }
        self.indexed.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn delete_document(
        &self,
        request: &DeleteDocumentRequest,
    ) -> Result<(), SearchIndexError> {
        if let Some(message) = self.armed_message() {
            return Err(SearchIndexError::delete(message));
        }
        self.deleted.lock().unwrap().push(request.clone());
        Ok(())
    }
}
