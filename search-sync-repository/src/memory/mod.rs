//! In-memory implementations of the repository interfaces.
//!
//! These back the integration tests and local development. They implement the
//! same observable semantics as the PostgreSQL backends: claim ordering,
//! newest-first listings, and the preserve-count status upsert.

mod entity_repository;
mod queue_store;
mod search_provider;
mod status_store;

pub use entity_repository::InMemoryEntityRepository;
pub use queue_store::InMemoryIndexQueue;
pub use search_provider::RecordingSearchProvider;
pub use status_store::InMemoryIndexStatusStore;
