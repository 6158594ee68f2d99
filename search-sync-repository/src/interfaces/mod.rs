//! Interface definitions for the search sync repositories.
//!
//! These traits allow dependency injection and swappable backends: PostgreSQL
//! in production, in-memory implementations in tests.

mod entity_repository;
mod index_queue;
mod index_status_store;
mod search_index_provider;

pub use entity_repository::EntityRepository;
pub use index_queue::IndexQueue;
pub use index_status_store::IndexStatusStore;
pub use search_index_provider::SearchIndexProvider;
