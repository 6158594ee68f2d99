//! PostgreSQL implementations of the search sync repositories.
//!
//! Provides production backends for the index queue, the index status store,
//! and the entity repository boundary, all built on `sqlx::PgPool` connection
//! pooling.

mod entity_repository;
mod queue_store;
mod status_store;

pub use entity_repository::PostgresEntityRepository;
pub use queue_store::PostgresIndexQueue;
pub use status_store::PostgresIndexStatusStore;
