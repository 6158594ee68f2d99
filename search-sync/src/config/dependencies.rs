//! Dependency initialization and wiring for the search sync pipeline.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::admin::SearchAdmin;
use crate::mapper::MapperRegistry;
use crate::processor::QueueProcessor;
use crate::IndexingError;
use search_sync_repository::opensearch::IndexConfig;
use search_sync_repository::{
    OpenSearchProvider, PostgresEntityRepository, PostgresIndexQueue, PostgresIndexStatusStore,
    SearchIndexProvider,
};
use search_sync_shared::EntityType;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default index name prefix.
const DEFAULT_INDEX_ALIAS: &str = "search";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default poll interval for the worker loop in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default maximum PostgreSQL connections.
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from environment variable.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive)
    /// Defaults to "retry" if not set or invalid.
    fn from_env() -> Self {
        match env::var("OPENSEARCH_CONNECTION_MODE")
            .unwrap_or_else(|_| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured queue processor ready to be driven.
    pub processor: QueueProcessor,
    /// The admin façade over the queue and the status store.
    pub admin: SearchAdmin,
    /// Tenants the worker loop polls, in order.
    pub tenant_ids: Vec<String>,
    /// How long the worker loop sleeps after an idle round.
    pub poll_interval: Duration,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `TENANT_IDS`: Comma-separated tenant ids the worker serves (required)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_ALIAS`: Index name prefix (default: "search")
    /// - `INDEX_VERSION`: Index version number (default: 0)
    /// - `POLL_INTERVAL_SECS`: Worker idle sleep in seconds (default: 5)
    /// - `MAX_DB_CONNECTIONS`: PostgreSQL pool size (default: 5)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If initialization fails (only in fail-fast mode)
    pub async fn new() -> Result<Self, IndexingError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| IndexingError::config("DATABASE_URL must be set"))?;
        let tenant_ids = Self::tenant_ids_from_env()?;
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let connection_mode = ConnectionMode::from_env();
        let retry_interval = env::var("OPENSEARCH_RETRY_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);
        let poll_interval = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_DB_CONNECTIONS);

        info!(
            opensearch_url = %opensearch_url,
            tenants = tenant_ids.len(),
            connection_mode = ?connection_mode,
            retry_interval_secs = retry_interval,
            poll_interval_secs = poll_interval,
            "Initializing dependencies"
        );

        let index_alias = env::var("INDEX_ALIAS").unwrap_or_else(|_| DEFAULT_INDEX_ALIAS.to_string());
        let index_version = env::var("INDEX_VERSION")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);
        let index_config = IndexConfig::new(index_alias, index_version);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(&database_url)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to connect to PostgreSQL: {}", e)))?;

        info!("PostgreSQL connection established");

        let queue = PostgresIndexQueue::new(pool.clone());
        queue
            .ensure_schema()
            .await
            .map_err(|e| IndexingError::config(format!("Failed to ensure queue schema: {}", e)))?;

        let status = PostgresIndexStatusStore::new(pool.clone());
        status
            .ensure_schema()
            .await
            .map_err(|e| IndexingError::config(format!("Failed to ensure status schema: {}", e)))?;

        let entities = PostgresEntityRepository::new(pool);

        // Initialize OpenSearch provider with retry logic
        let search_provider = Self::connect_to_opensearch(
            &opensearch_url,
            index_config,
            connection_mode,
            Duration::from_secs(retry_interval),
        )
        .await?;

        info!("OpenSearch connection established");

        // Ensure every per-tenant, per-entity-type index exists up front so
        // the first enqueued item never races index creation.
        for tenant_id in &tenant_ids {
            for entity_type in EntityType::ALL {
                search_provider
                    .ensure_index_exists(tenant_id, entity_type)
                    .await
                    .map_err(|e| {
                        IndexingError::config(format!("Failed to ensure index exists: {}", e))
                    })?;
            }
        }

        let queue: Arc<dyn search_sync_repository::IndexQueue> = Arc::new(queue);
        let status: Arc<dyn search_sync_repository::IndexStatusStore> = Arc::new(status);

        let processor = QueueProcessor::new(
            queue.clone(),
            status.clone(),
            Arc::new(entities),
            Arc::new(search_provider),
            MapperRegistry::with_defaults(),
        );
        let admin = SearchAdmin::new(queue, status);

        Ok(Self {
            processor,
            admin,
            tenant_ids,
            poll_interval: Duration::from_secs(poll_interval),
        })
    }

    /// Parse the comma-separated tenant list from the environment.
    fn tenant_ids_from_env() -> Result<Vec<String>, IndexingError> {
        let raw =
            env::var("TENANT_IDS").map_err(|_| IndexingError::config("TENANT_IDS must be set"))?;

        let tenant_ids: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if tenant_ids.is_empty() {
            return Err(IndexingError::config(
                "TENANT_IDS must contain at least one tenant id",
            ));
        }

        Ok(tenant_ids)
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        index_config: IndexConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, IndexingError> {
        loop {
            match OpenSearchProvider::new(url, index_config.clone()).await {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(IndexingError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}
