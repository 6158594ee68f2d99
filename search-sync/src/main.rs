//! Search Sync Main Entry Point
//!
//! This is the main binary for the search sync worker. It polls the durable
//! index queue per tenant and synchronizes relational records into OpenSearch.

use dotenv::dotenv;
use search_sync::{Dependencies, IndexingError};
use std::env;
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("search_sync=info,search_sync_repository=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "search-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "search-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

/// Drive the processor until shutdown is requested.
///
/// Round-robins over the configured tenants, processing one item per tenant
/// per round, and sleeps for the poll interval after a round in which no
/// tenant had pending work.
async fn run(deps: &Dependencies) -> Result<(), IndexingError> {
    info!(
        tenants = deps.tenant_ids.len(),
        poll_interval_secs = deps.poll_interval.as_secs(),
        "Worker loop started"
    );

    loop {
        let mut any_processed = false;

        for tenant_id in &deps.tenant_ids {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping worker loop");
                    return Ok(());
                }
                outcome = deps.processor.process_next(tenant_id) => {
                    let outcome = outcome?;
                    if outcome.processed {
                        any_processed = true;
                    }
                    if let Some(error) = outcome.error {
                        warn!(tenant_id = %tenant_id, error = %error, "Queue item failed");
                    }
                }
            }
        }

        if !any_processed {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping worker loop");
                    return Ok(());
                }
                _ = sleep(deps.poll_interval) => {}
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize tracing
    init_tracing()?;

    info!("Starting Search Sync worker");

    // Initialize dependencies
    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match run(&deps).await {
        Ok(()) => {
            info!("Search sync worker stopped");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Search sync worker failed");
            Err(e)
        }
    }
}
