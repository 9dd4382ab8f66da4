//! swcache warm-up binary.
//!
//! Runs one install + activate cycle for the configured generation:
//! fetches every manifest entry into the store, then sweeps superseded
//! generations. Useful for priming a cache database at deploy time.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use swcache_core::{AppConfig, StoreDb};
use swcache_client::{FetchConfig, HttpTransport};
use swcache_worker::{Controller, NoopClients};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load()?;
    tracing::info!(generation = %config.generation, db = %config.db_path.display(), "warming cache generation");

    let db = StoreDb::open(&config.db_path).await?;
    let transport = Arc::new(HttpTransport::new(FetchConfig::from(&config))?);
    let controller = Controller::new(&config, db, transport, Arc::new(NoopClients)).await?;

    let report = controller.on_install().await?;
    for (url, reason) in &report.failures {
        tracing::warn!(%url, %reason, "asset not installed");
    }
    tracing::info!(
        installed = report.installed.len(),
        failed = report.failures.len(),
        "install complete"
    );

    let sweep = controller.on_activate().await?;
    tracing::info!(reaped = sweep.deleted.len(), "activation sweep complete");
    for (name, reason) in &sweep.failed {
        tracing::warn!(store = %name, %reason, "superseded store not deleted");
    }

    Ok(())
}
