//! Activation sweep.
//!
//! When a new generation activates, every stored generation that isn't the
//! current one is deleted. Deletions are independent: one failure is
//! logged and recorded without blocking the rest of the sweep. Running the
//! sweep when only the current store exists is a no-op.

use swcache_core::{Error, StoreCatalog, StoreDb};

use crate::generation::GenerationManager;

/// What an activation sweep accomplished.
#[derive(Clone, Debug, Default)]
pub struct SweepReport {
    /// Store names that were deleted.
    pub deleted: Vec<String>,
    /// (name, reason) for stores that could not be deleted.
    pub failed: Vec<(String, String)>,
}

/// Deletes superseded generation stores on activation.
pub struct Reaper<C = StoreDb> {
    current: String,
    catalog: C,
}

impl Reaper {
    /// Sweep the manager's own database.
    pub fn new(manager: GenerationManager) -> Self {
        let current = manager.current().to_string();
        Self { current, catalog: manager.db().clone() }
    }
}

impl<C: StoreCatalog> Reaper<C> {
    /// Sweep an arbitrary catalog. Production goes through
    /// [`Reaper::new`]; this is the seam for exercising delete failures.
    pub fn with_catalog(current: impl Into<String>, catalog: C) -> Self {
        Self { current: current.into(), catalog }
    }

    /// Delete every store whose name is not the current generation token.
    pub async fn sweep(&self) -> Result<SweepReport, Error> {
        let mut report = SweepReport::default();

        for name in self.catalog.list_store_names().await? {
            if name == self.current {
                continue;
            }
            match self.catalog.delete_store(&name).await {
                Ok(true) => {
                    tracing::info!(store = %name, current = %self.current, "reaped superseded generation");
                    report.deleted.push(name);
                }
                // Already gone; a concurrent sweep got there first.
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(store = %name, reason = %e, "failed to reap generation");
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        Ok(report)
    }
}
