//! Generation installation.
//!
//! On the install trigger, the current generation's store is populated
//! from the manifest: every entry is fetched fresh from the network and
//! stored, independently and in order. What a single failed entry costs is
//! a policy choice:
//!
//! - [`InstallMode::BestEffort`] (default) logs the failure and keeps
//!   going, so one unreachable asset doesn't cost the rest of the app its
//!   offline capability.
//! - [`InstallMode::AllOrNothing`] aborts the install on the first
//!   failure; the generation never becomes current, and its partial writes
//!   are swept once a later generation activates.

use std::sync::Arc;

use swcache_core::{Error, InstallMode};
use swcache_client::Transport;

use crate::generation::GenerationManager;
use crate::manifest::Manifest;

/// What an install run accomplished.
#[derive(Clone, Debug, Default)]
pub struct InstallReport {
    /// Keys now resident in the store, in manifest order.
    pub installed: Vec<String>,
    /// (key, reason) for each entry that could not be made resident.
    pub failures: Vec<(String, String)>,
}

impl InstallReport {
    /// True when every manifest entry was made resident.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Populates a new generation's store from the manifest.
pub struct Installer {
    manager: GenerationManager,
    transport: Arc<dyn Transport>,
    mode: InstallMode,
}

impl Installer {
    pub fn new(manager: GenerationManager, transport: Arc<dyn Transport>, mode: InstallMode) -> Self {
        Self { manager, transport, mode }
    }

    /// Fetch-and-store every manifest entry into the current generation's
    /// store.
    ///
    /// A per-entry failure is a transport error or a non-2xx response.
    /// Store failures are not entry failures; they propagate regardless of
    /// mode.
    pub async fn install(&self, manifest: &Manifest) -> Result<InstallReport, Error> {
        let store = self.manager.open_current_store().await?;
        let mut report = InstallReport::default();

        tracing::info!(
            generation = self.manager.current(),
            entries = manifest.len(),
            mode = ?self.mode,
            "installing generation"
        );

        for url in manifest.resolve()? {
            let key = url.as_str().to_string();
            let failure = match self.transport.fetch(&url).await {
                Ok(response) if response.ok() => {
                    store.put(&key, &response).await?;
                    report.installed.push(key);
                    continue;
                }
                Ok(response) => format!("status {}", response.status),
                Err(e) => e.to_string(),
            };

            match self.mode {
                InstallMode::AllOrNothing => {
                    return Err(Error::InstallAborted { url: key, reason: failure });
                }
                InstallMode::BestEffort => {
                    tracing::warn!(url = %key, reason = %failure, "asset not installed");
                    report.failures.push((key, failure));
                }
            }
        }

        tracing::info!(
            generation = self.manager.current(),
            installed = report.installed.len(),
            failed = report.failures.len(),
            "install finished"
        );

        Ok(report)
    }
}
