//! Lifecycle event dispatch.
//!
//! The browser-side lifecycle (install → activate → fetch...) arrives here
//! as explicit events. [`Controller::dispatch`] is the dispatch table
//! mapping trigger kind to handler; each handler holds a scoped
//! work-pending token for its duration, so a host can keep the trigger
//! alive until [`Controller::pending_events`] drops to zero instead of
//! relying on implicit event-loop deferral.
//!
//! The host guarantees ordering: install completes (or fails) before
//! activate fires for the same generation, and activate completes before
//! fetches run under the new generation's control. Fetch events may run
//! concurrently with each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use swcache_core::{AppConfig, Error, StoreDb};
use swcache_client::Transport;

use crate::generation::GenerationManager;
use crate::install::{InstallReport, Installer};
use crate::manifest::{self, Manifest};
use crate::reap::{Reaper, SweepReport};
use crate::resolve::{InterceptedRequest, Resolved, Resolver};

/// Lifecycle acceleration hooks into the hosting environment.
pub trait ClientControl: Send + Sync {
    /// Let a freshly installed generation supersede a waiting one
    /// immediately instead of waiting for all clients to close.
    fn skip_waiting(&self);

    /// Take control of already-open pages so they switch to the new
    /// generation without a reload.
    fn claim_clients(&self);
}

/// For hosts without page control (e.g. the CLI warmer).
pub struct NoopClients;

impl ClientControl for NoopClients {
    fn skip_waiting(&self) {}
    fn claim_clients(&self) {}
}

/// A browser-dispatched lifecycle trigger.
#[derive(Debug)]
pub enum LifecycleEvent {
    Install,
    Activate,
    Fetch(InterceptedRequest),
}

/// What handling an event produced.
#[derive(Debug)]
pub enum EventOutcome {
    Installed(InstallReport),
    Activated(SweepReport),
    Resolved(Resolved),
}

/// Scoped work-pending token: one per in-flight event handler.
struct PendingWork {
    gauge: Arc<AtomicUsize>,
}

impl PendingWork {
    fn enter(gauge: &Arc<AtomicUsize>) -> Self {
        gauge.fetch_add(1, Ordering::SeqCst);
        Self { gauge: gauge.clone() }
    }
}

impl Drop for PendingWork {
    fn drop(&mut self) {
        self.gauge.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Ties the components to the lifecycle: installer on install, reaper on
/// activate, resolver on every fetch.
pub struct Controller {
    manager: GenerationManager,
    manifest: Manifest,
    installer: Installer,
    resolver: Resolver,
    reaper: Reaper,
    clients: Arc<dyn ClientControl>,
    pending: Arc<AtomicUsize>,
}

impl Controller {
    /// Build a controller for the configured generation.
    pub async fn new(
        config: &AppConfig,
        db: StoreDb,
        transport: Arc<dyn Transport>,
        clients: Arc<dyn ClientControl>,
    ) -> Result<Self, Error> {
        let manager = GenerationManager::new(db, config.generation.clone());
        let manifest = Manifest::from_config(config)?;
        let hub = manifest::resolve_against(manifest.base(), &config.hub_page)?;

        let installer = Installer::new(manager.clone(), transport.clone(), config.install_mode);
        let reaper = Reaper::new(manager.clone());
        let store = manager.open_current_store().await?;
        let resolver = Resolver::new(store, transport, config.navigation_policy, hub, config.cache_assets);

        Ok(Self {
            manager,
            manifest,
            installer,
            resolver,
            reaper,
            clients,
            pending: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn manager(&self) -> &GenerationManager {
        &self.manager
    }

    /// Number of event handlers currently in flight.
    pub fn pending_events(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Route one lifecycle event to its handler.
    pub async fn dispatch(&self, event: LifecycleEvent) -> Result<EventOutcome, Error> {
        match event {
            LifecycleEvent::Install => self.on_install().await.map(EventOutcome::Installed),
            LifecycleEvent::Activate => self.on_activate().await.map(EventOutcome::Activated),
            LifecycleEvent::Fetch(request) => self.on_fetch(&request).await.map(EventOutcome::Resolved),
        }
    }

    /// Install handler: populate the store, then supersede any waiting
    /// generation immediately. A failed all-or-nothing install skips the
    /// supersede signal; the generation never becomes current.
    pub async fn on_install(&self) -> Result<InstallReport, Error> {
        let _work = PendingWork::enter(&self.pending);
        let report = self.installer.install(&self.manifest).await?;
        self.clients.skip_waiting();
        Ok(report)
    }

    /// Activate handler: sweep superseded stores, then take control of
    /// open pages.
    pub async fn on_activate(&self) -> Result<SweepReport, Error> {
        let _work = PendingWork::enter(&self.pending);
        let report = self.reaper.sweep().await?;
        self.clients.claim_clients();
        Ok(report)
    }

    /// Fetch handler: resolve one intercepted request.
    pub async fn on_fetch(&self, request: &InterceptedRequest) -> Result<Resolved, Error> {
        let _work = PendingWork::enter(&self.pending);
        self.resolver.resolve(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{RequestKind, Source};
    use crate::testing::StaticTransport;
    use swcache_core::{CachedResponse, InstallMode};

    struct CountingClients {
        skips: AtomicUsize,
        claims: AtomicUsize,
    }

    impl CountingClients {
        fn new() -> Self {
            Self { skips: AtomicUsize::new(0), claims: AtomicUsize::new(0) }
        }
    }

    impl ClientControl for CountingClients {
        fn skip_waiting(&self) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }
        fn claim_clients(&self) {
            self.claims.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn config() -> AppConfig {
        AppConfig {
            generation: "darts-v2".into(),
            base_url: "https://darts.example/".into(),
            manifest: vec!["index.html".into(), "501darts.html".into(), "cricket.html".into()],
            ..Default::default()
        }
    }

    fn seed_transport(transport: &StaticTransport) {
        transport.insert("https://darts.example/index.html", CachedResponse::new(200, "hub"));
        transport.insert("https://darts.example/501darts.html", CachedResponse::new(200, "501"));
        transport.insert("https://darts.example/cricket.html", CachedResponse::new(200, "cricket"));
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let db = StoreDb::open_in_memory().await.unwrap();
        // A superseded generation left over from a previous deploy.
        let old = db.open_store("darts-v1").await.unwrap();
        old.put("https://darts.example/old.html", &CachedResponse::new(200, "old"))
            .await
            .unwrap();

        let transport = Arc::new(StaticTransport::new());
        seed_transport(&transport);
        let clients = Arc::new(CountingClients::new());

        let controller = Controller::new(&config(), db.clone(), transport.clone(), clients.clone())
            .await
            .unwrap();

        // Install: manifest becomes resident, waiting is skipped.
        let outcome = controller.dispatch(LifecycleEvent::Install).await.unwrap();
        let EventOutcome::Installed(report) = outcome else {
            panic!("install event must yield an install report");
        };
        assert!(report.is_complete());
        assert_eq!(clients.skips.load(Ordering::SeqCst), 1);

        // Activate: only the current generation survives, clients claimed.
        let outcome = controller.dispatch(LifecycleEvent::Activate).await.unwrap();
        let EventOutcome::Activated(sweep) = outcome else {
            panic!("activate event must yield a sweep report");
        };
        assert_eq!(sweep.deleted, vec!["darts-v1".to_string()]);
        assert_eq!(db.list_store_names().await.unwrap(), vec!["darts-v2".to_string()]);
        assert_eq!(clients.claims.load(Ordering::SeqCst), 1);

        // Fetch offline: installed pages resolve from the store.
        transport.set_offline(true);
        let request = InterceptedRequest::parse("https://darts.example/501darts.html", RequestKind::Navigation).unwrap();
        let outcome = controller.dispatch(LifecycleEvent::Fetch(request)).await.unwrap();
        let EventOutcome::Resolved(resolved) = outcome else {
            panic!("fetch event must yield a resolution");
        };
        assert_eq!(resolved.source, Source::Cache);
        assert_eq!(resolved.response.body.as_ref(), b"501");

        assert_eq!(controller.pending_events(), 0);
    }

    #[tokio::test]
    async fn test_clean_url_after_lifecycle() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let transport = Arc::new(StaticTransport::new());
        seed_transport(&transport);

        let controller = Controller::new(&config(), db, transport.clone(), Arc::new(NoopClients))
            .await
            .unwrap();
        controller.on_install().await.unwrap();
        controller.on_activate().await.unwrap();

        transport.set_offline(true);
        let request = InterceptedRequest::parse("https://darts.example/501darts", RequestKind::Navigation).unwrap();
        let resolved = controller.on_fetch(&request).await.unwrap();
        assert_eq!(resolved.source, Source::Fallback);
        assert_eq!(resolved.response.body.as_ref(), b"501");
    }

    #[tokio::test]
    async fn test_failed_all_or_nothing_install_never_supersedes() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let transport = Arc::new(StaticTransport::new());
        // index.html only; the other manifest entries have no route.
        transport.insert("https://darts.example/index.html", CachedResponse::new(200, "hub"));
        let clients = Arc::new(CountingClients::new());

        let config = AppConfig { install_mode: InstallMode::AllOrNothing, ..config() };
        let controller = Controller::new(&config, db, transport, clients.clone()).await.unwrap();

        assert!(controller.on_install().await.is_err());
        assert_eq!(clients.skips.load(Ordering::SeqCst), 0);
    }
}
