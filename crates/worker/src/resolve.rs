//! Request resolution policy.
//!
//! For every intercepted request the resolver chooses between the store,
//! the network, and fallback content, and opportunistically writes fresh
//! network responses back into the store. Every code path yields a
//! definite response: when cache, network, and fallback are all exhausted
//! the caller still gets an explicit empty 404, never an unresolved
//! outcome (some client runtimes reject an undefined fetch resolution).
//!
//! Asset requests are always cache-first. Navigation requests follow the
//! configured [`NavigationPolicy`]:
//!
//! - Cache-first: store, then network, then clean-URL recovery (a path
//!   with no extension is retried with an `.html` suffix), then the hub
//!   page, then 404. The root path goes straight to the hub page.
//! - Network-first: network with write-back, then the exact store entry,
//!   then the hub page, then 404.

use std::sync::Arc;

use swcache_core::{CachedResponse, Error, GenerationStore, NavigationPolicy};
use swcache_client::{Transport, canonicalize};
use url::Url;

/// Top-level document load vs. sub-resource request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Navigation,
    Asset,
}

/// One intercepted request. Requests are independent of each other; the
/// store is the only state they share.
#[derive(Debug, Clone)]
pub struct InterceptedRequest {
    pub url: Url,
    pub kind: RequestKind,
}

impl InterceptedRequest {
    pub fn navigation(url: Url) -> Self {
        Self { url, kind: RequestKind::Navigation }
    }

    pub fn asset(url: Url) -> Self {
        Self { url, kind: RequestKind::Asset }
    }

    /// Canonicalize a raw URL string into a request.
    pub fn parse(input: &str, kind: RequestKind) -> Result<Self, Error> {
        let url = canonicalize(input).map_err(|e| Error::InvalidKey(format!("{input}: {e}")))?;
        Ok(Self { url, kind })
    }
}

/// Which source produced the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Stored response for the exact request key.
    Cache,
    /// Fresh network response.
    Network,
    /// Substitute content from the store: clean-URL `.html` counterpart or
    /// the hub page.
    Fallback,
    /// Nothing was available; the response is the explicit empty 404.
    NotFound,
}

/// A definite resolution outcome.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub response: CachedResponse,
    pub source: Source,
}

/// The request-interception policy engine.
pub struct Resolver {
    store: GenerationStore,
    transport: Arc<dyn Transport>,
    policy: NavigationPolicy,
    hub: Url,
    cache_assets: bool,
}

impl Resolver {
    pub fn new(
        store: GenerationStore,
        transport: Arc<dyn Transport>,
        policy: NavigationPolicy,
        hub: Url,
        cache_assets: bool,
    ) -> Self {
        Self { store, transport, policy, hub, cache_assets }
    }

    /// Resolve one request to a definite response.
    ///
    /// `Err` is reserved for store substrate failures; network failures
    /// are always recovered into a response here.
    pub async fn resolve(&self, request: &InterceptedRequest) -> Result<Resolved, Error> {
        match request.kind {
            RequestKind::Asset => self.resolve_asset(&request.url).await,
            RequestKind::Navigation => match self.policy {
                NavigationPolicy::CacheFirst => self.navigate_cache_first(&request.url).await,
                NavigationPolicy::NetworkFirst => self.navigate_network_first(&request.url).await,
            },
        }
    }

    async fn resolve_asset(&self, url: &Url) -> Result<Resolved, Error> {
        let key = url.as_str();

        if let Some(hit) = self.store.get(key).await? {
            tracing::debug!(%url, "asset cache hit");
            return Ok(Resolved { response: hit, source: Source::Cache });
        }

        match self.transport.fetch(url).await {
            Ok(response) => {
                if self.cache_assets && response.is_cacheable() {
                    // One copy for the caller, one for the store.
                    let copy = response.duplicate();
                    self.store.put(key, &copy).await?;
                    tracing::debug!(%url, "asset written back");
                }
                Ok(Resolved { response, source: Source::Network })
            }
            Err(e) if e.is_network_failure() => {
                tracing::debug!(%url, reason = %e, "asset unreachable");
                Ok(Resolved { response: CachedResponse::not_found(), source: Source::NotFound })
            }
            Err(e) => Err(e),
        }
    }

    async fn navigate_cache_first(&self, url: &Url) -> Result<Resolved, Error> {
        let key = url.as_str();

        if let Some(hit) = self.store.get(key).await? {
            tracing::debug!(%url, "navigation cache hit");
            return Ok(Resolved { response: hit, source: Source::Cache });
        }

        match self.transport.fetch(url).await {
            Ok(response) => {
                if response.is_cacheable() {
                    let copy = response.duplicate();
                    self.store.put(key, &copy).await?;
                }
                Ok(Resolved { response, source: Source::Network })
            }
            Err(e) if e.is_network_failure() => {
                tracing::debug!(%url, reason = %e, "navigation offline, recovering");
                self.recover_navigation(url).await
            }
            Err(e) => Err(e),
        }
    }

    async fn navigate_network_first(&self, url: &Url) -> Result<Resolved, Error> {
        let key = url.as_str();

        match self.transport.fetch(url).await {
            Ok(response) => {
                if response.is_cacheable() {
                    let copy = response.duplicate();
                    self.store.put(key, &copy).await?;
                    tracing::debug!(%url, "navigation written back");
                }
                Ok(Resolved { response, source: Source::Network })
            }
            Err(e) if e.is_network_failure() => {
                tracing::debug!(%url, reason = %e, "navigation offline, consulting store");
                if let Some(hit) = self.store.get(key).await? {
                    return Ok(Resolved { response: hit, source: Source::Cache });
                }
                self.hub_or_not_found().await
            }
            Err(e) => Err(e),
        }
    }

    /// Total-failure path for cache-first navigation: clean-URL recovery,
    /// then the hub page, then the explicit 404.
    async fn recover_navigation(&self, url: &Url) -> Result<Resolved, Error> {
        let path = url.path();

        // The root path resolves directly to the hub page, bypassing the
        // extension rule.
        if path != "/" && !last_segment_has_extension(path) {
            let mut suffixed = url.clone();
            suffixed.set_path(&format!("{path}.html"));
            suffixed.set_query(None);
            if let Some(hit) = self.store.get(suffixed.as_str()).await? {
                tracing::debug!(%url, fallback = %suffixed, "clean-URL fallback");
                return Ok(Resolved { response: hit, source: Source::Fallback });
            }
        }

        self.hub_or_not_found().await
    }

    async fn hub_or_not_found(&self) -> Result<Resolved, Error> {
        if let Some(hub) = self.store.get(self.hub.as_str()).await? {
            tracing::debug!(hub = %self.hub, "hub page fallback");
            return Ok(Resolved { response: hub, source: Source::Fallback });
        }
        Ok(Resolved { response: CachedResponse::not_found(), source: Source::NotFound })
    }
}

/// Whether the final path segment carries a file extension (a `.` after
/// the last `/`).
fn last_segment_has_extension(path: &str) -> bool {
    path.rsplit('/').next().is_some_and(|segment| segment.contains('.'))
}
