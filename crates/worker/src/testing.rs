//! Test doubles shared by the worker's test modules.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use swcache_client::Transport;
use swcache_core::{CachedResponse, Error};
use url::Url;

/// In-memory transport serving a fixed URL→response table.
///
/// Records every fetch so tests can assert how often (or that never) the
/// network was consulted. Flipping `set_offline(true)` makes every fetch
/// fail the way a dead network does.
#[derive(Default)]
pub struct StaticTransport {
    responses: Mutex<HashMap<String, CachedResponse>>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &str, response: CachedResponse) {
        self.responses.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == url).count()
    }
}

#[async_trait::async_trait]
impl Transport for StaticTransport {
    async fn fetch(&self, url: &Url) -> Result<CachedResponse, Error> {
        self.calls.lock().unwrap().push(url.as_str().to_string());

        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::NetworkUnavailable("offline".into()));
        }

        self.responses
            .lock()
            .unwrap()
            .get(url.as_str())
            .map(CachedResponse::duplicate)
            .ok_or_else(|| Error::NetworkUnavailable(format!("no route to {url}")))
    }
}
