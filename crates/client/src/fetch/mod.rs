//! HTTP fetch transport.
//!
//! The controller never talks to reqwest directly; it consumes the
//! [`Transport`] trait so installs and resolutions can run against a mock
//! in tests. The real implementation buffers the body eagerly: everything
//! downstream works on [`CachedResponse`] values, which can be duplicated,
//! unlike a live body stream.
//!
//! Status handling differs from a plain HTTP client on purpose: a 404 or
//! 500 from the network is still a response the resolver may need to hand
//! to the caller, so any received status maps to `Ok`. Errors are reserved
//! for the no-response cases (connect failure, timeout, truncated body,
//! oversized body).

pub mod url;

use bytes::Bytes;
use reqwest::{Client, Url, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, canonicalize};

use swcache_core::{CachedResponse, Error, ResponseKind};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "swcache/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "swcache/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&swcache_core::AppConfig> for FetchConfig {
    fn from(config: &swcache_core::AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// Abstract async fetch capability.
///
/// `Ok` carries whatever response the network produced, including error
/// statuses. `Err` means no response exists; the resolver treats
/// network-failure errors as "go to fallback content".
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<CachedResponse, Error>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    http: Client,
    config: FetchConfig,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::NetworkUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<CachedResponse, Error> {
        let start = Instant::now();

        let request = self.http.get(url.as_str()).header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        );

        let response = request
            .send()
            .await
            .map_err(|e| Error::NetworkUnavailable(format!("network error: {e}")))?;

        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes: Bytes = response
            .bytes()
            .await
            .map_err(|e| Error::NetworkUnavailable(format!("failed to read response: {e}")))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        // Same-origin after redirects counts as "basic"; anything else is
        // ineligible for write-back.
        let kind = if final_url.origin() == url.origin() { ResponseKind::Basic } else { ResponseKind::Cors };

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let header_pairs = headers
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        tracing::debug!(
            "fetched {} -> {} {} in {}ms ({} bytes)",
            url,
            final_url,
            status.as_u16(),
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(CachedResponse { status: status.as_u16(), kind, content_type, headers: header_pairs, body: bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "swcache/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = swcache_core::AppConfig { max_bytes: 1024, timeout_ms: 500, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.max_bytes, 1024);
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.user_agent, app.user_agent);
    }

    #[tokio::test]
    async fn test_transport_new() {
        let transport = HttpTransport::new(FetchConfig::default());
        assert!(transport.is_ok());
    }
}
