//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SWCACHE_*)
//! 2. TOML config file (if SWCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// How a failed manifest entry affects the install as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallMode {
    /// Log each failed entry and install whatever succeeded. One
    /// unreachable asset does not cost the rest of the app its offline
    /// capability.
    BestEffort,
    /// Any failed entry aborts the install; the generation never becomes
    /// current.
    AllOrNothing,
}

/// Which source a navigation request consults first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    /// Store first, network on miss, clean-URL recovery on total failure.
    CacheFirst,
    /// Network first with write-back, store then hub page on failure.
    NetworkFirst,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SWCACHE_*)
/// 2. TOML config file (if SWCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite store database.
    ///
    /// Set via SWCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Current cache generation token. Supplied at deploy time; bumping it
    /// is what supersedes the previous generation.
    ///
    /// Set via SWCACHE_GENERATION environment variable.
    #[serde(default = "default_generation")]
    pub generation: String,

    /// Base URL that relative manifest entries and the hub page resolve
    /// against. Covers assets hosted under a non-root path.
    ///
    /// Set via SWCACHE_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Ordered resource identifiers to make resident at install time.
    /// Relative entries are joined onto `base_url`.
    #[serde(default)]
    pub manifest: Vec<String>,

    /// Designated fallback page for failed navigations.
    ///
    /// Set via SWCACHE_HUB_PAGE environment variable.
    #[serde(default = "default_hub_page")]
    pub hub_page: String,

    /// Navigation resolution policy.
    ///
    /// Set via SWCACHE_NAVIGATION_POLICY environment variable.
    #[serde(default = "default_navigation_policy")]
    pub navigation_policy: NavigationPolicy,

    /// Install failure policy.
    ///
    /// Set via SWCACHE_INSTALL_MODE environment variable.
    #[serde(default = "default_install_mode")]
    pub install_mode: InstallMode,

    /// Whether freshly fetched assets are opportunistically written back
    /// into the store. Only 200 same-origin responses are ever written.
    ///
    /// Set via SWCACHE_CACHE_ASSETS environment variable.
    #[serde(default = "default_true")]
    pub cache_assets: bool,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SWCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via SWCACHE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SWCACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    ///
    /// Set via SWCACHE_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./swcache.sqlite")
}

fn default_generation() -> String {
    "swcache-v1".into()
}

fn default_base_url() -> String {
    "http://localhost/".into()
}

fn default_hub_page() -> String {
    "index.html".into()
}

fn default_navigation_policy() -> NavigationPolicy {
    NavigationPolicy::CacheFirst
}

fn default_install_mode() -> InstallMode {
    InstallMode::BestEffort
}

fn default_user_agent() -> String {
    "swcache/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            generation: default_generation(),
            base_url: default_base_url(),
            manifest: Vec::new(),
            hub_page: default_hub_page(),
            navigation_policy: default_navigation_policy(),
            install_mode: default_install_mode(),
            cache_assets: true,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SWCACHE_`
    /// 2. TOML file from `SWCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SWCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SWCACHE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./swcache.sqlite"));
        assert_eq!(config.generation, "swcache-v1");
        assert_eq!(config.base_url, "http://localhost/");
        assert!(config.manifest.is_empty());
        assert_eq!(config.hub_page, "index.html");
        assert_eq!(config.navigation_policy, NavigationPolicy::CacheFirst);
        assert_eq!(config.install_mode, InstallMode::BestEffort);
        assert!(config.cache_assets);
        assert_eq!(config.max_bytes, 5_242_880);
        assert_eq!(config.timeout_ms, 20_000);
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: NavigationPolicy = serde_json::from_str("\"network_first\"").unwrap();
        assert_eq!(policy, NavigationPolicy::NetworkFirst);

        let mode: InstallMode = serde_json::from_str("\"all_or_nothing\"").unwrap();
        assert_eq!(mode, InstallMode::AllOrNothing);
    }
}
