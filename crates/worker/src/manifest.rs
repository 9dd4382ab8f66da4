//! The static asset manifest.
//!
//! An ordered sequence of resource identifiers known at generation
//! creation time and immutable for the generation's lifetime. Entries may
//! be relative (joined onto the configured base URL, which covers assets
//! hosted under a non-root path) or absolute.

use swcache_core::{AppConfig, Error};
use swcache_client::canonicalize;
use url::Url;

/// Resolve one resource identifier against a base URL into a store key.
pub fn resolve_against(base: &Url, entry: &str) -> Result<Url, Error> {
    if entry.contains("://") {
        return canonicalize(entry).map_err(|e| Error::InvalidKey(format!("{entry}: {e}")));
    }
    let joined = base
        .join(entry)
        .map_err(|e| Error::InvalidKey(format!("{entry}: {e}")))?;
    canonicalize(joined.as_str()).map_err(|e| Error::InvalidKey(format!("{entry}: {e}")))
}

/// The fixed list of resources an installation must attempt to cache.
#[derive(Clone, Debug)]
pub struct Manifest {
    entries: Vec<String>,
    base: Url,
}

impl Manifest {
    pub fn new(entries: Vec<String>, base: Url) -> Self {
        Self { entries, base }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let base = canonicalize(&config.base_url)
            .map_err(|e| Error::InvalidKey(format!("base_url {}: {e}", config.base_url)))?;
        Ok(Self::new(config.manifest.clone(), base))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve all entries, preserving manifest order.
    pub fn resolve(&self) -> Result<Vec<Url>, Error> {
        self.entries
            .iter()
            .map(|entry| resolve_against(&self.base, entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        canonicalize("https://darts.example/").unwrap()
    }

    #[test]
    fn test_relative_entries_join_base() {
        let manifest = Manifest::new(vec!["index.html".into(), "501darts.html".into()], base());
        let resolved = manifest.resolve().unwrap();
        assert_eq!(resolved[0].as_str(), "https://darts.example/index.html");
        assert_eq!(resolved[1].as_str(), "https://darts.example/501darts.html");
    }

    #[test]
    fn test_absolute_entries_pass_through() {
        let manifest = Manifest::new(vec!["https://cdn.example/lib.js".into()], base());
        let resolved = manifest.resolve().unwrap();
        assert_eq!(resolved[0].as_str(), "https://cdn.example/lib.js");
    }

    #[test]
    fn test_non_root_base_prefix() {
        let base = canonicalize("https://darts.example/app/").unwrap();
        let resolved = resolve_against(&base, "scores.html").unwrap();
        assert_eq!(resolved.as_str(), "https://darts.example/app/scores.html");
    }

    #[test]
    fn test_order_preserved() {
        let entries: Vec<String> = vec!["c.html".into(), "a.html".into(), "b.html".into()];
        let manifest = Manifest::new(entries, base());
        let resolved = manifest.resolve().unwrap();
        let paths: Vec<&str> = resolved.iter().map(|u| u.path()).collect();
        assert_eq!(paths, vec!["/c.html", "/a.html", "/b.html"]);
    }

    #[test]
    fn test_invalid_entry() {
        let manifest = Manifest::new(vec!["ftp://example.com/x".into()], base());
        assert!(matches!(manifest.resolve(), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig {
            base_url: "https://darts.example/".into(),
            manifest: vec!["index.html".into()],
            ..Default::default()
        };
        let manifest = Manifest::from_config(&config).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.base().as_str(), "https://darts.example/");
    }
}
