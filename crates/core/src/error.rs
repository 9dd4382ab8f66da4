//! Unified error types for swcache.

use tokio_rusqlite::rusqlite;

/// Unified error types shared across the swcache crates.
///
/// An unresolvable request is deliberately *not* a variant here: the
/// resolver must degrade it to an explicit not-found response instead of
/// surfacing an error, because some client runtimes reject an undefined
/// fetch resolution outright.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Persistence substrate operation failed.
    #[error("STORE_ERROR: {0}")]
    Store(tokio_rusqlite::Error),

    /// Schema bootstrap could not bring the database to a usable version.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Request URL could not be normalized into a store key.
    #[error("INVALID_KEY: {0}")]
    InvalidKey(String),

    /// Transport-level failure: no response exists for the request.
    #[error("NETWORK_UNAVAILABLE: {0}")]
    NetworkUnavailable(String),

    /// A single manifest entry could not be fetched during install.
    #[error("ASSET_FETCH_FAILED: {url}: {reason}")]
    AssetFetch { url: String, reason: String },

    /// All-or-nothing install aborted on the first failed entry.
    #[error("INSTALL_ABORTED: {url}: {reason}")]
    InstallAborted { url: String, reason: String },

    /// Response body exceeds the configured size limit.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),
}

impl Error {
    /// Whether this error counts as a network failure for resolution
    /// policy purposes (recoverable via cache or fallback content).
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Error::NetworkUnavailable(_) | Error::FetchTooLarge(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Store(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Store(tokio_rusqlite::Error::Close(c)),
            _ => Error::Store(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Store(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AssetFetch { url: "/app.css".to_string(), reason: "timeout".to_string() };
        assert!(err.to_string().contains("ASSET_FETCH_FAILED"));
        assert!(err.to_string().contains("/app.css"));
    }

    #[test]
    fn test_network_failure_classification() {
        assert!(Error::NetworkUnavailable("connect refused".into()).is_network_failure());
        assert!(Error::FetchTooLarge("6MB".into()).is_network_failure());
        assert!(!Error::InvalidKey("???".into()).is_network_failure());
        assert!(!Error::MigrationFailed("v2".into()).is_network_failure());
    }
}
