//! Buffered response model.
//!
//! Network transports hand out read-once body streams; everything swcache
//! stores or replays is materialized into a [`CachedResponse`] first. Once
//! buffered, a response can be duplicated any number of times, which is how
//! one network response serves both the caller and the cache write-back.

use bytes::Bytes;

/// Origin classification of a response, mirroring the fetch response types
/// that matter for caching policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response; eligible for write-back.
    Basic,
    /// Cross-origin response with readable headers.
    Cors,
    /// Cross-origin response with opaque status and body.
    Opaque,
    /// Synthesized failure response.
    Error,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Basic => "basic",
            ResponseKind::Cors => "cors",
            ResponseKind::Opaque => "opaque",
            ResponseKind::Error => "error",
        }
    }

    /// Parse the stored form. Unknown values map to `Opaque`, the most
    /// conservative classification for caching decisions.
    pub fn parse(s: &str) -> Self {
        match s {
            "basic" => ResponseKind::Basic,
            "cors" => ResponseKind::Cors,
            "error" => ResponseKind::Error,
            _ => ResponseKind::Opaque,
        }
    }
}

impl std::fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully buffered HTTP response: what the store persists and what the
/// resolver returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Origin classification.
    pub kind: ResponseKind,
    /// Content-Type header, if present.
    pub content_type: Option<String>,
    /// Response headers as (name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// Body bytes.
    pub body: Bytes,
}

impl CachedResponse {
    /// Build a same-origin response with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, kind: ResponseKind::Basic, content_type: None, headers: Vec::new(), body: body.into() }
    }

    /// The explicit empty not-found response. Returned whenever no cache
    /// entry, network response, or fallback content exists, so no request
    /// ever resolves to nothing.
    pub fn not_found() -> Self {
        Self {
            status: 404,
            kind: ResponseKind::Error,
            content_type: None,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Status in the 200..300 range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether this response may be written back into a store: exactly
    /// status 200 and same-origin. Error pages and opaque cross-origin
    /// responses never poison the cache.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }

    /// Duplicate the buffered response.
    ///
    /// This is the explicit stand-in for cloning a read-once body stream:
    /// one copy goes to the caller, the other to the store.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}
