//! URL canonicalization for consistent store keys.
//!
//! Store keys are canonical URL strings; only GET is handled, so the URL
//! alone identifies an entry.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a URL string so equal resources map to equal store keys.
///
/// The canonical form is the `url::Url` serialization after key-irrelevant
/// parts are dropped: host case and the fragment. Path and query survive
/// byte-for-byte, since entry lookup is exact string equality on the key.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let raw = input.trim();

    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    // Manifest shorthand like "app.example/501darts.html" gets the secure
    // default scheme rather than failing to parse.
    let parsed = if raw.contains("://") {
        url::Url::parse(raw)
    } else {
        url::Url::parse(&format!("https://{raw}"))
    }
    .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => into_key_form(parsed),
        other => Err(UrlError::UnsupportedScheme(other.to_string())),
    }
}

/// Host case never distinguishes resources; fragments never leave the
/// client, so neither may distinguish store keys.
fn into_key_form(mut url: url::Url) -> Result<url::Url, UrlError> {
    if let Some(host) = url.host_str()
        && host.bytes().any(|b| b.is_ascii_uppercase())
    {
        let lowered = host.to_ascii_lowercase();
        url.set_host(Some(&lowered)).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    url.set_fragment(None);

    Ok(url)
}
