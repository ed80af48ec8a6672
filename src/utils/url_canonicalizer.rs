//! URL canonicalization.
//!
//! Reduces every spelling of a URL to a single canonical string so that
//! equality checks and code derivation see identical input for identical
//! resources. The canonical form is the store lookup key; two raw URLs that
//! denote the same resource must canonicalize byte-for-byte equal.

use url::Url;

/// Scheme assigned to scheme-relative input (`//host/path`).
const DEFAULT_SCHEME: &str = "https";

/// Errors that can occur during URL canonicalization.
#[derive(Debug, thiserror::Error)]
pub enum CanonicalizeError {
    #[error("URL is empty")]
    Empty,

    #[error("invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("only HTTP and HTTPS URLs are allowed")]
    UnsupportedScheme,

    #[error("URL has no host")]
    MissingHost,
}

/// Canonicalizes a URL to its single normalized string form.
///
/// # Canonicalization Rules
///
/// 1. Surrounding whitespace is trimmed; empty input is rejected
/// 2. Scheme-relative input (`//host/path`) gets the `https` scheme
/// 3. Only HTTP and HTTPS schemes are accepted
/// 4. Scheme and host are lower-cased; path and query case is preserved
/// 5. Default ports are dropped (80 for HTTP, 443 for HTTPS)
/// 6. Consecutive path separators collapse into one; a trailing separator
///    is removed unless the path is the root
/// 7. Query pairs are sorted by key (byte-wise, stable — duplicate keys keep
///    their relative order) and re-joined deterministically
/// 8. The fragment is discarded
///
/// The function is pure and idempotent: canonicalizing an already-canonical
/// URL returns it unchanged.
///
/// # Errors
///
/// Returns [`CanonicalizeError`] for empty input, unparseable URLs,
/// disallowed schemes, and host-less URLs.
///
/// # Examples
///
/// ```
/// use link_engine::utils::url_canonicalizer::canonicalize_url;
///
/// assert_eq!(
///     canonicalize_url("HTTP://Example.com:80/path?z=1&a=2#section").unwrap(),
///     "http://example.com/path?a=2&z=1"
/// );
/// assert_eq!(
///     canonicalize_url("https://example.com:443/").unwrap(),
///     "https://example.com/"
/// );
/// ```
pub fn canonicalize_url(input: &str) -> Result<String, CanonicalizeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CanonicalizeError::Empty);
    }

    let with_scheme: std::borrow::Cow<'_, str> = if trimmed.starts_with("//") {
        format!("{DEFAULT_SCHEME}:{trimmed}").into()
    } else {
        trimmed.into()
    };

    let url =
        Url::parse(&with_scheme).map_err(|e| CanonicalizeError::InvalidFormat(e.to_string()))?;

    let scheme = url.scheme().to_ascii_lowercase();
    match scheme.as_str() {
        "http" | "https" => {}
        _ => return Err(CanonicalizeError::UnsupportedScheme),
    }

    let host = url
        .host_str()
        .ok_or(CanonicalizeError::MissingHost)?
        .to_ascii_lowercase();

    // The url crate already strips known default ports; the guard keeps the
    // invariant independent of that behavior.
    let port = match (scheme.as_str(), url.port()) {
        ("http", Some(80)) | ("https", Some(443)) => None,
        (_, p) => p,
    };

    let path = canonical_path(url.path());
    let query = url.query().and_then(canonical_query);

    let mut canonical = String::with_capacity(trimmed.len());
    canonical.push_str(&scheme);
    canonical.push_str("://");
    canonical.push_str(&host);
    if let Some(p) = port {
        canonical.push(':');
        canonical.push_str(&p.to_string());
    }
    canonical.push_str(&path);
    if let Some(q) = query {
        canonical.push('?');
        canonical.push_str(&q);
    }

    Ok(canonical)
}

/// Collapses duplicate separators and trims a trailing separator
/// (the root path keeps its single separator).
fn canonical_path(raw: &str) -> String {
    let mut path = String::with_capacity(raw.len());
    let mut prev_slash = false;
    for c in raw.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        path.push(c);
    }

    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

/// Sorts query pairs by key with a byte-wise stable sort and re-joins them.
///
/// Duplicate keys are preserved in their sorted position, not deduplicated;
/// valueless keys keep their bare form. Returns `None` for an empty query.
fn canonical_query(raw: &str) -> Option<String> {
    let mut pairs: Vec<&str> = raw.split('&').filter(|s| !s.is_empty()).collect();
    if pairs.is_empty() {
        return None;
    }

    pairs.sort_by(|a, b| {
        let key_a = a.split('=').next().unwrap_or(a);
        let key_b = b.split('=').next().unwrap_or(b);
        key_a.as_bytes().cmp(key_b.as_bytes())
    });

    Some(pairs.join("&"))
}
