//! Request URL construction.
//!
//! [`build_url`] parses the base URL and appends the query parameters, each
//! key and value percent-encoded on its own:
//!
//! ```
//! let url = snapget_core::build_url("https://example.com/search", [("q", "a b"), ("q", "c")])?;
//! assert_eq!(url.as_str(), "https://example.com/search?q=a%20b&q=c");
//! # Ok::<(), snapget_core::Error>(())
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::{Error, Result};

/// Everything except the RFC 3986 unreserved characters.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Build the absolute request URL from a base URL and ordered query parameters.
///
/// Parameters are appended after any query already present in `base`; order
/// and duplicate keys are preserved. With no parameters the parsed base URL is
/// returned as is.
pub fn build_url<I, K, V>(base: &str, params: I) -> Result<Url>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(base)?;
    ensure_request_target(&url)?;

    let appended = encode_query(params);
    if !appended.is_empty() {
        let query = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{appended}"),
            _ => appended,
        };
        url.set_query(Some(&query));
    }

    Ok(url)
}

/// Percent-encode `key=value` pairs joined by `&`.
pub fn encode_query<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut query = String::new();
    for (key, value) in params {
        if !query.is_empty() {
            query.push('&');
        }
        query.extend(utf8_percent_encode(key.as_ref(), QUERY_COMPONENT));
        query.push('=');
        query.extend(utf8_percent_encode(value.as_ref(), QUERY_COMPONENT));
    }
    query
}

fn ensure_request_target(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::url_construction(format!(
            "unsupported scheme `{}`",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::url_construction(format!("`{url}` has no host")));
    }
    Ok(())
}
