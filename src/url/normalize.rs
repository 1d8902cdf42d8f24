use crate::UrlError;
use url::Url;

/// Prefixes `https://` to a trimmed URL string that carries no scheme
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme(" example.gov/a "), "https://example.gov/a");
/// assert_eq!(ensure_scheme("http://example.gov"), "http://example.gov");
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// Canonical string form of a crawl target
///
/// # Normalization Steps
///
/// 1. Trim and add `https://` when no scheme is present
/// 2. Parse; reject anything that is not HTTP(S) or has no host
/// 3. Drop a trailing slash, except for the root path
///
/// The fragment and query are left untouched; the link filter rejects
/// fragment links before they reach this point.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::canonicalize;
///
/// assert_eq!(canonicalize("example.gov/grants/").unwrap(), "https://example.gov/grants");
/// assert_eq!(canonicalize("https://example.gov").unwrap(), "https://example.gov/");
/// ```
pub fn canonicalize(raw: &str) -> Result<String, UrlError> {
    let url = parse_http_url(&ensure_scheme(raw))?;

    let mut canonical = url.to_string();
    if url.path() != "/"
        && url.query().is_none()
        && url.fragment().is_none()
        && canonical.ends_with('/')
    {
        canonical.pop();
    }

    Ok(canonical)
}

/// Parses an absolute HTTP(S) URL that has a host
pub fn parse_http_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Number of non-empty segments in a URL path
pub fn path_depth(path: &str) -> usize {
    path.split('/').filter(|segment| !segment.is_empty()).count()
}
