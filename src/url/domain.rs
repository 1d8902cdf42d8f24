use url::Url;

/// Strips a single leading `www.` label from a host name
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::strip_www;
///
/// assert_eq!(strip_www("www.example.gov"), "example.gov");
/// assert_eq!(strip_www("grants.example.gov"), "grants.example.gov");
/// ```
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Extracts the site host from a URL: lowercase, without `www.`
///
/// Two URLs belong to the same site when their site hosts are equal.
///
/// # Returns
///
/// * `Some(String)` - The normalized host
/// * `None` - If the URL has no host
pub fn site_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| strip_www(&h.to_lowercase()).to_string())
}

/// Returns the origin of a URL as a URL with an empty path (`scheme://host[:port]/`)
pub fn origin_of(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}
