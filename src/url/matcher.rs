use super::domain::strip_www;

/// Hosts whose pages are never harvested (social networks)
const SOCIAL_HOSTS: &[&str] = &[
    "*.facebook.com",
    "*.twitter.com",
    "*.linkedin.com",
    "*.instagram.com",
    "*.pinterest.com",
];

/// Extensions of static assets and binaries that are never crawled
///
/// Document formats (`.pdf`, `.doc`, `.docx`) are deliberately absent: the
/// pipeline routes them to the binary extractor instead.
const FILE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".css", ".js", ".ico", ".svg", ".zip", ".exe", ".dmg",
    ".mp4", ".mp3", ".pptx", ".xlsx", ".xml", ".avi", ".flv", ".woff", ".ttf", ".woff2", ".webp",
];

/// Checks if a domain matches a wildcard pattern
///
/// Supports exact patterns (`example.gov`) and wildcard patterns
/// (`*.example.gov`), which also match the bare domain.
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::matches_wildcard;
///
/// assert!(matches_wildcard("example.gov", "example.gov"));
/// assert!(matches_wildcard("*.example.gov", "example.gov"));
/// assert!(matches_wildcard("*.example.gov", "grants.example.gov"));
/// assert!(!matches_wildcard("*.example.gov", "example.org"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        candidate == base || candidate.ends_with(&format!(".{}", base))
    } else {
        candidate == pattern
    }
}

/// Returns true for social network hosts and `mailto:` targets
pub fn is_social_or_email(link: &str) -> bool {
    if link.trim_start().to_ascii_lowercase().starts_with("mailto:") {
        return true;
    }

    match url::Url::parse(link) {
        Ok(url) => url
            .host_str()
            .map(|host| {
                let host = host.to_lowercase();
                let host = strip_www(&host);
                SOCIAL_HOSTS.iter().any(|p| matches_wildcard(p, host))
            })
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Returns true when the link points at a static asset or binary file
pub fn is_file(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    FILE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
