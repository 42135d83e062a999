use url::Url;

/// Extracts the host component of a URL string
///
/// Returns an empty string when the URL does not parse or has no host. The
/// empty string never equals a crawl's base domain, so links with
/// unextractable domains are excluded by the confinement check.
///
/// # Examples
///
/// ```
/// use siteindex::url::extract_domain;
///
/// assert_eq!(extract_domain("https://example.com/path"), "example.com");
/// assert_eq!(extract_domain("https://blog.example.com/"), "blog.example.com");
/// assert_eq!(extract_domain("not a url"), "");
/// ```
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}
