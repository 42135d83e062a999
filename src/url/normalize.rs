use url::Url;

/// Normalizes a URL to its canonical string form
///
/// # Normalization Steps
///
/// 1. Resolve against `base` if a base is given (relative hrefs)
/// 2. Discard the fragment
/// 3. Strip exactly one trailing `/` from the path, unless the path is `/`
///
/// Malformed input fails open: the original string is returned unchanged and
/// rejection is deferred to the fetch step.
///
/// # Examples
///
/// ```
/// use siteindex::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://example.com/page/", None),
///     "https://example.com/page"
/// );
/// assert_eq!(
///     normalize_url("https://example.com/page#section", None),
///     "https://example.com/page"
/// );
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> String {
    let parsed = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };

    let mut url = match parsed {
        Ok(url) => url,
        Err(_) => return raw.to_string(),
    };

    url.set_fragment(None);

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        url.set_path(&trimmed);
    }

    url.to_string()
}
