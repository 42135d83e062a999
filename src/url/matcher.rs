use regex::Regex;

/// Checks a URL against a single exclude glob pattern
///
/// Glob semantics: `*` matches any run of characters, `?` matches any single
/// character. The pattern is compiled to an unanchored regex with no other
/// escaping, so matching is a substring search and plain characters keep
/// their regex meaning. Tenants' stored patterns rely on these exact
/// semantics.
///
/// Patterns that fail to compile are skipped and never match.
///
/// # Examples
///
/// ```
/// use siteindex::url::matches_pattern;
///
/// assert!(matches_pattern("*/admin/*", "https://a.com/admin/x"));
/// assert!(!matches_pattern("*/admin/*", "https://a.com/public/x"));
/// ```
pub fn matches_pattern(pattern: &str, url: &str) -> bool {
    let regex_pattern = pattern.replace('*', ".*").replace('?', ".");
    match Regex::new(&regex_pattern) {
        Ok(re) => re.is_match(url),
        Err(e) => {
            tracing::warn!("Skipping unparseable exclude pattern '{}': {}", pattern, e);
            false
        }
    }
}

/// Checks a URL against a tenant's list of exclude patterns
pub fn matches_exclude(url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| matches_pattern(p, url))
}
