//! HTML content extraction
//!
//! This module pulls the indexed fields out of a raw page body:
//! title, meta description and keywords, headings, visible text, a raw
//! HTML snippet, and the outgoing links used to grow the crawl frontier.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Visible text is capped at this many characters per page
const MAX_TEXT_CHARS: usize = 50_000;

/// Raw HTML snippet length stored alongside the text
const MAX_SNIPPET_CHARS: usize = 1_000;

/// At most this many headings are kept, h1s before h2s
const MAX_HEADINGS: usize = 10;

/// Fields extracted from one page body
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub headings: Vec<String>,
    pub text_content: String,
    pub html_snippet: String,
}

struct Patterns {
    title: Regex,
    description: Regex,
    keywords: Regex,
    h1: Regex,
    h2: Regex,
    script: Regex,
    style: Regex,
    tag: Regex,
    whitespace: Regex,
    href: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        title: Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").unwrap(),
        description: Regex::new(
            r#"(?is)<meta[^>]*name=["']description["'][^>]*content=["']([^"']+)["']"#,
        )
        .unwrap(),
        keywords: Regex::new(
            r#"(?is)<meta[^>]*name=["']keywords["'][^>]*content=["']([^"']+)["']"#,
        )
        .unwrap(),
        h1: Regex::new(r"(?is)<h1[^>]*>([^<]+)</h1>").unwrap(),
        h2: Regex::new(r"(?is)<h2[^>]*>([^<]+)</h2>").unwrap(),
        script: Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap(),
        style: Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap(),
        tag: Regex::new(r"<[^>]+>").unwrap(),
        whitespace: Regex::new(r"\s+").unwrap(),
        href: Regex::new(r#"(?i)<a[^>]*href=["']([^"']+)["']"#).unwrap(),
    })
}

/// Truncates on a character boundary, never splitting a code point
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Extracts the indexed fields from a raw HTML body
///
/// Pages with no `<title>` are titled "Untitled". Script and style blocks
/// are dropped before the visible text is flattened.
pub fn extract_page_content(html: &str) -> ExtractedContent {
    let p = patterns();

    let title = p
        .title
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    let description = p
        .description
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());

    let keywords = p.keywords.captures(html).and_then(|c| c.get(1)).map(|m| {
        m.as_str()
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>()
    });

    let mut headings: Vec<String> = Vec::new();
    for re in [&p.h1, &p.h2] {
        for cap in re.captures_iter(html) {
            if headings.len() >= MAX_HEADINGS {
                break;
            }
            if let Some(m) = cap.get(1) {
                let text = m.as_str().trim();
                if !text.is_empty() {
                    headings.push(text.to_string());
                }
            }
        }
    }

    let without_scripts = p.script.replace_all(html, " ");
    let without_styles = p.style.replace_all(&without_scripts, " ");
    let without_tags = p.tag.replace_all(&without_styles, " ");
    let collapsed = p.whitespace.replace_all(&without_tags, " ");
    let text_content = truncate_chars(collapsed.trim(), MAX_TEXT_CHARS).to_string();

    let html_snippet = truncate_chars(html, MAX_SNIPPET_CHARS).to_string();

    ExtractedContent {
        title,
        description,
        keywords,
        headings,
        text_content,
        html_snippet,
    }
}

/// Extracts outgoing links from a page body, resolved against its URL
///
/// Fragment-only, mailto:, tel:, and javascript: hrefs are skipped, as is
/// anything the base URL cannot resolve.
pub fn extract_links(html: &str, base: &Url) -> Vec<String> {
    let p = patterns();
    let mut links = Vec::new();

    for cap in p.href.captures_iter(html) {
        let href = match cap.get(1) {
            Some(m) => m.as_str(),
            None => continue,
        };

        if href.starts_with('#')
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("javascript:")
        {
            continue;
        }

        if let Ok(resolved) = base.join(href) {
            links.push(resolved.to_string());
        }
    }

    links
}
