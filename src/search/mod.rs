//! Relevance search over indexed pages
//!
//! Case-insensitive scoring over title and text: a title hit is worth ten
//! points plus one per occurrence in the text. Only crawled pages are
//! searched; error records never match.

use crate::state::PageStatus;
use crate::storage::{Storage, StorageResult};

/// Default number of hits returned to a collaborator
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Hits used as answer context are capped tighter
pub const CONTEXT_SEARCH_LIMIT: usize = 3;

/// Returned content is capped at this many characters per hit
const MAX_HIT_CONTENT_CHARS: usize = 1_000;

/// One scored search hit
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub content: String,
    pub relevance_score: u32,
}

/// Searches a tenant's crawled pages for the query
///
/// The query is trimmed and matched case-insensitively; an empty query
/// returns no hits. Ties keep the pages' insertion order.
pub fn search_pages<S: Storage>(
    storage: &S,
    tenant: &str,
    query: &str,
    limit: usize,
) -> StorageResult<Vec<SearchHit>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let pages = storage.list_pages(tenant, Some(PageStatus::Crawled))?;

    let mut hits: Vec<SearchHit> = pages
        .into_iter()
        .filter_map(|page| {
            let title_lower = page.title.to_lowercase();
            let content_lower = page.text_content.to_lowercase();

            let mut score: u32 = 0;
            if title_lower.contains(&query) {
                score += 10;
            }
            score += content_lower.matches(&query).count() as u32;

            if score == 0 {
                return None;
            }

            Some(SearchHit {
                id: page.id,
                url: page.url,
                title: page.title,
                content: truncate_chars(&page.text_content, MAX_HIT_CONTENT_CHARS).to_string(),
                relevance_score: score,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    hits.truncate(limit);

    Ok(hits)
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{NewPage, SqliteStorage};

    fn page(url: &str, title: &str, text: &str) -> NewPage {
        NewPage {
            tenant: "t1".to_string(),
            url: url.to_string(),
            title: title.to_string(),
            text_content: text.to_string(),
            html_snippet: String::new(),
            description: None,
            keywords: None,
            headings: Vec::new(),
            depth: 0,
            status: PageStatus::Crawled,
            parent_url: None,
            error: None,
        }
    }

    #[test]
    fn test_title_hit_outranks_body_occurrences() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page(&page(
                "https://a.com/cats",
                "Cat Facts",
                "everything about cats",
            ))
            .unwrap();
        storage
            .upsert_page(&page(
                "https://a.com/dogs",
                "Dog Facts",
                "cats cats cats cats cats",
            ))
            .unwrap();

        let hits = search_pages(&storage, "t1", "cat", DEFAULT_SEARCH_LIMIT).unwrap();
        assert_eq!(hits.len(), 2);
        // Title match (10) + 1 occurrence beats 5 occurrences
        assert_eq!(hits[0].title, "Cat Facts");
        assert_eq!(hits[0].relevance_score, 11);
        assert_eq!(hits[1].relevance_score, 5);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page(&page("https://a.com/", "Pricing", "Our PRICING page"))
            .unwrap();

        let hits = search_pages(&storage, "t1", "  pricing ", DEFAULT_SEARCH_LIMIT).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].relevance_score, 11);
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page(&page("https://a.com/", "Home", "welcome"))
            .unwrap();

        assert!(search_pages(&storage, "t1", "", DEFAULT_SEARCH_LIMIT)
            .unwrap()
            .is_empty());
        assert!(search_pages(&storage, "t1", "   ", DEFAULT_SEARCH_LIMIT)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_zero_score_pages_filtered_out() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page(&page("https://a.com/", "Home", "nothing relevant"))
            .unwrap();

        let hits = search_pages(&storage, "t1", "pricing", DEFAULT_SEARCH_LIMIT).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_error_pages_never_match() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let mut broken = page("https://a.com/bad", "Error", "");
        broken.status = PageStatus::Error;
        broken.error = Some("HTTP 404: Not Found".to_string());
        storage.upsert_page(&broken).unwrap();

        let hits = search_pages(&storage, "t1", "error", DEFAULT_SEARCH_LIMIT).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_limit_applied_after_sort() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        for i in 0..8 {
            let text = "topic ".repeat(i + 1);
            storage
                .upsert_page(&page(
                    &format!("https://a.com/{}", i),
                    &format!("Page {}", i),
                    &text,
                ))
                .unwrap();
        }

        let hits = search_pages(&storage, "t1", "topic", 3).unwrap();
        assert_eq!(hits.len(), 3);
        // Highest occurrence counts survive the cut
        assert_eq!(hits[0].relevance_score, 8);
        assert_eq!(hits[1].relevance_score, 7);
        assert_eq!(hits[2].relevance_score, 6);
    }

    #[test]
    fn test_hit_content_truncated() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let text = format!("needle {}", "x".repeat(3_000));
        storage
            .upsert_page(&page("https://a.com/", "Long", &text))
            .unwrap();

        let hits = search_pages(&storage, "t1", "needle", DEFAULT_SEARCH_LIMIT).unwrap();
        assert_eq!(hits[0].content.chars().count(), 1_000);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .upsert_page(&page("https://a.com/first", "One", "widget"))
            .unwrap();
        storage
            .upsert_page(&page("https://a.com/second", "Two", "widget"))
            .unwrap();

        let hits = search_pages(&storage, "t1", "widget", DEFAULT_SEARCH_LIMIT).unwrap();
        assert_eq!(hits[0].url, "https://a.com/first");
        assert_eq!(hits[1].url, "https://a.com/second");
    }
}
