//! End-to-end crawl tests against a mock site

use siteindex::config::Config;
use siteindex::service::SiteIndexService;
use siteindex::storage::{open_storage, SettingsPatch, Storage};
use siteindex::{CrawlStatus, PageStatus};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestIndex {
    service: SiteIndexService,
    db_path: std::path::PathBuf,
    _dir: TempDir,
}

fn test_index() -> TestIndex {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    let mut config = Config::default();
    config.index.database_path = db_path.to_string_lossy().to_string();
    config.crawler.request_delay_ms = 0;
    config.crawler.fetch_timeout_secs = 5;

    let service = SiteIndexService::new(config).unwrap();
    TestIndex {
        service,
        db_path,
        _dir: dir,
    }
}

async fn mock_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

fn enable_crawl(index: &TestIndex, tenant: &str, start_url: &str, patch: SettingsPatch) {
    index
        .service
        .update_settings(
            tenant,
            &SettingsPatch {
                domain: Some(start_url.to_string()),
                enable_full_crawl: Some(true),
                ..patch
            },
        )
        .unwrap();
}

#[tokio::test]
async fn test_full_bfs_crawl() {
    let server = MockServer::start().await;
    mock_page(
        &server,
        "/",
        r#"<html><title>Home</title>
           <a href="/about">About</a> <a href="/docs">Docs</a></html>"#,
    )
    .await;
    mock_page(
        &server,
        "/about",
        r#"<html><title>About</title><a href="/team">Team</a></html>"#,
    )
    .await;
    mock_page(&server, "/docs", "<html><title>Docs</title></html>").await;
    mock_page(&server, "/team", "<html><title>Team</title></html>").await;

    let index = test_index();
    enable_crawl(&index, "t1", &server.uri(), SettingsPatch::default());

    let outcome = index.service.start_crawl("t1").await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.total_pages, 4);

    let report = index.service.crawl_status("t1").unwrap();
    assert_eq!(report.status, CrawlStatus::Completed);
    assert_eq!(report.total_pages_indexed, 4);
    assert!(report.last_crawl_at.is_some());

    // Depth and parent chain come straight out of the BFS
    let storage = open_storage(&index.db_path).unwrap();
    let root_url = format!("{}/", server.uri());
    let root = storage.get_page("t1", &root_url).unwrap().unwrap();
    assert_eq!(root.depth, 0);
    assert_eq!(root.parent_url, None);
    assert_eq!(root.title, "Home");

    let about = storage
        .get_page("t1", &format!("{}/about", server.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(about.depth, 1);
    assert_eq!(about.parent_url, Some(root_url.clone()));

    let team = storage
        .get_page("t1", &format!("{}/team", server.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(team.depth, 2);
    assert_eq!(
        team.parent_url,
        Some(format!("{}/about", server.uri()))
    );
}

#[tokio::test]
async fn test_page_budget_respected() {
    let server = MockServer::start().await;
    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mock_page(
        &server,
        "/",
        &format!("<html><title>Hub</title>{}</html>", links),
    )
    .await;
    for i in 0..20 {
        mock_page(
            &server,
            &format!("/p{}", i),
            &format!("<html><title>Page {}</title></html>", i),
        )
        .await;
    }

    let index = test_index();
    enable_crawl(
        &index,
        "t1",
        &server.uri(),
        SettingsPatch {
            max_pages: Some(5),
            ..Default::default()
        },
    );

    let outcome = index.service.start_crawl("t1").await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.total_pages, 5);

    let storage = open_storage(&index.db_path).unwrap();
    assert_eq!(storage.count_pages("t1").unwrap(), 5);
}

#[tokio::test]
async fn test_depth_bound() {
    let server = MockServer::start().await;
    mock_page(
        &server,
        "/",
        r#"<html><title>Root</title><a href="/a">a</a></html>"#,
    )
    .await;
    mock_page(
        &server,
        "/a",
        r#"<html><title>A</title><a href="/b">b</a></html>"#,
    )
    .await;
    mock_page(
        &server,
        "/b",
        r#"<html><title>B</title><a href="/c">c</a></html>"#,
    )
    .await;
    mock_page(&server, "/c", "<html><title>C</title></html>").await;

    let index = test_index();
    enable_crawl(
        &index,
        "t1",
        &server.uri(),
        SettingsPatch {
            max_depth: Some(1),
            ..Default::default()
        },
    );

    let outcome = index.service.start_crawl("t1").await.unwrap();
    assert_eq!(outcome.total_pages, 2);

    let storage = open_storage(&index.db_path).unwrap();
    assert!(storage
        .get_page("t1", &format!("{}/b", server.uri()))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_domain_confinement() {
    let server = MockServer::start().await;
    mock_page(
        &server,
        "/",
        r#"<html><title>Home</title>
           <a href="/local">Local</a>
           <a href="https://elsewhere.example/x">Away</a></html>"#,
    )
    .await;
    mock_page(&server, "/local", "<html><title>Local</title></html>").await;

    let index = test_index();
    enable_crawl(&index, "t1", &server.uri(), SettingsPatch::default());

    let outcome = index.service.start_crawl("t1").await.unwrap();
    assert_eq!(outcome.total_pages, 2);

    let storage = open_storage(&index.db_path).unwrap();
    let pages = storage.list_pages("t1", None).unwrap();
    assert!(pages.iter().all(|p| !p.url.contains("elsewhere.example")));
}

#[tokio::test]
async fn test_hostless_links_skipped_without_record() {
    let server = MockServer::start().await;
    mock_page(
        &server,
        "/",
        r#"<html><title>Home</title>
           <a href="data:text/plain,hello">Inline</a>
           <a href="/real">Real</a></html>"#,
    )
    .await;
    mock_page(&server, "/real", "<html><title>Real</title></html>").await;

    let index = test_index();
    enable_crawl(&index, "t1", &server.uri(), SettingsPatch::default());

    let outcome = index.service.start_crawl("t1").await.unwrap();
    assert!(outcome.success);
    // The data: link parses but has no host, so confinement drops it
    // silently; it neither counts against the budget nor leaves a record
    assert_eq!(outcome.total_pages, 2);

    let storage = open_storage(&index.db_path).unwrap();
    let pages = storage.list_pages("t1", None).unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.status == PageStatus::Crawled));
    assert!(pages.iter().all(|p| !p.url.starts_with("data:")));
}

#[tokio::test]
async fn test_exclude_patterns() {
    let server = MockServer::start().await;
    mock_page(
        &server,
        "/",
        r#"<html><title>Home</title>
           <a href="/admin/secret">Admin</a>
           <a href="/public">Public</a></html>"#,
    )
    .await;
    mock_page(&server, "/admin/secret", "<html><title>Secret</title></html>").await;
    mock_page(&server, "/public", "<html><title>Public</title></html>").await;

    let index = test_index();
    enable_crawl(
        &index,
        "t1",
        &server.uri(),
        SettingsPatch {
            exclude_patterns: Some(vec!["*/admin/*".to_string()]),
            ..Default::default()
        },
    );

    let outcome = index.service.start_crawl("t1").await.unwrap();
    assert_eq!(outcome.total_pages, 2);

    let storage = open_storage(&index.db_path).unwrap();
    assert!(storage
        .get_page("t1", &format!("{}/admin/secret", server.uri()))
        .unwrap()
        .is_none());
    assert!(storage
        .get_page("t1", &format!("{}/public", server.uri()))
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_error_pages_recorded_without_link_expansion() {
    let server = MockServer::start().await;
    mock_page(
        &server,
        "/",
        r#"<html><title>Home</title><a href="/broken">Broken</a></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string(r#"<html><a href="/hidden">hidden</a></html>"#),
        )
        .mount(&server)
        .await;
    mock_page(&server, "/hidden", "<html><title>Hidden</title></html>").await;

    let index = test_index();
    enable_crawl(&index, "t1", &server.uri(), SettingsPatch::default());

    let outcome = index.service.start_crawl("t1").await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.total_pages, 2);

    let storage = open_storage(&index.db_path).unwrap();
    let broken = storage
        .get_page("t1", &format!("{}/broken", server.uri()))
        .unwrap()
        .unwrap();
    assert_eq!(broken.status, PageStatus::Error);
    assert_eq!(broken.title, "Error");
    assert_eq!(
        broken.error,
        Some("HTTP 500: Internal Server Error".to_string())
    );
    assert!(broken.text_content.is_empty());

    // Failed pages never grow the frontier
    assert!(storage
        .get_page("t1", &format!("{}/hidden", server.uri()))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_recrawl_is_idempotent() {
    let server = MockServer::start().await;
    mock_page(
        &server,
        "/",
        r#"<html><title>Home</title><a href="/a">a</a></html>"#,
    )
    .await;
    mock_page(&server, "/a", "<html><title>A</title></html>").await;

    let index = test_index();
    enable_crawl(&index, "t1", &server.uri(), SettingsPatch::default());

    index.service.start_crawl("t1").await.unwrap();
    let storage = open_storage(&index.db_path).unwrap();
    let first_ids: Vec<i64> = storage
        .list_pages("t1", None)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();

    index.service.start_crawl("t1").await.unwrap();
    let second_ids: Vec<i64> = storage
        .list_pages("t1", None)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();

    // Records are overwritten in place, never duplicated
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn test_fragments_and_trailing_slashes_collapse() {
    let server = MockServer::start().await;
    mock_page(
        &server,
        "/",
        r#"<html><title>Home</title>
           <a href="/page">one</a>
           <a href="/page/">two</a>
           <a href="/page#section">three</a></html>"#,
    )
    .await;
    mock_page(&server, "/page", "<html><title>Page</title></html>").await;

    let index = test_index();
    enable_crawl(&index, "t1", &server.uri(), SettingsPatch::default());

    let outcome = index.service.start_crawl("t1").await.unwrap();
    // Three spellings of the same page crawl once
    assert_eq!(outcome.total_pages, 2);
}

#[tokio::test]
async fn test_tenants_are_isolated() {
    let server = MockServer::start().await;
    mock_page(&server, "/", "<html><title>Home</title></html>").await;

    let index = test_index();
    enable_crawl(&index, "t1", &server.uri(), SettingsPatch::default());

    index.service.start_crawl("t1").await.unwrap();

    let report = index.service.crawl_status("t2").unwrap();
    assert_eq!(report.status, CrawlStatus::Idle);
    assert_eq!(report.total_pages_indexed, 0);
    assert!(index.service.recent_pages("t2", None).unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_and_reset() {
    let server = MockServer::start().await;
    mock_page(&server, "/", "<html><title>Home</title></html>").await;

    let index = test_index();
    enable_crawl(&index, "t1", &server.uri(), SettingsPatch::default());

    index.service.start_crawl("t1").await.unwrap();
    assert_eq!(index.service.crawl_status("t1").unwrap().total_pages_indexed, 1);

    let deleted = index.service.clear_indexed_pages("t1").unwrap();
    assert_eq!(deleted, 1);

    let report = index.service.crawl_status("t1").unwrap();
    assert_eq!(report.status, CrawlStatus::Idle);
    assert_eq!(report.total_pages_indexed, 0);
    assert_eq!(report.last_crawl_at, None);

    // Settings themselves survive the clear
    let settings = index.service.get_settings("t1").unwrap();
    assert!(settings.enable_full_crawl);
    assert!(settings.domain.is_some());
}
