use crate::common::{mount_page, page, test_config};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use sumi_harvest::collab::UnsupportedExtractor;
use sumi_harvest::crawler::Frontier;
use sumi_harvest::robots::PolitenessPolicy;
use sumi_harvest::scrape::PageFetcher;
use sumi_harvest::url::LinkFilter;
use sumi_harvest::DocumentPipeline;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn links(hrefs: &[&str]) -> String {
    hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a> "#, href, href))
        .collect()
}

#[tokio::test]
async fn test_crawl_stays_on_origin_and_depth() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/a",
        page("Section A", &links(&["/a/b", "/a/c", "https://other.org/x"])),
    )
    .await;
    mount_page(&server, "/a/b", page("Page B", &links(&["/a/b/deeper"]))).await;
    mount_page(&server, "/a/c", page("Page C", "")).await;

    let mut config = test_config(vec![format!("{}/a", base)]);
    config.crawl.max_depth = 1;

    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();

    let urls: HashSet<String> = docs.iter().map(|d| d.source_url().to_string()).collect();
    let expected: HashSet<String> = ["/a", "/a/b", "/a/c"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();
    assert_eq!(urls, expected);
    assert_eq!(docs.len(), 3);
    assert!(docs.iter().all(|d| !d.content.is_empty()));
}

#[tokio::test]
async fn test_link_cap_with_two_seeds() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/a", page("Section A", &links(&["/a/one"]))).await;
    mount_page(&server, "/b", page("Section B", &links(&["/b/one"]))).await;

    let mut config = test_config(vec![format!("{}/a", base), format!("{}/b", base)]);
    config.crawl.max_total_links = 1;
    config.crawl.concurrency = 1;

    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source_url(), format!("{}/a", base));
}

#[tokio::test]
async fn test_robots_disallow_respected() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /a/private\n"),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/a",
        page("Section A", &links(&["/a/private", "/a/public"])),
    )
    .await;
    mount_page(&server, "/a/public", page("Public", "")).await;
    Mock::given(method("GET"))
        .and(path("/a/private"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(vec![format!("{}/a", base)]);
    config.crawl.max_depth = 2;

    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();
    let urls: Vec<&str> = docs.iter().map(|d| d.source_url()).collect();

    assert!(urls.contains(&format!("{}/a/public", base).as_str()));
    assert!(!urls.iter().any(|u| u.ends_with("/a/private")));
}

#[tokio::test]
async fn test_excludes_and_includes_filter_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        page(
            "Home",
            &links(&["/guides/x", "/grants/open", "/about", "/grants/file.zip", "/grants/open#apply"]),
        ),
    )
    .await;
    mount_page(&server, "/grants/open", page("Open grants", "")).await;

    let mut config = test_config(vec![format!("{}/", base)]);
    config.crawl.max_depth = 2;
    config.crawl.excludes = vec![".*guide.*".to_string()];
    config.crawl.includes = vec![".*grants.*".to_string()];
    config.crawl.return_only_urls = true;

    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();
    let urls: Vec<&str> = docs.iter().map(|d| d.source_url()).collect();

    assert_eq!(
        urls,
        vec![format!("{}/", base).as_str(), format!("{}/grants/open", base).as_str()]
    );
}

#[tokio::test]
async fn test_frontier_records_placeholders_and_html() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/a", page("Section A", &links(&["/a/b", "/a/b"]))).await;

    let mut config = test_config(vec![format!("{}/a", base)]);
    config.crawl.max_depth = 1;

    let client = Client::new();
    let fetcher = PageFetcher::from_config(client.clone(), &config, Arc::new(UnsupportedExtractor));
    let frontier = Frontier::new(
        client,
        fetcher,
        LinkFilter::new(&config.crawl).unwrap(),
        PolitenessPolicy::allow_all("TestBot"),
        &config.crawl,
        "SUMI-HARVEST",
    );

    let pages = frontier.run(None).await;

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].url, format!("{}/a", base));
    assert!(pages[0].html.contains("<title>Section A</title>"));
    assert_eq!(pages[1].url, format!("{}/a/b", base));
    assert_eq!(pages[1].html, "");
}

#[tokio::test]
async fn test_zero_depth_falls_back_to_seed_placeholder() {
    let server = MockServer::start().await;
    let base = server.uri();

    let mut config = test_config(vec![format!("{}/a", base)]);
    config.crawl.max_depth = 0;
    config.crawl.return_only_urls = true;

    let docs = DocumentPipeline::new(config.clone()).unwrap().run().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source_url(), format!("{}/a", base));

    config.crawl.excludes = vec!["^/a$".to_string()];
    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();
    assert!(docs.is_empty());
}
