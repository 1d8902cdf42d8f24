use crate::common::{html, mount_page, page, test_config, StaticExtractor};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use sumi_harvest::collab::MemoryCache;
use sumi_harvest::config::{CrawlMode, CrawlerMode};
use sumi_harvest::{ConfigError, DocumentPipeline, HarvestError, ProgressStatus};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_empty_seed_list_fails_before_fetching() {
    let result = DocumentPipeline::new(test_config(vec![" ".to_string()]));
    assert!(matches!(
        result,
        Err(HarvestError::Config(ConfigError::Validation(_)))
    ));
}

#[tokio::test]
async fn test_urls_only_skips_page_fetches() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/a",
        page("Section A", r#"<a href="/a/b">B</a> <a href="/a/c">C</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a/b"))
        .respond_with(html(page("B", "")))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(vec![format!("{}/a", base)]);
    config.crawl.max_depth = 1;
    config.crawl.return_only_urls = true;

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let docs = DocumentPipeline::new(config)
        .unwrap()
        .on_progress(move |p| sink.lock().unwrap().push(p.status))
        .run()
        .await
        .unwrap();

    assert_eq!(docs.len(), 3);
    assert!(docs.iter().all(|d| d.content.is_empty() && d.html.is_none()));
    assert_eq!(events.lock().unwrap().last(), Some(&ProgressStatus::Completed));
}

#[tokio::test]
async fn test_fast_mode_reuses_crawled_html() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(page("Section A", r#"<a href="/a/b">B</a>"#)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a/b"))
        .respond_with(html(page("Page B", "")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(vec![format!("{}/a", base)]);
    config.crawl.max_depth = 1;
    config.crawl.crawler_mode = CrawlerMode::Fast;

    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();

    assert_eq!(docs.len(), 2);
    assert!(docs[0].content.starts_with("# Section A"));
    assert!(docs[1].content.starts_with("# Page B"));
}

#[tokio::test]
async fn test_image_paths_rewritten_to_absolute() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/grants",
        page(
            "Grants",
            r#"<p><img src="/img/logo.png" alt="logo"> <a href="/about">About</a></p>"#,
        ),
    )
    .await;

    let mut config = test_config(vec![format!("{}/grants", base)]);
    config.crawl.mode = CrawlMode::SingleUrls;

    let docs = DocumentPipeline::new(config.clone())
        .unwrap()
        .run()
        .await
        .unwrap();
    assert!(docs[0]
        .content
        .contains(&format!("![logo]({}/img/logo.png)", base)));
    assert!(docs[0].content.contains("[About](/about)"));
    assert_eq!(docs[0].content, docs[0].markdown);

    config.crawl.replace_all_paths = true;
    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();
    assert!(docs[0].content.contains(&format!("[About]({}/about)", base)));
}

#[tokio::test]
async fn test_binary_links_use_extractor() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(vec![format!("{}/report.pdf", base)]);
    config.crawl.mode = CrawlMode::SingleUrls;

    let docs = DocumentPipeline::new(config)
        .unwrap()
        .with_extractor(Arc::new(StaticExtractor("Annual report")))
        .run()
        .await
        .unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].content, "Annual report");
    assert_eq!(docs[0].html.as_deref(), Some(""));
    assert_eq!(docs[0].source_url(), format!("{}/report.pdf", base));
}

#[tokio::test]
async fn test_failed_pages_become_empty_documents() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/ok", page("Fine", "")).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = test_config(vec![format!("{}/ok", base), format!("{}/broken", base)]);
    config.crawl.mode = CrawlMode::SingleUrls;

    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();

    assert_eq!(docs.len(), 2);
    assert!(!docs[0].is_empty());
    assert!(docs[1].is_empty());
    assert_eq!(docs[1].source_url(), format!("{}/broken", base));
}

#[tokio::test]
async fn test_cache_prevents_second_fetch() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(page("Cached", "")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(vec![format!("{}/a", base)]);
    config.crawl.mode = CrawlMode::SingleUrls;

    let cache = Arc::new(MemoryCache::new(NonZeroUsize::new(8).unwrap()));
    let pipeline = DocumentPipeline::new(config).unwrap().with_cache(cache.clone());

    let first = pipeline.run().await.unwrap();
    let second = pipeline.run().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_sitemap_hints_attached() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/a", page("Section A", "")).await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    "<?xml version=\"1.0\"?><urlset><url><loc>{}/a</loc><changefreq>daily</changefreq><priority>0.9</priority></url></urlset>",
                    base
                ))
                .insert_header("content-type", "application/xml"),
        )
        .mount(&server)
        .await;

    let mut config = test_config(vec![format!("{}/a", base)]);
    config.crawl.mode = CrawlMode::SingleUrls;
    config.crawl.sitemap_hints = true;

    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();
    let hints = docs[0].metadata.sitemap.as_ref().unwrap();

    assert_eq!(hints.changefreq.as_deref(), Some("daily"));
    assert_eq!(hints.priority, Some(0.9));
}

#[tokio::test]
async fn test_progress_reported_per_document() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/a", page("A", "")).await;
    mount_page(&server, "/b", page("B", "")).await;

    let mut config = test_config(vec![format!("{}/a", base), format!("{}/b", base)]);
    config.crawl.mode = CrawlMode::SingleUrls;

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let docs = DocumentPipeline::new(config)
        .unwrap()
        .on_progress(move |p| {
            sink.lock()
                .unwrap()
                .push((p.status, p.current, p.total, p.current_document.is_some()))
        })
        .run()
        .await
        .unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            (ProgressStatus::Scraping, 1, 2, true),
            (ProgressStatus::Scraping, 2, 2, true),
        ]
    );
}

#[tokio::test]
async fn test_redirected_page_keeps_seed_as_source_url() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", format!("{}/new", base).as_str()))
        .mount(&server)
        .await;
    mount_page(&server, "/new", page("Moved", "")).await;

    let mut config = test_config(vec![format!("{}/old", base)]);
    config.crawl.mode = CrawlMode::SingleUrls;

    let docs = DocumentPipeline::new(config).unwrap().run().await.unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].source_url(), format!("{}/old", base));
    assert!(docs[0].content.starts_with("# Moved"));
}
