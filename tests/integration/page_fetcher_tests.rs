use crate::common::{html, page, StaticExtractor};
use reqwest::Client;
use std::sync::Arc;
use sumi_harvest::collab::{BinaryExtractor, UnsupportedExtractor};
use sumi_harvest::config::{FetchConfig, HostOverride, PageOptions, StrategyKind, UserAgentConfig};
use sumi_harvest::scrape::{PageFetcher, StrategyChain};
use sumi_harvest::HarvestError;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer, extractor: Arc<dyn BinaryExtractor>) -> PageFetcher {
    let fetch = FetchConfig {
        render_service_url: Some(format!("{}/", server.uri())),
        ..FetchConfig::default()
    };
    let chain = StrategyChain::new(Client::new(), &fetch, &UserAgentConfig::default());
    PageFetcher::new(chain, extractor, 100)
}

#[tokio::test]
async fn test_existing_html_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, Arc::new(UnsupportedExtractor));
    let existing = page(
        "Existing",
        &"<p>Eligibility criteria and deadlines for each call.</p>".repeat(8),
    );
    assert!(existing.len() >= 500);

    let url = format!("{}/grants", server.uri());
    let doc = fetcher
        .scrape(&url, &PageOptions::default(), Some(&existing))
        .await
        .unwrap();

    assert!(doc.content.contains("# Existing"));
    assert!(doc.content.contains("Programme information for applicants"));
    assert!(doc.content.contains("Eligibility criteria and deadlines"));
    assert_eq!(doc.metadata.title.as_deref(), Some("Existing"));
    assert_eq!(doc.source_url(), url);
}

#[tokio::test]
async fn test_all_strategies_empty_yields_empty_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "content": "" })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(html(String::new()))
        .expect(2)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, Arc::new(UnsupportedExtractor));
    let url = format!("{}/empty", server.uri());

    let err = fetcher
        .scrape(&url, &PageOptions::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::ScrapeExhausted { .. }));

    let doc = fetcher
        .scrape_single_url(&url, &PageOptions::default(), None)
        .await;
    assert_eq!(doc.content, "");
    assert_eq!(doc.markdown, "");
    assert_eq!(doc.source_url(), url);
}

#[tokio::test]
async fn test_falls_back_from_render_service_to_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/grants"))
        .respond_with(html(page("Grants", "")))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, Arc::new(UnsupportedExtractor));
    let options = PageOptions {
        only_main_content: false,
        include_html: true,
    };
    let doc = fetcher
        .scrape(&format!("{}/grants", server.uri()), &options, None)
        .await
        .unwrap();

    assert!(doc.content.starts_with("# Grants"));
    assert!(doc.html.as_deref().unwrap_or("").contains("<title>Grants</title>"));
}

#[tokio::test]
async fn test_render_service_receives_override_wait() {
    let server = MockServer::start().await;
    let rendered = page("Rendered", "");
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(body_partial_json(serde_json::json!({ "wait": 2500 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "content": rendered })))
        .expect(1)
        .mount(&server)
        .await;

    let fetch = FetchConfig {
        render_service_url: Some(server.uri()),
        host_overrides: vec![HostOverride {
            host: "127.0.0.1".to_string(),
            strategy: Some(StrategyKind::RenderService),
            wait_ms: 2500,
        }],
        ..FetchConfig::default()
    };
    let chain = StrategyChain::new(Client::new(), &fetch, &UserAgentConfig::default());
    let fetcher = PageFetcher::new(chain, Arc::new(UnsupportedExtractor), 100);

    let doc = fetcher
        .scrape(&format!("{}/dynamic", server.uri()), &PageOptions::default(), None)
        .await
        .unwrap();
    assert!(doc.content.starts_with("# Rendered"));
}

#[tokio::test]
async fn test_pdf_content_type_routed_to_extractor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, Arc::new(StaticExtractor("Annual report text")));
    let doc = fetcher
        .scrape(&format!("{}/download", server.uri()), &PageOptions::default(), None)
        .await
        .unwrap();

    assert_eq!(doc.content, "Annual report text");
    assert_eq!(doc.markdown, doc.content);
}

#[tokio::test]
async fn test_redirect_keeps_requested_source_url() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", format!("{}/new", base).as_str()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html(page("Moved", "")))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, Arc::new(UnsupportedExtractor));
    let requested = format!("{}/old", base);
    let doc = fetcher
        .scrape(&requested, &PageOptions::default(), None)
        .await
        .unwrap();

    assert!(doc.content.starts_with("# Moved"));
    assert_eq!(doc.source_url(), requested);
}
