use sumi_harvest::collab::BinaryExtractor;
use sumi_harvest::config::{Config, CrawlConfig};
use sumi_harvest::HarvestError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML page whose body text clears the usable-content threshold
pub fn page(title: &str, extra_body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><h1>{}</h1><p>{}</p>{}</body></html>",
        title,
        title,
        "Programme information for applicants and partners. ".repeat(4),
        extra_body
    )
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Crawl configuration for tests: no jitter, small limits
pub fn test_config(seeds: Vec<String>) -> Config {
    let mut crawl = CrawlConfig::with_seeds(seeds);
    crawl.jitter_ms = 0;
    crawl.concurrency = 4;
    let mut config = Config::with_crawl(crawl);
    config.user_agent.crawler_name = "TestBot".to_string();
    config.fetch.request_timeout_secs = 5;
    config
}

/// Mounts a page at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Binary extractor returning fixed text
pub struct StaticExtractor(pub &'static str);

#[async_trait::async_trait]
impl BinaryExtractor for StaticExtractor {
    async fn extract_text(&self, _url: &str) -> Result<String, HarvestError> {
        Ok(self.0.to_string())
    }
}
