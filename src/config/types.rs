use serde::Deserialize;

/// Main configuration structure for Sumi-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub page: PageOptions,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Configuration with default page, user-agent, fetch and output sections
    pub fn with_crawl(crawl: CrawlConfig) -> Self {
        Self {
            crawl,
            page: PageOptions::default(),
            user_agent: UserAgentConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// How seed URLs are turned into documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum CrawlMode {
    /// Scrape exactly the seed URLs
    #[serde(rename = "single_urls")]
    SingleUrls,
    /// Discover pages reachable from the seeds
    #[default]
    #[serde(rename = "crawl")]
    Crawl,
}

/// Whether discovered HTML is reused when building documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlerMode {
    /// Re-fetch every discovered page through the strategy chain
    #[default]
    Default,
    /// Reuse HTML captured during link discovery
    Fast,
}

/// Crawl run configuration, immutable for the duration of one run
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URLs the run starts from
    pub seeds: Vec<String>,

    #[serde(default)]
    pub mode: CrawlMode,

    /// Width of the frontier work queue and of scrape batches
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Regular expressions matched against the URL path; one must match
    #[serde(default)]
    pub includes: Vec<String>,

    /// Regular expressions matched against the URL path; none may match
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Upper bound on crawled links and emitted documents
    #[serde(rename = "max-total-links", default = "default_max_total_links")]
    pub max_total_links: usize,

    /// Number of frontier layers and maximum path depth below a seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: usize,

    /// Return metadata-only documents without fetching content
    #[serde(rename = "return-only-urls", default)]
    pub return_only_urls: bool,

    /// Rewrite every relative link target, not only images
    #[serde(rename = "replace-all-paths", default)]
    pub replace_all_paths: bool,

    #[serde(rename = "crawler-mode", default)]
    pub crawler_mode: CrawlerMode,

    /// Upper bound of the random delay before each fetch (milliseconds)
    #[serde(rename = "jitter-ms", default = "default_jitter_ms")]
    pub jitter_ms: u64,

    /// Attach changefreq/priority/lastmod from the site's sitemap.xml
    #[serde(rename = "sitemap-hints", default)]
    pub sitemap_hints: bool,
}

impl CrawlConfig {
    /// Creates a crawl configuration with default limits for the given seeds
    pub fn with_seeds(seeds: Vec<String>) -> Self {
        Self {
            seeds,
            mode: CrawlMode::default(),
            concurrency: default_concurrency(),
            includes: Vec::new(),
            excludes: Vec::new(),
            max_total_links: default_max_total_links(),
            max_depth: default_max_depth(),
            return_only_urls: false,
            replace_all_paths: false,
            crawler_mode: CrawlerMode::default(),
            jitter_ms: default_jitter_ms(),
            sitemap_hints: false,
        }
    }

    /// Seeds trimmed and prefixed with `https://` when they carry no scheme
    pub fn seed_urls(&self) -> Vec<String> {
        self.seeds
            .iter()
            .filter(|seed| !seed.trim().is_empty())
            .map(|seed| crate::url::ensure_scheme(seed))
            .collect()
    }
}

/// Options applied when a single page is turned into a document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageOptions {
    /// Strip navigation, footers, sidebars and similar boilerplate
    #[serde(rename = "only-main-content", default)]
    pub only_main_content: bool,

    /// Keep the raw HTML on the emitted document
    #[serde(rename = "include-html", default)]
    pub include_html: bool,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also used as the robots.txt agent
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Value of the `X-Scraped-By` header on plain HTTP fetches
    #[serde(rename = "scraped-by", default = "default_scraped_by")]
    pub scraped_by: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            scraped_by: default_scraped_by(),
        }
    }
}

/// Fetch strategy names usable in host overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Headless rendering service reached over HTTP
    RenderService,
    /// Plain HTTP GET
    Http,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RenderService => write!(f, "render-service"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Promotes one strategy to the front of the chain for a host
#[derive(Debug, Clone, Deserialize)]
pub struct HostOverride {
    /// Host name; a leading `www.` is ignored
    pub host: String,

    /// Strategy tried first for this host
    #[serde(default)]
    pub strategy: Option<StrategyKind>,

    /// Wait passed to the render service (milliseconds)
    #[serde(rename = "wait-ms", default)]
    pub wait_ms: u64,
}

/// Fetch strategy chain configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Base URL of the rendering service; absent removes the strategy
    #[serde(rename = "render-service-url", default)]
    pub render_service_url: Option<String>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Minimum trimmed length of usable normalized content
    #[serde(rename = "min-content-length", default = "default_min_content_length")]
    pub min_content_length: usize,

    #[serde(rename = "host-overrides", default)]
    pub host_overrides: Vec<HostOverride>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            render_service_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            min_content_length: default_min_content_length(),
            host_overrides: Vec::new(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the emitted documents are written to
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_concurrency() -> usize {
    20
}

fn default_max_total_links() -> usize {
    50_000
}

fn default_max_depth() -> usize {
    15
}

fn default_jitter_ms() -> u64 {
    2_000
}

fn default_scraped_by() -> String {
    "SUMI-HARVEST".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_min_content_length() -> usize {
    100
}

fn default_output_directory() -> String {
    "./harvest".to_string()
}
