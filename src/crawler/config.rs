use std::sync::Arc;

/// Default timeout for page requests in seconds
pub const PAGE_REQUEST_TIMEOUT_SEC: u64 = 10;
/// Default number of domains crawled at the same time
pub const DEFAULT_WORKER_COUNT: usize = 10;
/// Identifier sent in the `User-Agent` header
pub const DEFAULT_USER_AGENT: &str =
    concat!("product-scout/", env!("CARGO_PKG_VERSION"), " (product page discovery)");

/// Configuration for the crawler
pub struct CrawlerConfig {
    /// Maximum number of domains crawled concurrently
    pub worker_count: usize,
    pub request_timeout_sec: u64,
    pub user_agent: String,
    /// Scheme used to build the seed url `{seed_scheme}://{domain}`
    pub seed_scheme: String,
}

impl CrawlerConfig {
    pub fn new() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            request_timeout_sec: PAGE_REQUEST_TIMEOUT_SEC,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            seed_scheme: "https".to_string(),
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_request_timeout(mut self, timeout_sec: u64) -> Self {
        self.request_timeout_sec = timeout_sec;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_seed_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.seed_scheme = scheme.into();
        self
    }

    /// Homepage url the crawl of `domain` starts from
    pub fn seed_url(&self, domain: &str) -> String {
        format!("{}://{}", self.seed_scheme, domain)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub type CrawlerConfigRef = Arc<CrawlerConfig>;
