pub mod classify;
pub mod config;
pub mod error;
pub mod runner;
pub mod scrape;
pub mod state;


pub use classify::{is_in_domain, is_product_url, is_web_url};
pub use config::{CrawlerConfig, CrawlerConfigRef, DEFAULT_WORKER_COUNT, PAGE_REQUEST_TIMEOUT_SEC};
pub use error::FetchError;
pub use runner::{crawl_all, crawl_all_http, crawl_domain, CrawlResult, DomainCrawl};
pub use scrape::{extract_links, HttpFetcher, PageSource};
pub use state::CrawlerState;
