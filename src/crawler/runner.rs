use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use anyhow::{Context, Result};
use log2::*;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::classify::{is_in_domain, is_product_url, is_web_url};
use super::config::{CrawlerConfig, CrawlerConfigRef};
use super::scrape::{extract_links, HttpFetcher, PageSource};
use super::state::CrawlerState;

/// Product urls found per domain, keyed by the domain as given by the caller
pub type CrawlResult = BTreeMap<String, Vec<String>>;

/// Outcome of crawling one domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCrawl {
    pub domain: String,
    /// Sorted, without duplicates
    pub product_urls: Vec<String>,
    pub pages_visited: usize,
    pub pages_failed: usize,
}

/// Crawls every page of `domain` reachable from its homepage and collects product urls.
///
/// Runs until the frontier is empty. Pages that fail to load are logged and skipped.
pub async fn crawl_domain<S>(domain: &str, source: &S, config: &CrawlerConfig) -> DomainCrawl
where
    S: PageSource + ?Sized,
{
    info!("Starting crawl for {}", domain);

    let mut state = CrawlerState::new(config.seed_url(domain));
    let mut product_urls = BTreeSet::new();
    let mut pages_failed = 0;

    while let Some(url) = state.pop_next() {
        if state.is_visited(&url) {
            continue;
        }
        state.mark_visited(&url);

        debug!("{}: crawling {} ({} pending)", domain, url, state.pending_count());

        let page = source.fetch(&url).await;
        let links = match page.and_then(|html| extract_links(&url, &html)) {
            Ok(links) => links,
            Err(e) => {
                warn!("{}: failed to fetch {}: {}", domain, url, e);
                pages_failed += 1;
                continue;
            }
        };

        for link in links {
            if is_web_url(&link) && is_in_domain(&link, domain) && !state.is_visited(&link) {
                state.offer(&link);
            }
            if is_product_url(&link) {
                product_urls.insert(link);
            }
        }
    }

    let crawl = DomainCrawl {
        domain: domain.to_string(),
        product_urls: product_urls.into_iter().collect(),
        pages_visited: state.visited_count(),
        pages_failed,
    };

    info!(
        "Finished crawl for {}: {} pages visited, {} failed, {} product urls",
        domain,
        crawl.pages_visited,
        crawl.pages_failed,
        crawl.product_urls.len()
    );

    crawl
}

/// Crawls all `domains` with at most `config.worker_count` domains in flight.
///
/// The result holds exactly one entry per distinct domain. A domain whose crawl
/// panics keeps an empty entry; the other domains are unaffected.
pub async fn crawl_all<S>(domains: &[String], source: Arc<S>, config: CrawlerConfigRef) -> CrawlResult
where
    S: PageSource + 'static,
{
    let mut pending = VecDeque::new();
    let mut results = CrawlResult::new();
    for domain in domains {
        if results.insert(domain.clone(), Vec::new()).is_none() {
            pending.push_back(domain.clone());
        }
    }

    let worker_count = config.worker_count.max(1).min(pending.len());
    let pending = Arc::new(Mutex::new(pending));
    let results = Arc::new(RwLock::new(results));
    let mut handles: Vec<JoinHandle<()>> = Vec::new();

    for worker_id in 0..worker_count {
        let pending = Arc::clone(&pending);
        let results = Arc::clone(&results);
        let source = Arc::clone(&source);
        let config = Arc::clone(&config);

        let handle = tokio::spawn(async move {
            debug!("Worker {} started", worker_id);

            loop {
                let next_domain = {
                    let mut pending = pending.lock().await;
                    pending.pop_front()
                };
                let Some(domain) = next_domain else {
                    break;
                };

                // Separate task so a panic stays inside this domain's crawl
                let crawl = {
                    let source = Arc::clone(&source);
                    let config = Arc::clone(&config);
                    let domain = domain.clone();
                    tokio::spawn(async move { crawl_domain(&domain, source.as_ref(), &config).await })
                };

                match crawl.await {
                    Ok(crawl) => {
                        let mut results = results.write().await;
                        results.insert(domain, crawl.product_urls);
                    }
                    Err(e) => {
                        error!("Worker {}: crawl of {} aborted: {}", worker_id, domain, e);
                    }
                }
            }

            debug!("Worker {} finished", worker_id);
        });

        handles.push(handle);
    }

    for handle in handles {
        if let Err(e) = handle.await {
            error!("Worker stopped unexpectedly: {}", e);
        }
    }

    results.read().await.clone()
}

/// [`crawl_all`] over the network with an [`HttpFetcher`] built from `config`.
pub async fn crawl_all_http(domains: &[String], config: CrawlerConfigRef) -> Result<CrawlResult> {
    let fetcher = HttpFetcher::new(&config).context("Failed to build http client")?;
    Ok(crawl_all(domains, Arc::new(fetcher), config).await)
}
