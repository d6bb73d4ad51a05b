use async_trait::async_trait;
use log2::debug;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use super::config::CrawlerConfig;
use super::error::FetchError;

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("link selector is valid"));

/// Source of page html for the crawler.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the html of `url`, or why it could not be fetched.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches pages over http with a bounded timeout.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(config.request_timeout_sec),
        })
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}

/// Resolves `href` against the page url without normalizing either.
///
/// Absolute hrefs are returned as written. Relative ones are joined to `base`
/// keeping its host spelling and leaving the path unencoded; only `.` and `..`
/// segments are removed.
pub fn resolve_link(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }

    let (scheme, rest) = base.split_once("://")?;
    let base = base.split('#').next().unwrap_or(base);
    let without_query = base.split('?').next().unwrap_or(base);
    let authority_len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let origin = &base[..scheme.len() + "://".len() + authority_len];
    let base_path = &without_query[origin.len()..];

    let resolved = if href.starts_with("//") {
        format!("{}:{}", scheme, href)
    } else if href.starts_with('/') {
        format!("{}{}", origin, join_path("/", href))
    } else if href.starts_with('?') {
        format!("{}{}", without_query, href)
    } else if href.starts_with('#') {
        format!("{}{}", base, href)
    } else if href.is_empty() {
        base.to_string()
    } else {
        let dir = match base_path.rfind('/') {
            Some(i) => &base_path[..=i],
            None => "/",
        };
        format!("{}{}", origin, join_path(dir, href))
    };

    Some(resolved)
}

/// Appends `href` to the directory `dir` and removes dot segments from the path part.
fn join_path(dir: &str, href: &str) -> String {
    let (path, tail) = match href.find(['?', '#']) {
        Some(i) => href.split_at(i),
        None => (href, ""),
    };
    let full = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{}{}", dir, path)
    };

    let segments: Vec<&str> = full.split('/').skip(1).collect();
    let mut out: Vec<&str> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        match *segment {
            "." => {
                if last {
                    out.push("");
                }
            }
            ".." => {
                out.pop();
                if last {
                    out.push("");
                }
            }
            other => out.push(other),
        }
    }

    format!("/{}{}", out.join("/"), tail)
}

/// Collects every `<a href>` of the page as an absolute url.
///
/// Links of any scheme are returned; callers decide which ones can be fetched.
pub fn extract_links(base_url: &str, html: &str) -> Result<Vec<String>, FetchError> {
    Url::parse(base_url)?;
    let document = Html::parse_document(html);

    let mut links = Vec::new();
    for element in document.select(&LINK_SELECTOR) {
        if let Some(href) = element.value().attr("href") {
            match resolve_link(base_url, href) {
                Some(link) => links.push(link),
                None => debug!("Skipped link {:?} on {}", href, base_url),
            }
        }
    }

    Ok(links)
}
