use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::crawler::{CrawlerConfig, DEFAULT_WORKER_COUNT, PAGE_REQUEST_TIMEOUT_SEC};
use crate::crawler::config::DEFAULT_USER_AGENT;

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// All program arguments. [`CrawlerConfig`] is derived from it and
/// describes only the crawler.
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about = "Finds product pages on e-commerce domains", long_about = None)]
pub struct Config {
    /// Domains to crawl, e.g. `example.com`
    pub domains: Vec<String>,
    /// File with one domain per line (`#` starts a comment)
    #[arg(short, long)]
    pub domains_file: Option<PathBuf>,
    /// Where the JSON results are written
    #[arg(short, long, default_value = "product_urls.json")]
    pub output_file: PathBuf,
    /// Number of domains crawled concurrently
    #[arg(short, long, default_value_t = DEFAULT_WORKER_COUNT)]
    pub worker_count: usize,
    /// Timeout of a single page request in seconds
    #[arg(long, default_value_t = PAGE_REQUEST_TIMEOUT_SEC)]
    pub request_timeout: u64,
    /// Value of the User-Agent header
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    /// Domains from the command line followed by those from `domains_file`,
    /// without duplicates.
    pub fn load_domains(&self) -> anyhow::Result<Vec<String>> {
        let mut domains = Vec::new();
        let from_file = match &self.domains_file {
            Some(path) => read_domains_file(path)?,
            None => Vec::new(),
        };

        for domain in self.domains.iter().cloned().chain(from_file) {
            let domain = domain.trim().to_string();
            if !domain.is_empty() && !domains.contains(&domain) {
                domains.push(domain);
            }
        }

        Ok(domains)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.domains.is_empty() && self.domains_file.is_none() {
            anyhow::bail!("no domains given, pass them as arguments or with --domains-file");
        }
        if self.worker_count == 0 {
            anyhow::bail!("worker_count must be greater than 0");
        }
        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }
        Ok(())
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig::new()
            .with_worker_count(self.worker_count)
            .with_request_timeout(self.request_timeout)
            .with_user_agent(self.user_agent.clone())
    }
}

fn read_domains_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read domains file {:?}", path))?;

    Ok(content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}
