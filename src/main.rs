use log2::*;
use anyhow::Result;
use product_scout::{config, crawler, output};
use std::sync::Arc;
use std::time::Instant;

/// Indicates start time of a project, lazily initialized
pub static START_TIME: once_cell::sync::Lazy<Instant> = once_cell::sync::Lazy::new(Instant::now);

#[tokio::main]
async fn main() -> Result<()> {
    let _ = *START_TIME;
    let cfg = config::Config::new();
    cfg.validate()?;
    let _log2 = stdout()
        .module(true) // include module name
        .module_with_line(true) // include line number from module
        .module_filter(|module| module.starts_with("product_scout"))
        .compress(false)
        .level(cfg.log_level.to_string())
        .start();

    let domains = cfg.load_domains()?;
    if domains.is_empty() {
        anyhow::bail!("domain list is empty");
    }

    let crawler_config = Arc::new(cfg.crawler_config());
    info!("Crawling {} domains with {} workers", domains.len(), crawler_config.worker_count);

    let results = crawler::crawl_all_http(&domains, crawler_config).await?;

    output::write_results(&cfg.output_file, &results)?;

    let total: usize = results.values().map(Vec::len).sum();
    info!(
        "Saved {} product urls from {} domains to {:?} in {:.1?}",
        total,
        results.len(),
        cfg.output_file,
        START_TIME.elapsed()
    );

    Ok(())
}
