use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::crawler::CrawlResult;

/// Serializes `results` as indented JSON (`{"domain": ["url", ...]}`).
pub fn to_json(results: &CrawlResult) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    results
        .serialize(&mut serializer)
        .context("Failed to serialize crawl results")?;
    buf.push(b'\n');
    Ok(buf)
}

/// Writes the results to `path`. Readers see either the old file or the complete new one.
pub fn write_results(path: &Path, results: &CrawlResult) -> Result<()> {
    let json = to_json(results)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
    tmp.write_all(&json)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("Failed to move results into {:?}", path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CrawlResult {
        let mut results = CrawlResult::new();
        results.insert(
            "shop.test".to_string(),
            vec![
                "https://shop.test/item/1".to_string(),
                "https://shop.test/item/2".to_string(),
            ],
        );
        results.insert("empty.test".to_string(), vec![]);
        results
    }

    #[test]
    fn test_json_uses_domains_as_fields() -> Result<()> {
        let json = to_json(&sample())?;
        let parsed: serde_json::Value = serde_json::from_slice(&json)?;
        assert_eq!(parsed["shop.test"][1], "https://shop.test/item/2");
        assert_eq!(parsed["empty.test"], serde_json::json!([]));
        assert!(String::from_utf8(json)?.contains("\n    \"empty.test\""));
        Ok(())
    }

    #[test]
    fn test_write_results_replaces_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("product_urls.json");

        std::fs::create_dir_all(path.parent().unwrap())?;
        std::fs::write(&path, "stale")?;

        write_results(&path, &sample())?;

        let written: CrawlResult = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(written, sample());
        // only the final file is left behind
        assert_eq!(std::fs::read_dir(path.parent().unwrap())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_write_results_creates_parent_dirs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("a").join("b").join("out.json");
        write_results(&path, &CrawlResult::new())?;
        assert_eq!(std::fs::read_to_string(&path)?.trim(), "{}");
        Ok(())
    }
}
