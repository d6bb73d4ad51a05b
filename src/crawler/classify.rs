use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// `/product/`, `/item/` or `/p/` followed by a token of word characters and hyphens
static PRODUCT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(product|item|p)/[\w-]+").expect("product pattern is valid"));

/// Returns true if the url looks like a product detail page.
///
/// The whole url string is searched, so a match inside a query string counts too.
pub fn is_product_url(url: &str) -> bool {
    PRODUCT_PATTERN.is_match(url)
}

/// Returns true if `domain` appears anywhere in `url`.
///
/// This is a substring test, not host matching: subdomains pass, and so does a
/// url that only mentions the domain in its query string.
pub fn is_in_domain(url: &str, domain: &str) -> bool {
    url.contains(domain)
}

/// Returns true for http(s) urls, the only ones the crawler fetches.
pub fn is_web_url(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}
