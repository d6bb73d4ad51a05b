use std::sync::Arc;
use product_scout::crawler::{self, CrawlerConfig};
use product_scout::output;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn domain_of(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

async fn shop_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"
            <a href="/item/1">One</a>
            <a href="/about">About</a>
        "#))
        .mount(&server)
        .await;
    Mock::given(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"
            <a href="/item/2">Two</a>
            <a href="https://other.test/item/9">Elsewhere</a>
            <a href="/">Home</a>
        "#))
        .mount(&server)
        .await;
    Mock::given(path("/item/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/about">About</a>"#))
        .mount(&server)
        .await;
    Mock::given(path("/item/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_crawl_and_save() -> Result<(), Box<dyn std::error::Error>> {
    let shop = shop_server().await;
    let broken = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;

    let shop_domain = domain_of(&shop);
    let broken_domain = domain_of(&broken);

    let config = Arc::new(
        CrawlerConfig::new()
            .with_seed_scheme("http")
            .with_worker_count(2)
            .with_request_timeout(2),
    );

    let results = crawler::crawl_all_http(&[broken_domain.clone(), shop_domain.clone()], config).await?;

    assert_eq!(results.len(), 2);
    assert!(results[&broken_domain].is_empty());
    assert_eq!(
        results[&shop_domain],
        vec![
            format!("{}/item/1", shop.uri()),
            format!("{}/item/2", shop.uri()),
            "https://other.test/item/9".to_string(),
        ]
    );

    let dir = tempfile::tempdir()?;
    let out = dir.path().join("product_urls.json");
    output::write_results(&out, &results)?;

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    assert_eq!(saved[&shop_domain].as_array().map(Vec::len), Some(3));
    assert_eq!(saved[&broken_domain], serde_json::json!([]));

    Ok(())
}

#[tokio::test]
async fn test_unreachable_domain_still_reported() -> Result<(), Box<dyn std::error::Error>> {
    // nothing listens on port 9 of localhost
    let config = Arc::new(
        CrawlerConfig::new()
            .with_seed_scheme("http")
            .with_request_timeout(1),
    );

    let results = crawler::crawl_all_http(&["127.0.0.1:9".to_string()], config).await?;
    assert_eq!(results.get("127.0.0.1:9"), Some(&Vec::new()));
    Ok(())
}
