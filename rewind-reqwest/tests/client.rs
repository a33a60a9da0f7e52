use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use reqwest_middleware::ClientBuilder;
use rewind_backend::MemoryBackend;
use rewind_reqwest::{CacheCounters, CachingClient, ClientConfig, DEFAULT_TIMEOUT};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_default_client_records_and_replays() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CachingClient::new().unwrap();
    let url = format!("{}/users", mock_server.uri());

    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "[]");
    assert_eq!(client.get(&url).send().await.unwrap().text().await.unwrap(), "[]");

    let counters = client.counters().unwrap();
    assert_eq!(counters.requests_not_from_cache(), 1);
    assert_eq!(counters.requests_from_cache(), 1);
    assert_eq!(client.cache().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cache_is_recovered_from_client() {
    let backend = MemoryBackend::builder().respond_from_cache(false).build();
    let client = CachingClient::builder().backend(backend).build().unwrap();

    let cache = client.cache().expect("client was built with a cache");
    assert!(!cache.responds_from_cache());
    assert!(client.middleware().is_some());

    let clone = client.clone();
    assert!(Arc::ptr_eq(clone.cache().unwrap(), cache));
}

#[tokio::test]
async fn test_plain_client_has_no_cache() {
    let plain = ClientBuilder::new(reqwest::Client::new()).build();
    let client: CachingClient = CachingClient::from(plain);

    assert!(client.middleware().is_none());
    assert!(client.cache().is_none());
    assert!(client.counters().is_none());
}

#[tokio::test]
async fn test_shared_counters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let counters = Arc::new(CacheCounters::new());
    let first = CachingClient::builder()
        .counters(counters.clone())
        .build()
        .unwrap();
    let second = CachingClient::builder()
        .counters(counters.clone())
        .build()
        .unwrap();

    first.get(mock_server.uri()).send().await.unwrap();
    second.get(mock_server.uri()).send().await.unwrap();

    // Separate stores, so both went to the network.
    assert_eq!(counters.requests_not_from_cache(), 2);
    assert_eq!(counters.requests_from_cache(), 0);
}

#[tokio::test]
async fn test_timeout_surfaces_as_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = CachingClient::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let error = client
        .get(format!("{}/slow", mock_server.uri()))
        .send()
        .await
        .unwrap_err();

    assert!(
        matches!(error, reqwest_middleware::Error::Reqwest(ref e) if e.is_timeout()),
        "unexpected error: {error:?}"
    );
    assert!(client.cache().unwrap().is_empty());
    assert_eq!(client.counters().unwrap().requests_not_from_cache(), 0);
}

#[tokio::test]
async fn test_client_builder_is_used_as_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(wiremock::matchers::header("user-agent", "rewind-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("agent"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CachingClient::builder()
        .client_builder(reqwest::Client::builder().user_agent("rewind-test"))
        .build()
        .unwrap();

    let response = client.get(mock_server.uri()).send().await.unwrap();
    assert_eq!(response.text().await.unwrap(), "agent");
}

#[test]
fn test_config_defaults_to_thirty_seconds() {
    assert_eq!(ClientConfig::default().timeout, Duration::from_secs(30));
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));

    let config: ClientConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn test_config_from_yaml() {
    let config: ClientConfig = serde_saphyr::from_str("timeout: 2m 5s\n").unwrap();
    assert_eq!(config.timeout, Duration::from_secs(125));
}
