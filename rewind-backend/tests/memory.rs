mod common;

use std::sync::Arc;

use common::{TestRequest, entry};
use bytes::Bytes;
use futures::future::join_all;
use http::header::CONTENT_DISPOSITION;
use http::{HeaderMap, HeaderValue, Method};
use pretty_assertions::assert_eq;
use rewind_backend::{Backend, BackendError, MemoryBackend, MemoryConfig, SnapshotError};
use rewind_core::{BodyMatch, CacheEntry};

#[tokio::test]
async fn test_empty_store_misses() {
    let backend = MemoryBackend::new();
    let mut request = TestRequest::new(Method::GET, "http://localhost/a");
    assert!(backend.find_match(&mut request).await.unwrap().is_none());
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_add_appends_without_dedup() {
    let backend = MemoryBackend::new();
    backend
        .add(entry(Method::GET, "http://localhost/a", "", "one"))
        .await
        .unwrap();
    backend
        .add(entry(Method::GET, "http://localhost/a", "", "two"))
        .await
        .unwrap();
    assert_eq!(backend.len(), 2);
}

#[tokio::test]
async fn test_first_match_wins() {
    let backend = MemoryBackend::new();
    for response in ["first", "second"] {
        backend
            .add(entry(Method::GET, "http://localhost/a", "", response))
            .await
            .unwrap();
    }

    let mut request = TestRequest::new(Method::GET, "http://localhost/a");
    let found = backend.find_match(&mut request).await.unwrap().unwrap();
    assert_eq!(found.response().as_ref(), b"first");
}

#[tokio::test]
async fn test_identical_responses_do_not_cross_urls_or_methods() {
    let backend = MemoryBackend::new();
    backend
        .add(entry(Method::GET, "http://localhost/a", "", "same"))
        .await
        .unwrap();

    let mut other_url = TestRequest::new(Method::GET, "http://localhost/b");
    assert!(backend.find_match(&mut other_url).await.unwrap().is_none());

    let mut other_method = TestRequest::new(Method::POST, "http://localhost/a");
    assert!(backend.find_match(&mut other_method).await.unwrap().is_none());
}

#[tokio::test]
async fn test_body_read_once_across_candidates() {
    let backend = MemoryBackend::new();
    for body in ["one", "two", "three", "four"] {
        backend
            .add(entry(Method::POST, "http://localhost/a", body, body))
            .await
            .unwrap();
    }

    let mut request = TestRequest::new(Method::POST, "http://localhost/a").with_body("four");
    let found = backend.find_match(&mut request).await.unwrap().unwrap();
    assert_eq!(found.response().as_ref(), b"four");
    assert_eq!(request.reads, 1);

    let mut request = TestRequest::new(Method::POST, "http://localhost/a").with_body("five");
    assert!(backend.find_match(&mut request).await.unwrap().is_none());
    assert_eq!(request.reads, 1);
}

#[tokio::test]
async fn test_normalized_matching_is_configurable() {
    let recorded = entry(Method::POST, "http://localhost/a", r#"{"a":1,"b":2}"#, "ok");

    let json = MemoryBackend::builder().body_match(BodyMatch::Json).build();
    json.add(recorded.clone()).await.unwrap();
    let mut request = TestRequest::new(Method::POST, "http://localhost/a").with_body(r#"{"b":2,"a":1}"#);
    assert!(json.find_match(&mut request).await.unwrap().is_some());

    let raw = MemoryBackend::new();
    raw.add(recorded).await.unwrap();
    let mut request = TestRequest::new(Method::POST, "http://localhost/a").with_body(r#"{"b":2,"a":1}"#);
    assert!(raw.find_match(&mut request).await.unwrap().is_none());
}

#[tokio::test]
async fn test_trace_only_store_records_but_never_matches() {
    let backend = MemoryBackend::builder().respond_from_cache(false).build();
    backend
        .add(entry(Method::GET, "http://localhost/a", "", "ok"))
        .await
        .unwrap();

    let mut request = TestRequest::new(Method::GET, "http://localhost/a");
    assert!(backend.find_match(&mut request).await.unwrap().is_none());
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn test_read_failure_surfaces_from_lookup() {
    let backend = MemoryBackend::new();
    backend
        .add(entry(Method::POST, "http://localhost/a", "payload", "ok"))
        .await
        .unwrap();

    let mut request = TestRequest::new(Method::POST, "http://localhost/a").failing();
    let result = backend.find_match(&mut request).await;
    assert!(matches!(result, Err(BackendError::RequestBody(_))));
}

#[tokio::test]
async fn test_clones_share_entries() {
    let backend = MemoryBackend::new();
    let clone = backend.clone();
    clone
        .add(entry(Method::GET, "http://localhost/a", "", "ok"))
        .await
        .unwrap();
    assert_eq!(backend.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_and_lookups() {
    let backend = Arc::new(MemoryBackend::new());

    let writers = (0..100).map(|i| {
        let backend = backend.clone();
        tokio::spawn(async move {
            let url = format!("http://localhost/{}", i % 10);
            backend
                .add(rewind_core::CacheEntry::new(
                    Method::GET,
                    url,
                    Default::default(),
                    bytes::Bytes::from(i.to_string()),
                    Default::default(),
                ))
                .await
                .unwrap();
        })
    });
    let readers = (0..100).map(|i| {
        let backend = backend.clone();
        tokio::spawn(async move {
            let url = format!("http://localhost/{}", i % 10);
            let mut request = TestRequest::new(Method::GET, &url);
            if let Some(found) = backend.find_match(&mut request).await.unwrap() {
                assert_eq!(found.url(), url);
            }
        })
    });

    for result in join_all(writers.chain(readers).collect::<Vec<_>>()).await {
        result.unwrap();
    }
    assert_eq!(backend.len(), 100);
}

#[test]
fn test_snapshot_round_trip_keeps_order() {
    let backend = MemoryBackend::builder()
        .entries([
            entry(Method::GET, "http://localhost/a", "", "first"),
            entry(Method::POST, "http://localhost/b", "payload", "second"),
        ])
        .build();

    let json = backend.to_json().unwrap();
    assert!(json.starts_with(r#"{"cached_requests":["#));

    let restored = MemoryBackend::from_json(&json).unwrap();
    assert_eq!(restored.snapshot(), backend.snapshot());
}

#[test]
fn test_snapshot_refuses_non_utf8_header_values() {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_bytes(b"r\xe9sum\xe9").unwrap(),
    );
    let backend = MemoryBackend::builder()
        .entries([CacheEntry::new(
            Method::GET,
            "http://localhost/cv",
            Bytes::new(),
            Bytes::from_static(b"pdf"),
            headers,
        )])
        .build();

    assert!(matches!(backend.to_json(), Err(SnapshotError::Json(_))));
}

#[test]
fn test_invalid_snapshot_is_rejected() {
    assert!(MemoryBackend::from_json(r#"{"cached_requests":[{"url":1}]}"#).is_err());
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
    respond_from_cache: false
    body_match: json
    "#;
    let config: MemoryConfig = serde_saphyr::from_str(yaml).unwrap();
    assert_eq!(
        config,
        MemoryConfig {
            respond_from_cache: false,
            body_match: BodyMatch::Json,
        }
    );
    assert!(!MemoryBackend::from_config(&config).responds_from_cache());
}

#[test]
fn test_config_defaults() {
    let config: MemoryConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, MemoryConfig::default());
    assert!(config.respond_from_cache);
}
