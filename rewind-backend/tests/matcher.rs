mod common;

use common::{TestRequest, entry};
use http::Method;
use rewind_backend::{BackendError, Matcher};
use rewind_core::{BodyMatch, JsonNormalizer};

#[tokio::test]
async fn test_method_must_be_identical() {
    let matcher = Matcher::default();
    let recorded = entry(Method::GET, "http://localhost/a", "", "ok");

    let mut request = TestRequest::new(Method::POST, "http://localhost/a");
    assert!(!matcher.matches(&recorded, &mut request).await.unwrap());

    let mut request = TestRequest::new(Method::GET, "http://localhost/a");
    assert!(matcher.matches(&recorded, &mut request).await.unwrap());
}

#[tokio::test]
async fn test_url_is_compared_byte_for_byte() {
    let matcher = Matcher::default();
    let recorded = entry(Method::GET, "http://localhost/a?x=1&y=2", "", "ok");

    for url in [
        "http://localhost/a?y=2&x=1",
        "http://localhost/a?x=1&y=2/",
        "http://localhost/b?x=1&y=2",
    ] {
        let mut request = TestRequest::new(Method::GET, url);
        assert!(
            !matcher.matches(&recorded, &mut request).await.unwrap(),
            "{url} must not match"
        );
    }
}

#[tokio::test]
async fn test_body_ignored_for_bodiless_methods() {
    let matcher = Matcher::default();
    let recorded = entry(Method::GET, "http://localhost/a", "", "ok");

    let mut request = TestRequest::new(Method::GET, "http://localhost/a").with_body("payload");
    assert!(matcher.matches(&recorded, &mut request).await.unwrap());
    assert_eq!(request.reads, 0, "GET bodies are never read");
}

#[tokio::test]
async fn test_empty_bodies_match_trivially() {
    let matcher = Matcher::new(JsonNormalizer);
    let recorded = entry(Method::POST, "http://localhost/a", "", "ok");

    let mut request = TestRequest::new(Method::POST, "http://localhost/a");
    assert!(matcher.matches(&recorded, &mut request).await.unwrap());
}

#[tokio::test]
async fn test_raw_policy_requires_identical_bytes() {
    let matcher = Matcher::new(BodyMatch::Raw);
    let recorded = entry(Method::POST, "http://localhost/a", r#"{"a":1,"b":2}"#, "ok");

    let mut same = TestRequest::new(Method::POST, "http://localhost/a").with_body(r#"{"a":1,"b":2}"#);
    assert!(matcher.matches(&recorded, &mut same).await.unwrap());

    let mut reordered =
        TestRequest::new(Method::POST, "http://localhost/a").with_body(r#"{"b":2,"a":1}"#);
    assert!(!matcher.matches(&recorded, &mut reordered).await.unwrap());
}

#[tokio::test]
async fn test_json_policy_ignores_key_order() {
    let matcher = Matcher::new(BodyMatch::Json);
    let recorded = entry(Method::POST, "http://localhost/a", r#"{"a":1,"b":2}"#, "ok");

    let mut reordered =
        TestRequest::new(Method::POST, "http://localhost/a").with_body(r#"{"b":2,"a":1}"#);
    assert!(matcher.matches(&recorded, &mut reordered).await.unwrap());

    let mut different =
        TestRequest::new(Method::POST, "http://localhost/a").with_body(r#"{"b":3,"a":1}"#);
    assert!(!matcher.matches(&recorded, &mut different).await.unwrap());
}

#[tokio::test]
async fn test_json_policy_falls_back_to_raw_for_non_json() {
    let matcher = Matcher::new(BodyMatch::Json);
    let recorded = entry(Method::PUT, "http://localhost/a", "name=x&id=1", "ok");

    let mut same = TestRequest::new(Method::PUT, "http://localhost/a").with_body("name=x&id=1");
    assert!(matcher.matches(&recorded, &mut same).await.unwrap());

    let mut reordered = TestRequest::new(Method::PUT, "http://localhost/a").with_body("id=1&name=x");
    assert!(!matcher.matches(&recorded, &mut reordered).await.unwrap());
}

#[tokio::test]
async fn test_read_failure_is_an_error() {
    let matcher = Matcher::default();
    let recorded = entry(Method::POST, "http://localhost/a", "payload", "ok");

    let mut request = TestRequest::new(Method::POST, "http://localhost/a").failing();
    let result = matcher.matches(&recorded, &mut request).await;
    assert!(matches!(result, Err(BackendError::RequestBody(_))));
}

#[tokio::test]
async fn test_mismatched_head_skips_body_read() {
    let matcher = Matcher::default();
    let recorded = entry(Method::POST, "http://localhost/a", "payload", "ok");

    let mut request = TestRequest::new(Method::POST, "http://localhost/other").failing();
    assert!(!matcher.matches(&recorded, &mut request).await.unwrap());
    assert_eq!(request.reads, 0);
}
