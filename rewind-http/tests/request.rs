use bytes::Bytes;
use futures::stream;
use http::{Method, Request};
use http_body::Frame;
use http_body_util::{BodyExt, Full, StreamBody};
use pretty_assertions::assert_eq;
use rewind_core::MatchSubject;
use rewind_http::{BufferedBody, CacheableHttpRequest};
use std::io;

fn request(method: Method, body: &'static str) -> CacheableHttpRequest<Full<Bytes>> {
    let request = Request::builder()
        .method(method)
        .uri("http://localhost:8080/search?q=1")
        .body(BufferedBody::Passthrough(Full::new(Bytes::from_static(
            body.as_bytes(),
        ))))
        .unwrap();
    CacheableHttpRequest::from_request(request)
}

#[test]
fn test_url_is_absolute_uri() {
    let request = request(Method::GET, "");
    assert_eq!(request.url(), "http://localhost:8080/search?q=1");
    assert!(!request.carries_body());
}

#[tokio::test]
async fn test_body_is_captured_and_still_sendable() {
    let mut request = request(Method::POST, r#"{"a":1}"#);
    assert!(request.carries_body());
    assert!(request.captured_body().is_none());

    let bytes = request.body_bytes().await.unwrap();
    assert_eq!(bytes, r#"{"a":1}"#);
    assert_eq!(request.captured_body(), Some(&bytes));

    let sent = request.into_request().into_body().collect().await.unwrap();
    assert_eq!(sent.to_bytes(), r#"{"a":1}"#);
}

#[tokio::test]
async fn test_subject_reads_body_once() {
    let body = StreamBody::new(stream::iter(vec![
        Ok::<_, io::Error>(Frame::data(Bytes::from("one"))),
        Ok(Frame::data(Bytes::from("two"))),
    ]));
    let request = Request::post("http://localhost/")
        .body(BufferedBody::Passthrough(body))
        .unwrap();
    let mut request = CacheableHttpRequest::from_request(request);

    let subject: &mut dyn MatchSubject = &mut request;
    assert_eq!(subject.method(), &Method::POST);
    assert_eq!(subject.body().await.unwrap(), "onetwo");
    assert_eq!(subject.body().await.unwrap(), "onetwo");
}

#[tokio::test]
async fn test_subject_surfaces_read_failure() {
    let body = StreamBody::new(stream::iter(vec![Err::<Frame<Bytes>, _>(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "truncated",
    ))]));
    let request = Request::post("http://localhost/")
        .body(BufferedBody::Passthrough(body))
        .unwrap();
    let mut request = CacheableHttpRequest::from_request(request);

    let error = MatchSubject::body(&mut request).await.unwrap_err();
    assert_eq!(error.to_string(), "truncated");
    assert!(request.captured_body().is_none());
}
