#![allow(dead_code)]

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};
use rewind_core::{BoxError, CacheEntry, MatchSubject};

/// In-memory request that counts how often its body stream is read.
pub struct TestRequest {
    method: Method,
    url: String,
    body: Option<Bytes>,
    captured: Option<Bytes>,
    fail: bool,
    pub reads: usize,
}

impl TestRequest {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: url.to_owned(),
            body: None,
            captured: None,
            fail: false,
            reads: 0,
        }
    }

    pub fn with_body(mut self, body: &'static str) -> Self {
        self.body = Some(Bytes::from_static(body.as_bytes()));
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl MatchSubject for TestRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn body(&mut self) -> Result<Bytes, BoxError> {
        if let Some(bytes) = &self.captured {
            return Ok(bytes.clone());
        }
        self.reads += 1;
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "body stream reset").into());
        }
        let bytes = self.body.take().unwrap_or_default();
        self.captured = Some(bytes.clone());
        Ok(bytes)
    }
}

pub fn entry(method: Method, url: &str, body: &'static str, response: &'static str) -> CacheEntry {
    CacheEntry::new(
        method,
        url,
        Bytes::from_static(body.as_bytes()),
        Bytes::from_static(response.as_bytes()),
        HeaderMap::new(),
    )
}
