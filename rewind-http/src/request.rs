use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Request, request::Parts};
use http_body::Body as HttpBody;
use rewind_core::{BoxError, MatchSubject, carries_body};

use crate::body::BufferedBody;

/// An outbound request whose body can be read for matching and still be sent.
///
/// The body is replayed at most once. The bytes are kept, so every candidate
/// entry a lookup compares against, and the entry recorded afterwards, share
/// the same read.
#[derive(Debug)]
pub struct CacheableHttpRequest<ReqBody>
where
    ReqBody: HttpBody,
{
    parts: Parts,
    body: BufferedBody<ReqBody>,
    url: String,
    captured: Option<Bytes>,
}

impl<ReqBody> CacheableHttpRequest<ReqBody>
where
    ReqBody: HttpBody,
{
    /// Wraps a request whose body sits in a [`BufferedBody`].
    pub fn from_request(request: Request<BufferedBody<ReqBody>>) -> Self {
        let (parts, body) = request.into_parts();
        let url = parts.uri.to_string();
        Self {
            parts,
            body,
            url,
            captured: None,
        }
    }

    /// Returns the request, with the body buffered if it has been read.
    pub fn into_request(self) -> Request<BufferedBody<ReqBody>> {
        Request::from_parts(self.parts, self.body)
    }

    /// Request head.
    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// The request URL exactly as it is matched and recorded.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the body takes part in matching and recording.
    pub fn carries_body(&self) -> bool {
        carries_body(&self.parts.method)
    }

    /// Body bytes read so far, if any.
    pub fn captured_body(&self) -> Option<&Bytes> {
        self.captured.as_ref()
    }

    /// Reads the body once and keeps the bytes. The body stays sendable.
    pub async fn body_bytes(&mut self) -> Result<Bytes, ReqBody::Error>
    where
        ReqBody::Data: Send,
    {
        if let Some(bytes) = &self.captured {
            return Ok(bytes.clone());
        }
        let bytes = self.body.replay().await?;
        self.captured = Some(bytes.clone());
        Ok(bytes)
    }
}

#[async_trait]
impl<ReqBody> MatchSubject for CacheableHttpRequest<ReqBody>
where
    ReqBody: HttpBody + Send + 'static,
    ReqBody::Data: Send,
    ReqBody::Error: Into<BoxError>,
{
    fn method(&self) -> &Method {
        &self.parts.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn body(&mut self) -> Result<Bytes, BoxError> {
        self.body_bytes().await.map_err(Into::into)
    }
}
