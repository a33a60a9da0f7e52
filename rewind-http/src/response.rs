use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{HeaderMap, HeaderValue, Response, StatusCode, response::Parts};
use http_body::Body as HttpBody;
use rewind_core::CacheEntry;

use crate::body::BufferedBody;

/// A response whose body can be recorded and still be returned to the caller.
#[derive(Debug)]
pub struct CacheableHttpResponse<ResBody>
where
    ResBody: HttpBody,
{
    /// Status and headers.
    pub parts: Parts,
    /// Body slot, replayable once buffered.
    pub body: BufferedBody<ResBody>,
}

impl<ResBody> CacheableHttpResponse<ResBody>
where
    ResBody: HttpBody,
{
    /// Wraps a response whose body sits in a [`BufferedBody`].
    pub fn from_response(response: Response<BufferedBody<ResBody>>) -> Self {
        let (parts, body) = response.into_parts();
        CacheableHttpResponse { parts, body }
    }

    /// Returns the plain response.
    pub fn into_response(self) -> Response<BufferedBody<ResBody>> {
        Response::from_parts(self.parts, self.body)
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Reads the body and puts a fresh copy back for the caller.
    pub async fn body_bytes(&mut self) -> Result<Bytes, ResBody::Error>
    where
        ResBody::Data: Send,
    {
        self.body.replay().await
    }

    /// Builds a `200 OK` response from a recorded entry.
    ///
    /// Headers are copied from the entry and `content-length` is set to the
    /// length of the recorded body, replacing any recorded value.
    pub fn from_entry(entry: &CacheEntry) -> Self {
        let body = entry.response().clone();
        let mut response = Response::new(BufferedBody::Complete(Some(body.clone())));
        *response.status_mut() = StatusCode::OK;
        *response.headers_mut() = entry.header().clone();
        response
            .headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        CacheableHttpResponse::from_response(response)
    }
}
