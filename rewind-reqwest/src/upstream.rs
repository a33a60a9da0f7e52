//! Upstream wrapper for reqwest-middleware's `Next` type.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http::Extensions;
use reqwest_middleware::{Next, Result};
use rewind_core::Upstream;
use rewind_http::{BufferedBody, CacheableHttpRequest, CacheableHttpResponse};

/// Bridges the rest of a reqwest-middleware chain to the [`Upstream`] trait.
///
/// On a miss the request is handed to the next middleware, and eventually to
/// the `reqwest::Client` itself.
pub struct ReqwestUpstream<'a> {
    next: Next<'a>,
    extensions: Extensions,
}

impl<'a> ReqwestUpstream<'a> {
    /// Create a new upstream wrapper.
    pub fn new(next: Next<'a>, extensions: Extensions) -> Self {
        Self { next, extensions }
    }
}

impl<'a> Upstream<CacheableHttpRequest<reqwest::Body>> for ReqwestUpstream<'a> {
    type Response = Result<CacheableHttpResponse<reqwest::Body>>;
    type Future = Pin<Box<dyn Future<Output = Self::Response> + Send + 'a>>;

    fn call(&mut self, req: CacheableHttpRequest<reqwest::Body>) -> Self::Future {
        let next = self.next.clone();
        let mut extensions = std::mem::take(&mut self.extensions);

        Box::pin(async move {
            let (parts, buffered_body) = req.into_request().into_parts();
            let http_request = http::Request::from_parts(parts, buffered_body_to_reqwest(buffered_body));
            let reqwest_request: reqwest::Request = http_request
                .try_into()
                .map_err(reqwest_middleware::Error::Reqwest)?;

            let response = next.run(reqwest_request, &mut extensions).await?;

            let (parts, body) = http::Response::<reqwest::Body>::from(response).into_parts();
            let http_response = http::Response::from_parts(parts, BufferedBody::Passthrough(body));
            Ok(CacheableHttpResponse::from_response(http_response))
        })
    }
}

/// Turns a [`BufferedBody`] back into a `reqwest::Body`.
///
/// A body that was never read is handed over as is; buffered bytes become a
/// fresh in-memory body.
pub fn buffered_body_to_reqwest(buffered: BufferedBody<reqwest::Body>) -> reqwest::Body {
    match buffered {
        BufferedBody::Passthrough(body) => body,
        BufferedBody::Complete(Some(bytes)) => reqwest::Body::from(bytes),
        BufferedBody::Complete(None) => reqwest::Body::from(Bytes::new()),
    }
}
