//! Cache middleware for reqwest-middleware.

use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use http::header::HeaderName;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use rewind::fsm::CacheFuture;
use rewind::{CacheCounters, CacheError};
use rewind_backend::{Backend, MemoryBackend};
use rewind_http::{BufferedBody, CacheableHttpRequest};
use tracing::debug;

use crate::upstream::{ReqwestUpstream, buffered_body_to_reqwest};

/// Cache middleware for reqwest-middleware.
///
/// Answers requests that match a recorded exchange from the backend and lets
/// everything else continue down the chain. `200 OK` responses are recorded
/// on the way back. Clones share the backend and the counters.
pub struct CacheMiddleware<B = MemoryBackend> {
    backend: Arc<B>,
    counters: Arc<CacheCounters>,
    cache_status_header: Option<HeaderName>,
}

impl CacheMiddleware<MemoryBackend> {
    /// A middleware over an empty in-memory store.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder with an empty in-memory store.
    pub fn builder() -> CacheMiddlewareBuilder<MemoryBackend> {
        CacheMiddlewareBuilder::default()
    }
}

impl Default for CacheMiddleware<MemoryBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> CacheMiddleware<B> {
    /// The store this middleware records into.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Hit and miss tallies.
    pub fn counters(&self) -> &Arc<CacheCounters> {
        &self.counters
    }
}

impl<B> Clone for CacheMiddleware<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            counters: self.counters.clone(),
            cache_status_header: self.cache_status_header.clone(),
        }
    }
}

#[async_trait]
impl<B> Middleware for CacheMiddleware<B>
where
    B: Backend + 'static,
{
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let http_request: http::Request<reqwest::Body> = req
            .try_into()
            .map_err(reqwest_middleware::Error::Reqwest)?;

        let (parts, body) = http_request.into_parts();
        let buffered_request = http::Request::from_parts(parts, BufferedBody::Passthrough(body));
        let cacheable_req = CacheableHttpRequest::from_request(buffered_request);

        let upstream = ReqwestUpstream::new(next, extensions.clone());

        let cache_future: CacheFuture<
            B,
            reqwest::Body,
            reqwest::Body,
            ReqwestUpstream<'_>,
            reqwest_middleware::Error,
        > = CacheFuture::new(
            self.backend.clone(),
            self.counters.clone(),
            cacheable_req,
            upstream,
        );

        let (result, cache_context) = cache_future.await;
        let mut response = result.map_err(into_middleware_error)?;

        if let Some(header) = &self.cache_status_header {
            response.set_cache_status(cache_context.status, header);
        }

        let (parts, buffered_body) = response.into_response().into_parts();
        let http_response = http::Response::from_parts(parts, buffered_body_to_reqwest(buffered_body));
        Ok(http_response.into())
    }
}

/// Hands transport errors back untouched and wraps the cache's own failures.
fn into_middleware_error(error: CacheError<reqwest_middleware::Error>) -> reqwest_middleware::Error {
    match error {
        CacheError::Upstream(error) => error,
        other => {
            debug!(error = %other, "cache round trip failed");
            reqwest_middleware::Error::middleware(other)
        }
    }
}

/// Builder for [`CacheMiddleware`].
///
/// # Default
///
/// An empty [`MemoryBackend`], fresh counters, and no cache status header.
pub struct CacheMiddlewareBuilder<B> {
    backend: B,
    counters: Option<Arc<CacheCounters>>,
    cache_status_header: Option<HeaderName>,
}

impl<B> CacheMiddlewareBuilder<B>
where
    B: Backend,
{
    /// Replaces the store.
    pub fn backend<NB: Backend>(self, backend: NB) -> CacheMiddlewareBuilder<NB> {
        CacheMiddlewareBuilder {
            backend,
            counters: self.counters,
            cache_status_header: self.cache_status_header,
        }
    }

    /// Reports into existing counters instead of fresh ones.
    pub fn counters(self, counters: Arc<CacheCounters>) -> Self {
        CacheMiddlewareBuilder {
            counters: Some(counters),
            ..self
        }
    }

    /// Writes `HIT` or `MISS` into `header` on every successful response.
    pub fn cache_status_header(self, header: HeaderName) -> Self {
        CacheMiddlewareBuilder {
            cache_status_header: Some(header),
            ..self
        }
    }

    /// Builds the middleware.
    pub fn build(self) -> CacheMiddleware<B> {
        CacheMiddleware {
            backend: Arc::new(self.backend),
            counters: self.counters.unwrap_or_default(),
            cache_status_header: self.cache_status_header,
        }
    }
}

impl Default for CacheMiddlewareBuilder<MemoryBackend> {
    fn default() -> Self {
        Self {
            backend: MemoryBackend::new(),
            counters: None,
            cache_status_header: None,
        }
    }
}
