use std::sync::Arc;
use std::task::{Context, Poll};

use http::{Request, Response, header::HeaderName};
use http_body::Body as HttpBody;
use rewind::fsm::CacheFuture;
use rewind::{CacheCounters, CacheError};
use rewind_backend::{Backend, MemoryBackend};
use rewind_core::BoxError;
use rewind_http::{BufferedBody, CacheableHttpRequest};
use tower::Service;

use crate::future::CacheServiceFuture;
use crate::upstream::TowerUpstream;

/// Tower service that answers from recorded exchanges and records new ones.
///
/// Created by [`CacheLayer`](crate::CacheLayer). Clones share the backend and
/// the counters.
pub struct CacheService<S, B = MemoryBackend> {
    upstream: S,
    backend: Arc<B>,
    counters: Arc<CacheCounters>,
    cache_status_header: Option<HeaderName>,
}

impl<S, B> CacheService<S, B> {
    /// Wraps `upstream`.
    pub fn new(
        upstream: S,
        backend: Arc<B>,
        counters: Arc<CacheCounters>,
        cache_status_header: Option<HeaderName>,
    ) -> Self {
        CacheService {
            upstream,
            backend,
            counters,
            cache_status_header,
        }
    }

    /// The store this service records into.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Hit and miss tallies.
    pub fn counters(&self) -> &Arc<CacheCounters> {
        &self.counters
    }
}

impl<S, B> Clone for CacheService<S, B>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            backend: self.backend.clone(),
            counters: self.counters.clone(),
            cache_status_header: self.cache_status_header.clone(),
        }
    }
}

impl<S, B, ReqBody, ResBody> Service<Request<ReqBody>> for CacheService<S, B>
where
    S: Service<Request<BufferedBody<ReqBody>>, Response = Response<ResBody>>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
    S::Error: Send + 'static,
    B: Backend + 'static,
    ReqBody: HttpBody + Send + 'static,
    ReqBody::Data: Send,
    ReqBody::Error: Into<BoxError>,
    ResBody: HttpBody + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<BufferedBody<ResBody>>;
    type Error = CacheError<S::Error>;
    type Future = CacheServiceFuture<
        CacheFuture<B, ReqBody, ResBody, TowerUpstream<S, ReqBody, ResBody>, S::Error>,
        ResBody,
        S::Error,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.upstream.poll_ready(cx).map_err(CacheError::Upstream)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let (parts, body) = req.into_parts();
        let buffered_request = Request::from_parts(parts, BufferedBody::Passthrough(body));
        let cacheable_req = CacheableHttpRequest::from_request(buffered_request);

        // The polled service goes to this call; the clone waits for the next poll_ready.
        let clone = self.upstream.clone();
        let ready = std::mem::replace(&mut self.upstream, clone);

        let cache_future = CacheFuture::new(
            self.backend.clone(),
            self.counters.clone(),
            cacheable_req,
            TowerUpstream::new(ready),
        );

        CacheServiceFuture::new(cache_future, self.cache_status_header.clone())
    }
}
