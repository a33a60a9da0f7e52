//! Upstream adapter for forwarding cache misses to a Tower service.
//!
//! Users typically don't interact with this module directly. It is used
//! internally by [`CacheService`](crate::service::CacheService).

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::ready;
use http::{Request, Response};
use http_body::Body as HttpBody;
use pin_project::pin_project;
use rewind_core::Upstream;
use rewind_http::{BufferedBody, CacheableHttpRequest, CacheableHttpResponse};
use tower::Service;

/// Future returned by [`TowerUpstream::call`].
///
/// Wraps the service future and puts the response body into a
/// [`BufferedBody::Passthrough`] so the cache can record it.
#[pin_project]
pub struct TowerUpstreamFuture<F, ResBody, E> {
    #[pin]
    inner: F,
    _phantom: PhantomData<fn() -> (ResBody, E)>,
}

impl<F, ResBody, E> TowerUpstreamFuture<F, ResBody, E> {
    /// Creates a new future wrapping the service's response future.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            _phantom: PhantomData,
        }
    }
}

impl<F, ResBody, E> Future for TowerUpstreamFuture<F, ResBody, E>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: HttpBody,
{
    type Output = Result<CacheableHttpResponse<ResBody>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let response = ready!(this.inner.poll(cx))?;
        let (parts, body) = response.into_parts();
        let buffered = Response::from_parts(parts, BufferedBody::Passthrough(body));
        Poll::Ready(Ok(CacheableHttpResponse::from_response(buffered)))
    }
}

/// Adapter that implements [`Upstream`] for a Tower [`Service`].
///
/// The service receives the request with its body in a [`BufferedBody`]:
/// already buffered when the cache had to read it, untouched otherwise.
pub struct TowerUpstream<S, ReqBody, ResBody> {
    service: S,
    _phantom: PhantomData<fn() -> (ReqBody, ResBody)>,
}

impl<S, ReqBody, ResBody> TowerUpstream<S, ReqBody, ResBody> {
    /// Creates a new upstream adapter wrapping a service that is ready.
    pub fn new(service: S) -> Self {
        Self {
            service,
            _phantom: PhantomData,
        }
    }
}

impl<S, ReqBody, ResBody> Upstream<CacheableHttpRequest<ReqBody>>
    for TowerUpstream<S, ReqBody, ResBody>
where
    S: Service<Request<BufferedBody<ReqBody>>, Response = Response<ResBody>>,
    S::Future: Send,
    ReqBody: HttpBody,
    ResBody: HttpBody,
{
    type Response = Result<CacheableHttpResponse<ResBody>, S::Error>;
    type Future = TowerUpstreamFuture<S::Future, ResBody, S::Error>;

    fn call(&mut self, req: CacheableHttpRequest<ReqBody>) -> Self::Future {
        TowerUpstreamFuture::new(self.service.call(req.into_request()))
    }
}
