use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::ready;
use http::{Response, header::HeaderName};
use http_body::Body as HttpBody;
use pin_project::pin_project;
use rewind::CacheError;
use rewind_core::CacheContext;
use rewind_http::{BufferedBody, CacheableHttpResponse};

/// Future returned by [`CacheService`](crate::service::CacheService).
///
/// Turns the cached round trip's result back into an `http::Response` and,
/// when a header name is configured, writes `HIT` or `MISS` into it.
#[pin_project]
pub struct CacheServiceFuture<F, ResBody, E>
where
    F: Future<
        Output = (
            Result<CacheableHttpResponse<ResBody>, CacheError<E>>,
            CacheContext,
        ),
    >,
    ResBody: HttpBody,
{
    #[pin]
    inner: F,
    cache_status_header: Option<HeaderName>,
}

impl<F, ResBody, E> CacheServiceFuture<F, ResBody, E>
where
    F: Future<
        Output = (
            Result<CacheableHttpResponse<ResBody>, CacheError<E>>,
            CacheContext,
        ),
    >,
    ResBody: HttpBody,
{
    /// Wraps a round trip.
    pub fn new(inner: F, cache_status_header: Option<HeaderName>) -> Self {
        Self {
            inner,
            cache_status_header,
        }
    }
}

impl<F, ResBody, E> Future for CacheServiceFuture<F, ResBody, E>
where
    F: Future<
        Output = (
            Result<CacheableHttpResponse<ResBody>, CacheError<E>>,
            CacheContext,
        ),
    >,
    ResBody: HttpBody,
{
    type Output = Result<Response<BufferedBody<ResBody>>, CacheError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let (result, cache_context) = ready!(this.inner.poll(cx));

        let response = result.map(|mut response| {
            if let Some(header) = this.cache_status_header.take() {
                response.set_cache_status(cache_context.status, &header);
            }
            response.into_response()
        });

        Poll::Ready(response)
    }
}
