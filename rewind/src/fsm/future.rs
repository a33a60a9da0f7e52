use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{self, Poll},
    time::Instant,
};

use bytes::Bytes;
use futures::ready;
use http::StatusCode;
use http_body::Body as HttpBody;
use pin_project::pin_project;
use rewind_backend::Backend;
use rewind_core::{BoxError, CacheContext, CacheEntry, Upstream};
use rewind_http::{CacheableHttpRequest, CacheableHttpResponse};
use tracing::debug;

use crate::{
    CacheCounters, CacheError,
    fsm::states::{RecordFuture, Recording, State, StateProj},
    metrics::record_context_metrics,
};

const POLL_AFTER_READY_ERROR: &str = "CacheFuture can't be polled after finishing";

/// One round trip through the cache.
///
/// Resolves to the response, or the error that ended the round trip, together
/// with a [`CacheContext`] telling where the response came from.
///
/// ```text
/// Initial -> Lookup -> Response                    (hit)
///                   -> [Capture] -> Forward -> Record -> Response   (200)
///                                           -> Response             (other status)
/// ```
///
/// `Capture` only runs for body-bearing requests whose body the lookup did not
/// read, so the recorded entry always has the exact bytes that were sent.
#[pin_project(project = CacheFutureProj)]
pub struct CacheFuture<B, ReqBody, ResBody, U, E>
where
    B: Backend,
    ReqBody: HttpBody,
    ResBody: HttpBody,
    U: Upstream<
            CacheableHttpRequest<ReqBody>,
            Response = Result<CacheableHttpResponse<ResBody>, E>,
        >,
{
    upstream: U,
    backend: Arc<B>,
    counters: Arc<CacheCounters>,
    request: Option<CacheableHttpRequest<ReqBody>>,
    started: Instant,
    #[pin]
    state: State<ReqBody, ResBody, U, E>,
}

impl<B, ReqBody, ResBody, U, E> CacheFuture<B, ReqBody, ResBody, U, E>
where
    B: Backend,
    ReqBody: HttpBody,
    ResBody: HttpBody,
    U: Upstream<
            CacheableHttpRequest<ReqBody>,
            Response = Result<CacheableHttpResponse<ResBody>, E>,
        >,
{
    /// Creates the round trip for `request`. Nothing happens until it is polled.
    pub fn new(
        backend: Arc<B>,
        counters: Arc<CacheCounters>,
        request: CacheableHttpRequest<ReqBody>,
        upstream: U,
    ) -> Self {
        CacheFuture {
            upstream,
            backend,
            counters,
            request: Some(request),
            started: Instant::now(),
            state: State::Initial,
        }
    }
}

impl<B, ReqBody, ResBody, U, E> Future for CacheFuture<B, ReqBody, ResBody, U, E>
where
    B: Backend + 'static,
    ReqBody: HttpBody + Send + 'static,
    ReqBody::Data: Send,
    ReqBody::Error: Into<BoxError>,
    ResBody: HttpBody + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Into<BoxError>,
    U: Upstream<
            CacheableHttpRequest<ReqBody>,
            Response = Result<CacheableHttpResponse<ResBody>, E>,
        >,
    E: Send + 'static,
{
    type Output = (
        Result<CacheableHttpResponse<ResBody>, CacheError<E>>,
        CacheContext,
    );

    fn poll(self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            let state = match this.state.as_mut().project() {
                StateProj::Initial => {
                    let mut request = this.request.take().expect(POLL_AFTER_READY_ERROR);
                    let backend = this.backend.clone();
                    debug!(method = %request.method(), url = request.url(), "FSM looking up request");
                    let lookup = Box::pin(async move {
                        let result = backend.find_match(&mut request).await;
                        (result, request)
                    });
                    State::Lookup { lookup }
                }
                StateProj::Lookup { lookup } => {
                    let (result, mut request) = ready!(lookup.poll(cx));
                    match result {
                        Ok(Some(entry)) => {
                            debug!(url = entry.url(), "FSM cache hit");
                            this.counters.record_hit();
                            State::Response {
                                result: Some(Ok(CacheableHttpResponse::from_entry(&entry))),
                                ctx: CacheContext::hit(),
                            }
                        }
                        Ok(None) if request.carries_body() && request.captured_body().is_none() => {
                            debug!("FSM cache miss, capturing request body");
                            let capture = Box::pin(async move {
                                let result: Result<Bytes, BoxError> =
                                    request.body_bytes().await.map_err(Into::into);
                                (result, request)
                            });
                            State::Capture { capture }
                        }
                        Ok(None) => {
                            debug!("FSM cache miss");
                            forward(&mut *this.upstream, request)
                        }
                        Err(error) => {
                            debug!(%error, "FSM lookup failed");
                            State::Response {
                                result: Some(Err(error.into())),
                                ctx: CacheContext::default(),
                            }
                        }
                    }
                }
                StateProj::Capture { capture } => {
                    let (result, request) = ready!(capture.poll(cx));
                    match result {
                        Ok(_) => forward(&mut *this.upstream, request),
                        Err(error) => {
                            debug!(%error, "FSM failed to read request body");
                            State::Response {
                                result: Some(Err(CacheError::RequestBody(error))),
                                ctx: CacheContext::default(),
                            }
                        }
                    }
                }
                StateProj::Forward {
                    upstream_future,
                    recording,
                } => {
                    let result = ready!(upstream_future.poll(cx));
                    match result {
                        Ok(response) if response.status() == StatusCode::OK => {
                            let recording = recording.take().expect(POLL_AFTER_READY_ERROR);
                            State::Record {
                                record: record(this.backend.clone(), recording, response),
                            }
                        }
                        Ok(response) => {
                            this.counters.record_miss();
                            debug!(status = %response.status(), "FSM response not recorded");
                            State::Response {
                                result: Some(Ok(response)),
                                ctx: CacheContext::default(),
                            }
                        }
                        Err(error) => {
                            debug!("FSM transport failed");
                            State::Response {
                                result: Some(Err(CacheError::Upstream(error))),
                                ctx: CacheContext::default(),
                            }
                        }
                    }
                }
                StateProj::Record { record } => {
                    let result = ready!(record.poll(cx));
                    if result.is_ok() {
                        this.counters.record_miss();
                    }
                    let ctx = CacheContext {
                        recorded: result.is_ok(),
                        ..CacheContext::default()
                    };
                    State::Response {
                        result: Some(result),
                        ctx,
                    }
                }
                StateProj::Response { result, ctx } => {
                    let result = result.take().expect(POLL_AFTER_READY_ERROR);
                    let ctx = *ctx;
                    record_context_metrics(&ctx, this.backend.name(), this.started.elapsed());
                    return Poll::Ready((result, ctx));
                }
            };
            debug!("{:?}", &state);
            this.state.set(state);
        }
    }
}

fn forward<ReqBody, ResBody, U, E>(
    upstream: &mut U,
    request: CacheableHttpRequest<ReqBody>,
) -> State<ReqBody, ResBody, U, E>
where
    ReqBody: HttpBody,
    ResBody: HttpBody,
    U: Upstream<
            CacheableHttpRequest<ReqBody>,
            Response = Result<CacheableHttpResponse<ResBody>, E>,
        >,
{
    let recording = Recording {
        method: request.method().clone(),
        url: request.url().to_owned(),
        body: request.captured_body().cloned().unwrap_or_default(),
    };
    debug!(method = %recording.method, url = %recording.url, "FSM forwarding request");
    State::Forward {
        upstream_future: upstream.call(request),
        recording: Some(recording),
    }
}

fn record<B, ResBody, E>(
    backend: Arc<B>,
    recording: Recording,
    mut response: CacheableHttpResponse<ResBody>,
) -> RecordFuture<CacheableHttpResponse<ResBody>, E>
where
    B: Backend + 'static,
    ResBody: HttpBody + Send + 'static,
    ResBody::Data: Send,
    ResBody::Error: Into<BoxError>,
    E: Send + 'static,
{
    Box::pin(async move {
        let body = response
            .body_bytes()
            .await
            .map_err(|error| CacheError::ResponseBody(error.into()))?;
        let entry = CacheEntry::new(
            recording.method,
            recording.url,
            recording.body,
            body,
            response.headers().clone(),
        );
        backend.add(entry).await?;
        debug!(backend = backend.name(), "FSM recorded exchange");
        Ok::<_, CacheError<E>>(response)
    })
}
