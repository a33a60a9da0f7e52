use std::fmt::Debug;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::BoxFuture;
use http::Method;
use http_body::Body as HttpBody;
use pin_project::pin_project;
use rewind_backend::BackendResult;
use rewind_core::{BoxError, CacheContext, CacheEntry, Upstream};
use rewind_http::{CacheableHttpRequest, CacheableHttpResponse};

use crate::CacheError;

/// Future that looks the request up and hands it back with the result.
pub type LookupFuture<Req> = BoxFuture<'static, (BackendResult<Option<Arc<CacheEntry>>>, Req)>;
/// Future that reads a body-bearing request's body before it is forwarded.
pub type CaptureFuture<Req> = BoxFuture<'static, (Result<Bytes, BoxError>, Req)>;
/// Future that replays the response body, appends the entry and returns the response.
pub type RecordFuture<Res, E> = BoxFuture<'static, Result<Res, CacheError<E>>>;

/// What a forwarded request leaves behind for the entry it may become.
#[derive(Debug)]
pub struct Recording {
    /// Request method.
    pub method: Method,
    /// Request URL as matched.
    pub url: String,
    /// Request body, empty unless the method carries one.
    pub body: Bytes,
}

#[allow(missing_docs)]
#[pin_project(project = StateProj)]
pub enum State<ReqBody, ResBody, U, E>
where
    ReqBody: HttpBody,
    ResBody: HttpBody,
    U: Upstream<
            CacheableHttpRequest<ReqBody>,
            Response = Result<CacheableHttpResponse<ResBody>, E>,
        >,
{
    /// Nothing polled yet
    Initial,
    /// Searching the store for a matching entry
    Lookup {
        #[pin]
        lookup: LookupFuture<CacheableHttpRequest<ReqBody>>,
    },
    /// Reading a request body the lookup did not need
    Capture {
        #[pin]
        capture: CaptureFuture<CacheableHttpRequest<ReqBody>>,
    },
    /// Waiting for the transport
    Forward {
        #[pin]
        upstream_future: U::Future,
        recording: Option<Recording>,
    },
    /// Appending the exchange to the store
    Record {
        #[pin]
        record: RecordFuture<CacheableHttpResponse<ResBody>, E>,
    },
    /// Final state with response
    Response {
        result: Option<Result<CacheableHttpResponse<ResBody>, CacheError<E>>>,
        ctx: CacheContext,
    },
}

impl<ReqBody, ResBody, U, E> Debug for State<ReqBody, ResBody, U, E>
where
    ReqBody: HttpBody,
    ResBody: HttpBody,
    U: Upstream<
            CacheableHttpRequest<ReqBody>,
            Response = Result<CacheableHttpResponse<ResBody>, E>,
        >,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Initial => f.write_str("State::Initial"),
            State::Lookup { .. } => f.write_str("State::Lookup"),
            State::Capture { .. } => f.write_str("State::Capture"),
            State::Forward { .. } => f.write_str("State::Forward"),
            State::Record { .. } => f.write_str("State::Record"),
            State::Response { .. } => f.write_str("State::Response"),
        }
    }
}
