//! Replayable HTTP bodies.
//!
//! A request body is a one-shot stream, yet a round trip may need it three
//! times: the matcher compares it with recorded entries, the transport sends
//! it, and the recorder stores it. The same holds for a response body, which
//! is recorded and then handed to the caller.
//!
//! [`BufferedBody`] is the slot every such body lives in. [`replay`] drains
//! the slot once and writes a fresh copy of the bytes back, so each later
//! reader still sees the whole content from the start.
//!
//! ## Body States
//!
//! - **Complete**: the body is held in memory (`None` once yielded, or when
//!   there never was a body)
//! - **Passthrough**: the body has not been read and streams straight from
//!   its source

use bytes::{Buf, Bytes};
use http_body::{Body as HttpBody, Frame};
use http_body_util::BodyExt;
use pin_project::pin_project;
use std::fmt;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::trace;

/// A body slot that is either buffered in memory or still streaming.
///
/// # Variants
///
/// - [`Complete`](BufferedBody::Complete): bytes held in memory, yielded as a
///   single frame
/// - [`Passthrough`](BufferedBody::Passthrough): untouched inner body
#[pin_project(project = BufferedBodyProj)]
pub enum BufferedBody<B>
where
    B: HttpBody,
{
    /// Body held in memory.
    ///
    /// The `Option` is used to yield the data once, then return `None` on subsequent polls.
    Complete(Option<Bytes>),

    /// Body was passed through without reading.
    Passthrough(#[pin] B),
}

impl<B> BufferedBody<B>
where
    B: HttpBody,
{
    /// An absent body.
    pub fn empty() -> Self {
        BufferedBody::Complete(None)
    }

    /// Returns the buffered bytes without reading anything.
    ///
    /// `None` for a body still streaming or already yielded.
    pub fn buffered(&self) -> Option<&Bytes> {
        match self {
            BufferedBody::Complete(bytes) => bytes.as_ref(),
            BufferedBody::Passthrough(_) => None,
        }
    }

    /// Drains the body and puts a fresh copy back. See [`replay`].
    pub async fn replay(&mut self) -> Result<Bytes, B::Error>
    where
        B::Data: Send,
    {
        replay(self).await
    }
}

/// Reads the body in `slot` to the end and rewrites the slot with the same
/// bytes.
///
/// - An absent body returns empty bytes and leaves the slot alone.
/// - A buffered body returns its bytes and stays buffered, so replaying the
///   output of a previous replay is free.
/// - A streaming body is collected and replaced by a buffered copy.
///
/// If the stream fails, the error is returned and the slot is left holding
/// an empty body. Nothing read before the failure is kept.
///
/// # Examples
///
/// ```
/// # async fn demo() -> Result<(), std::convert::Infallible> {
/// use bytes::Bytes;
/// use http_body_util::Full;
/// use rewind_http::{BufferedBody, body::replay};
///
/// let mut slot = BufferedBody::Passthrough(Full::new(Bytes::from("payload")));
/// let first = replay(&mut slot).await?;
/// let second = replay(&mut slot).await?;
/// assert_eq!(first, second);
/// # Ok(())
/// # }
/// ```
pub async fn replay<B>(slot: &mut BufferedBody<B>) -> Result<Bytes, B::Error>
where
    B: HttpBody,
    B::Data: Send,
{
    match mem::replace(slot, BufferedBody::Complete(None)) {
        BufferedBody::Complete(Some(bytes)) => {
            *slot = BufferedBody::Complete(Some(bytes.clone()));
            Ok(bytes)
        }
        BufferedBody::Complete(None) => Ok(Bytes::new()),
        BufferedBody::Passthrough(body) => {
            let bytes = body.collect().await?.to_bytes();
            trace!(len = bytes.len(), "body replayed");
            *slot = BufferedBody::Complete(Some(bytes.clone()));
            Ok(bytes)
        }
    }
}

impl<B> HttpBody for BufferedBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            BufferedBodyProj::Complete(data) => match data.take() {
                Some(bytes) if !bytes.is_empty() => Poll::Ready(Some(Ok(Frame::data(bytes)))),
                _ => Poll::Ready(None),
            },
            BufferedBodyProj::Passthrough(body) => match body.poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            BufferedBody::Complete(Some(bytes)) => {
                http_body::SizeHint::with_exact(bytes.len() as u64)
            }
            BufferedBody::Complete(None) => http_body::SizeHint::with_exact(0),
            BufferedBody::Passthrough(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            BufferedBody::Complete(Some(bytes)) => bytes.is_empty(),
            BufferedBody::Complete(None) => true,
            BufferedBody::Passthrough(body) => body.is_end_stream(),
        }
    }
}

impl<B> Default for BufferedBody<B>
where
    B: HttpBody,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<B> fmt::Debug for BufferedBody<B>
where
    B: HttpBody,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferedBody::Complete(Some(bytes)) => f
                .debug_tuple("Complete")
                .field(&format!("{} bytes", bytes.len()))
                .finish(),
            BufferedBody::Complete(None) => f.debug_tuple("Complete").field(&"empty").finish(),
            BufferedBody::Passthrough(_) => f.debug_tuple("Passthrough").field(&"...").finish(),
        }
    }
}
