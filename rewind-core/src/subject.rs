use async_trait::async_trait;
use bytes::Bytes;
use http::Method;

use crate::BoxError;

/// The view of an in-flight request that matching needs.
///
/// `body` may be called any number of times during one lookup; implementations
/// read the underlying stream at most once and hand out the same bytes after
/// that, leaving the request itself forwardable.
#[async_trait]
pub trait MatchSubject: Send {
    /// Request method.
    fn method(&self) -> &Method;

    /// Fully resolved request URL.
    fn url(&self) -> &str;

    /// Request body bytes, read on first use.
    async fn body(&mut self) -> Result<Bytes, BoxError>;
}
