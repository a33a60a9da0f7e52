use rewind_backend::BackendError;
use rewind_core::BoxError;
use thiserror::Error;

/// Error returned by a cached round trip.
///
/// `E` is the transport's own error. It is carried unchanged in
/// [`CacheError::Upstream`] so adapters can hand it back to the caller as is.
#[derive(Debug, Error)]
pub enum CacheError<E> {
    /// The request body could not be read. Nothing was forwarded or recorded.
    #[error("failed to read request body: {0}")]
    RequestBody(#[source] BoxError),
    /// The response body could not be read. Nothing was recorded.
    #[error("failed to read response body: {0}")]
    ResponseBody(#[source] BoxError),
    /// The store failed to look up or record an entry.
    #[error(transparent)]
    Backend(BackendError),
    /// The transport failed.
    #[error(transparent)]
    Upstream(E),
}

impl<E> From<BackendError> for CacheError<E> {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::RequestBody(source) => CacheError::RequestBody(source),
            other => CacheError::Backend(other),
        }
    }
}
