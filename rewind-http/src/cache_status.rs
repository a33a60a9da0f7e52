//! Cache status header for HTTP responses.

use http::{HeaderValue, header::HeaderName};
use http_body::Body as HttpBody;
use rewind_core::CacheStatus;

use crate::CacheableHttpResponse;

/// Default header name for cache status (HIT/MISS).
///
/// The value is `x-cache-status`. No header is written unless the cache
/// layer or middleware is configured with one.
pub const DEFAULT_CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache-status");

impl<ResBody> CacheableHttpResponse<ResBody>
where
    ResBody: HttpBody,
{
    /// Writes `HIT` or `MISS` into the `header` response header.
    pub fn set_cache_status(&mut self, status: CacheStatus, header: &HeaderName) {
        let value = match status {
            CacheStatus::Hit => HeaderValue::from_static("HIT"),
            CacheStatus::Miss => HeaderValue::from_static("MISS"),
        };
        self.parts.headers.insert(header.clone(), value);
    }
}
