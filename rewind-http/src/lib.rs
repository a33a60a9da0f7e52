//! HTTP request and response wrappers for the Rewind cache.
//!
//! Bodies travel in a [`BufferedBody`] so they can be read by the cache and
//! still be forwarded or returned intact.

pub mod body;
mod cache_status;
mod request;
mod response;

pub use body::{BufferedBody, replay};
pub use cache_status::DEFAULT_CACHE_STATUS_HEADER;
pub use request::CacheableHttpRequest;
pub use response::CacheableHttpResponse;
