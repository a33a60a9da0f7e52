//! Tower middleware integration for the Rewind record-and-replay cache.
//!
//! This crate provides [`CacheLayer`], a Tower [`Layer`] that sits in front of
//! an HTTP transport service. Requests that match a recorded exchange are
//! answered from the recording; everything else goes to the wrapped service,
//! and `200 OK` responses are recorded on the way back.
//!
//! # Core Concepts
//!
//! - **[`CacheLayer`]**: the Tower [`Layer`]. Use [`CacheLayer::builder()`] to
//!   pick a backend and options.
//! - **[Backend]**: where recorded exchanges live. The default is an empty
//!   [`MemoryBackend`](rewind_backend::MemoryBackend).
//! - **[`CacheCounters`]**: how many round trips were answered from the
//!   recording and how many from the network.
//!
//! [`Layer`]: tower::Layer
//! [Backend]: rewind_backend::Backend
//!
//! # Quick Start
//!
//! ```
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use rewind_backend::MemoryBackend;
//! use rewind_core::BodyMatch;
//! use rewind_http::BufferedBody;
//! use rewind_tower::CacheLayer;
//! use tower::{Layer, service_fn};
//!
//! let layer = CacheLayer::builder()
//!     .backend(MemoryBackend::builder().body_match(BodyMatch::Json).build())
//!     .build();
//!
//! let _service = layer.layer(service_fn(
//!     |_req: http::Request<BufferedBody<Full<Bytes>>>| async {
//!         Ok::<_, std::convert::Infallible>(http::Response::new(Full::new(Bytes::from("Hello"))))
//!     },
//! ));
//! assert_eq!(layer.counters().requests_from_cache(), 0);
//! ```
//!
//! # Errors
//!
//! The service error is [`CacheError<S::Error>`](rewind::CacheError). A
//! transport failure arrives unchanged as `CacheError::Upstream`.
//!
//! # Response Headers
//!
//! No header is added unless asked for. With
//! [`CacheLayerBuilder::cache_status_header`] every successful response
//! carries:
//!
//! | Header Value | Meaning |
//! |--------------|---------|
//! | `HIT` | Response rebuilt from a recorded exchange |
//! | `MISS` | Response fetched from the wrapped service |

#![warn(missing_docs)]

/// Future types for the cache service.
pub mod future;
/// Tower layer and builder.
pub mod layer;
/// The Tower service implementation that performs caching.
pub mod service;
/// Upstream adapter for forwarding cache misses to the wrapped service.
pub mod upstream;

pub use layer::{CacheLayer, CacheLayerBuilder};
pub use rewind::{CacheCounters, CacheError};
pub use rewind_http::DEFAULT_CACHE_STATUS_HEADER;
pub use upstream::TowerUpstream;
