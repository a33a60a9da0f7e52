//! Rewind record-and-replay cache for the [`reqwest`] HTTP client.
//!
//! [`CacheMiddleware`] plugs into a [`reqwest_middleware`] chain. Requests that
//! match a recorded exchange never reach the network; everything else is sent
//! on and `200 OK` responses are recorded for next time.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use rewind_backend::MemoryBackend;
//! use rewind_core::BodyMatch;
//! use rewind_reqwest::CachingClient;
//!
//! let client = CachingClient::builder()
//!     .backend(MemoryBackend::builder().body_match(BodyMatch::Json).build())
//!     .build()?;
//!
//! client.get("http://localhost:8080/users").send().await?;
//! client.get("http://localhost:8080/users").send().await?;
//!
//! let counters = client.counters().expect("built with a cache");
//! assert_eq!(counters.requests_from_cache(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! To add the cache to a chain you assemble yourself:
//!
//! ```
//! use reqwest_middleware::ClientBuilder;
//! use rewind_reqwest::CacheMiddleware;
//!
//! let middleware = CacheMiddleware::new();
//! let client = ClientBuilder::new(reqwest::Client::new())
//!     .with(middleware.clone())
//!     .build();
//! # drop(client);
//! ```
//!
//! Transport errors come back exactly as the rest of the chain produced them.
//! Failures of the cache itself, such as an unreadable body, arrive as
//! [`reqwest_middleware::Error::Middleware`].

mod client;
mod middleware;
mod upstream;

pub use client::{CachingClient, CachingClientBuilder, ClientConfig, DEFAULT_TIMEOUT};
pub use middleware::{CacheMiddleware, CacheMiddlewareBuilder};
pub use upstream::ReqwestUpstream;

pub use rewind::{CacheCounters, CacheError};
pub use rewind_http::DEFAULT_CACHE_STATUS_HEADER;

/// Re-export of the reqwest body type for type annotations.
pub use reqwest::Body as ReqwestBody;
