//! A reqwest client with the cache already wired in.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use http::header::HeaderName;
use reqwest_middleware::ClientWithMiddleware;
use rewind::CacheCounters;
use rewind_backend::{Backend, MemoryBackend};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::middleware::{CacheMiddleware, CacheMiddlewareBuilder};

/// Overall request timeout used unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the client built by [`CachingClientBuilder`].
///
/// ```
/// use std::time::Duration;
/// use rewind_reqwest::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(r#"{"timeout": "500ms"}"#).unwrap();
/// assert_eq!(config.timeout, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overall timeout for one request, connect to last body byte.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A `reqwest` client whose requests go through a [`CacheMiddleware`].
///
/// Derefs to [`ClientWithMiddleware`], so requests are sent the usual way:
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use rewind_reqwest::CachingClient;
///
/// let client = CachingClient::new()?;
/// let body = client.get("http://localhost:8080/status").send().await?.text().await?;
/// # Ok(())
/// # }
/// ```
pub struct CachingClient<B = MemoryBackend> {
    client: ClientWithMiddleware,
    middleware: Option<CacheMiddleware<B>>,
}

impl CachingClient<MemoryBackend> {
    /// A client over an empty in-memory store with the default 30 second timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    /// Creates a builder with an empty in-memory store.
    pub fn builder() -> CachingClientBuilder<MemoryBackend> {
        CachingClientBuilder::default()
    }
}

impl<B> CachingClient<B> {
    /// The cache middleware, or `None` if this client was not built with one.
    pub fn middleware(&self) -> Option<&CacheMiddleware<B>> {
        self.middleware.as_ref()
    }

    /// The store behind the cache, or `None` if this client was not built with one.
    pub fn cache(&self) -> Option<&Arc<B>> {
        self.middleware.as_ref().map(CacheMiddleware::backend)
    }

    /// Hit and miss tallies, or `None` if this client was not built with a cache.
    pub fn counters(&self) -> Option<&Arc<CacheCounters>> {
        self.middleware.as_ref().map(CacheMiddleware::counters)
    }

    /// The wrapped middleware client.
    pub fn client(&self) -> &ClientWithMiddleware {
        &self.client
    }

    /// Unwraps the middleware client, dropping access to the cache.
    pub fn into_inner(self) -> ClientWithMiddleware {
        self.client
    }
}

impl<B> Deref for CachingClient<B> {
    type Target = ClientWithMiddleware;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl<B> Clone for CachingClient<B> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            middleware: self.middleware.clone(),
        }
    }
}

/// Wraps a client that carries no cache. [`CachingClient::cache`] returns `None`.
impl<B> From<ClientWithMiddleware> for CachingClient<B> {
    fn from(client: ClientWithMiddleware) -> Self {
        Self {
            client,
            middleware: None,
        }
    }
}

/// Builder for [`CachingClient`].
pub struct CachingClientBuilder<B> {
    middleware: CacheMiddlewareBuilder<B>,
    client_builder: Option<reqwest::ClientBuilder>,
    config: ClientConfig,
}

impl<B> CachingClientBuilder<B>
where
    B: Backend + 'static,
{
    /// Replaces the store.
    pub fn backend<NB: Backend + 'static>(self, backend: NB) -> CachingClientBuilder<NB> {
        CachingClientBuilder {
            middleware: self.middleware.backend(backend),
            client_builder: self.client_builder,
            config: self.config,
        }
    }

    /// Reports into existing counters instead of fresh ones.
    pub fn counters(mut self, counters: Arc<CacheCounters>) -> Self {
        self.middleware = self.middleware.counters(counters);
        self
    }

    /// Writes `HIT` or `MISS` into `header` on every successful response.
    pub fn cache_status_header(mut self, header: HeaderName) -> Self {
        self.middleware = self.middleware.cache_status_header(header);
        self
    }

    /// The transport misses are sent through. The configured timeout is
    /// applied on top of it.
    pub fn client_builder(mut self, client_builder: reqwest::ClientBuilder) -> Self {
        self.client_builder = Some(client_builder);
        self
    }

    /// Overall request timeout. Defaults to [`DEFAULT_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Replaces every client setting at once.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the `reqwest::Client` and wires the cache in front of it.
    pub fn build(self) -> Result<CachingClient<B>, reqwest::Error> {
        debug!(timeout = ?self.config.timeout, "building caching client");
        let client = self
            .client_builder
            .unwrap_or_default()
            .timeout(self.config.timeout)
            .build()?;
        let middleware = self.middleware.build();
        let client = reqwest_middleware::ClientBuilder::new(client)
            .with(middleware.clone())
            .build();
        Ok(CachingClient {
            client,
            middleware: Some(middleware),
        })
    }
}

impl Default for CachingClientBuilder<MemoryBackend> {
    fn default() -> Self {
        Self {
            middleware: CacheMiddlewareBuilder::default(),
            client_builder: None,
            config: ClientConfig::default(),
        }
    }
}
