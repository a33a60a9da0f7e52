use std::sync::Arc;

use http::header::HeaderName;
use rewind::CacheCounters;
use rewind_backend::{Backend, MemoryBackend};
use tower::Layer;

use crate::service::CacheService;

/// Tower [`Layer`] that wraps a transport service in the record-and-replay cache.
///
/// Every service produced by one layer shares its backend and counters.
pub struct CacheLayer<B = MemoryBackend> {
    backend: Arc<B>,
    counters: Arc<CacheCounters>,
    cache_status_header: Option<HeaderName>,
}

impl CacheLayer<MemoryBackend> {
    /// A layer over an empty in-memory store.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder with an empty in-memory store.
    pub fn builder() -> CacheLayerBuilder<MemoryBackend> {
        CacheLayerBuilder::default()
    }
}

impl Default for CacheLayer<MemoryBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> CacheLayer<B> {
    /// The shared store.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// The shared hit and miss tallies.
    pub fn counters(&self) -> &Arc<CacheCounters> {
        &self.counters
    }
}

impl<B> Clone for CacheLayer<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            counters: self.counters.clone(),
            cache_status_header: self.cache_status_header.clone(),
        }
    }
}

impl<S, B> Layer<S> for CacheLayer<B> {
    type Service = CacheService<S, B>;

    fn layer(&self, upstream: S) -> Self::Service {
        CacheService::new(
            upstream,
            Arc::clone(&self.backend),
            Arc::clone(&self.counters),
            self.cache_status_header.clone(),
        )
    }
}

/// Builder for [`CacheLayer`].
///
/// # Default
///
/// An empty [`MemoryBackend`], fresh counters, and no cache status header.
pub struct CacheLayerBuilder<B> {
    backend: B,
    counters: Option<Arc<CacheCounters>>,
    cache_status_header: Option<HeaderName>,
}

impl<B> CacheLayerBuilder<B>
where
    B: Backend,
{
    /// Replaces the store.
    pub fn backend<NB: Backend>(self, backend: NB) -> CacheLayerBuilder<NB> {
        CacheLayerBuilder {
            backend,
            counters: self.counters,
            cache_status_header: self.cache_status_header,
        }
    }

    /// Reports into existing counters instead of fresh ones.
    pub fn counters(self, counters: Arc<CacheCounters>) -> Self {
        CacheLayerBuilder {
            counters: Some(counters),
            ..self
        }
    }

    /// Writes `HIT` or `MISS` into `header` on every successful response.
    ///
    /// Use [`DEFAULT_CACHE_STATUS_HEADER`](crate::DEFAULT_CACHE_STATUS_HEADER)
    /// for `x-cache-status`.
    pub fn cache_status_header(self, header: HeaderName) -> Self {
        CacheLayerBuilder {
            cache_status_header: Some(header),
            ..self
        }
    }

    /// Builds the layer.
    pub fn build(self) -> CacheLayer<B> {
        CacheLayer {
            backend: Arc::new(self.backend),
            counters: self.counters.unwrap_or_default(),
            cache_status_header: self.cache_status_header,
        }
    }
}

impl Default for CacheLayerBuilder<MemoryBackend> {
    fn default() -> Self {
        Self {
            backend: MemoryBackend::new(),
            counters: None,
            cache_status_header: None,
        }
    }
}
