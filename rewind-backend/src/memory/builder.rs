//! Builder for configuring [`MemoryBackend`].

use std::sync::{Arc, RwLock};

use rewind_core::{BodyMatch, CacheEntry, Normalizer};

use super::{MemoryBackend, MemorySnapshot};
use crate::Matcher;

/// Builder for creating and configuring a [`MemoryBackend`].
///
/// Use [`MemoryBackend::builder`] to create a new builder instance.
///
/// # Examples
///
/// Trace-only store that records but never replays:
///
/// ```
/// use rewind_backend::MemoryBackend;
///
/// let backend = MemoryBackend::builder()
///     .respond_from_cache(false)
///     .build();
/// assert!(!backend.responds_from_cache());
/// ```
pub struct MemoryBackendBuilder {
    respond_from_cache: bool,
    normalizer: Arc<dyn Normalizer>,
    entries: Vec<CacheEntry>,
}

impl MemoryBackendBuilder {
    /// Creates a builder for an empty, replaying store with raw body matching.
    pub fn new() -> Self {
        Self {
            respond_from_cache: true,
            normalizer: Arc::new(BodyMatch::Raw),
            entries: Vec::new(),
        }
    }

    /// Sets whether lookups may return recorded entries.
    ///
    /// # Default
    ///
    /// `true`
    pub fn respond_from_cache(mut self, respond: bool) -> Self {
        self.respond_from_cache = respond;
        self
    }

    /// Selects one of the built-in body-equality policies.
    ///
    /// # Default
    ///
    /// [`BodyMatch::Raw`]
    pub fn body_match(self, policy: BodyMatch) -> Self {
        self.normalizer(policy)
    }

    /// Plugs in a custom body-equality policy.
    pub fn normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    /// Seeds the store with previously recorded entries, kept in order.
    pub fn entries(mut self, entries: impl IntoIterator<Item = CacheEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Seeds the store from a snapshot.
    pub fn snapshot(self, snapshot: MemorySnapshot) -> Self {
        self.entries(snapshot.cached_requests)
    }

    /// Builds the [`MemoryBackend`].
    pub fn build(self) -> MemoryBackend {
        let entries = self.entries.into_iter().map(Arc::new).collect();
        MemoryBackend {
            entries: Arc::new(RwLock::new(entries)),
            matcher: Matcher::from_shared(self.normalizer),
            respond_from_cache: self.respond_from_cache,
        }
    }
}

impl Default for MemoryBackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}
