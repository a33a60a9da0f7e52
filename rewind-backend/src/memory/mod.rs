//! In-memory backend, the default store.

mod builder;
mod config;
mod snapshot;

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use rewind_core::{CacheEntry, MatchSubject};
use tracing::{debug, instrument};

use crate::{Backend, BackendResult, Matcher};

pub use builder::MemoryBackendBuilder;
pub use config::MemoryConfig;
pub use snapshot::MemorySnapshot;

/// Ordered in-memory store of recorded exchanges.
///
/// Entries live in a `Vec` behind an [`RwLock`]: appends take the write lock
/// for a single `push`, lookups take the read lock only long enough to collect
/// the entries whose method and URL match, then compare bodies without holding
/// it. Clones share the same storage.
///
/// # Examples
///
/// ```
/// use rewind_backend::MemoryBackend;
/// use rewind_core::BodyMatch;
///
/// let backend = MemoryBackend::builder()
///     .body_match(BodyMatch::Json)
///     .build();
/// assert!(backend.is_empty());
/// ```
///
/// # Caveats
///
/// - Nothing is ever evicted; the store grows with every recorded exchange.
/// - Data is **not shared** across processes. Use [`MemoryBackend::to_json`]
///   to hand a recording to another process.
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    entries: Arc<RwLock<Vec<Arc<CacheEntry>>>>,
    matcher: Matcher,
    respond_from_cache: bool,
}

impl MemoryBackend {
    /// Creates an empty store with raw body matching.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder.
    pub fn builder() -> MemoryBackendBuilder {
        MemoryBackendBuilder::new()
    }

    /// Creates an empty store from deserialized configuration.
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::builder()
            .respond_from_cache(config.respond_from_cache)
            .body_match(config.body_match)
            .build()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Recorded entries in insertion order.
    pub fn entries(&self) -> Vec<Arc<CacheEntry>> {
        self.read().clone()
    }

    /// Whether lookups may return recorded entries.
    ///
    /// When `false` the store only traces: every lookup misses, every
    /// successful exchange is still recorded.
    pub fn responds_from_cache(&self) -> bool {
        self.respond_from_cache
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<CacheEntry>>> {
        // Entries are immutable and a push cannot be observed half done.
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn add(&self, entry: CacheEntry) -> BackendResult<()> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.push(Arc::new(entry));
        debug!(entries = entries.len(), "memory backend recorded entry");
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(backend = "memory"))]
    async fn find_match(
        &self,
        subject: &mut (dyn MatchSubject + '_),
    ) -> BackendResult<Option<Arc<CacheEntry>>> {
        if !self.respond_from_cache {
            return Ok(None);
        }

        let candidates: Vec<Arc<CacheEntry>> = self
            .read()
            .iter()
            .filter(|entry| {
                self.matcher
                    .matches_head(entry, subject.method(), subject.url())
            })
            .cloned()
            .collect();

        debug!(candidates = candidates.len(), "memory backend scanning");
        for entry in candidates {
            if self.matcher.matches(&entry, subject).await? {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
