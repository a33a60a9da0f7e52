use std::sync::Arc;

use async_trait::async_trait;
use rewind_core::{CacheEntry, MatchSubject};

use crate::BackendError;

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Storage for recorded exchanges.
///
/// A backend is an ordered, append-only sequence of [`CacheEntry`] values
/// shared by every concurrent round trip. Implementations must make an entry
/// visible to lookups only once `add` has completed, and must keep concurrent
/// `add` calls from corrupting each other.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Appends an entry. No deduplication is performed.
    async fn add(&self, entry: CacheEntry) -> BackendResult<()>;

    /// Returns the first recorded entry, in insertion order, that matches the
    /// request, or `None` when nothing does.
    ///
    /// The request body is read through [`MatchSubject::body`] at most once
    /// regardless of how many entries are compared, and the subject stays
    /// forwardable afterwards.
    async fn find_match(
        &self,
        subject: &mut (dyn MatchSubject + '_),
    ) -> BackendResult<Option<Arc<CacheEntry>>>;

    /// Returns the name of this backend for logs and metrics.
    fn name(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn add(&self, entry: CacheEntry) -> BackendResult<()> {
        (**self).add(entry).await
    }

    async fn find_match(
        &self,
        subject: &mut (dyn MatchSubject + '_),
    ) -> BackendResult<Option<Arc<CacheEntry>>> {
        (**self).find_match(subject).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl Backend for Arc<dyn Backend> {
    async fn add(&self, entry: CacheEntry) -> BackendResult<()> {
        (**self).add(entry).await
    }

    async fn find_match(
        &self,
        subject: &mut (dyn MatchSubject + '_),
    ) -> BackendResult<Option<Arc<CacheEntry>>> {
        (**self).find_match(subject).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
