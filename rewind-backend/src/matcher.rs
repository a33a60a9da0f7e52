//! Request-to-entry equivalence.

use std::fmt;
use std::sync::Arc;

use http::Method;
use rewind_core::{BodyMatch, CacheEntry, MatchSubject, Normalizer, carries_body};

use crate::{BackendError, BackendResult};

/// Decides whether an in-flight request is equivalent to a recorded entry.
///
/// Three checks, all of which must pass:
///
/// 1. the method is identical (case-sensitive),
/// 2. the URL string is identical, byte for byte,
/// 3. for `POST`, `PUT` and `PATCH` only, the bodies are equal under the
///    configured [`Normalizer`]. Two empty bodies always match.
///
/// A disagreement is a plain `false`; only a failure to read the request body
/// is an error.
#[derive(Clone)]
pub struct Matcher {
    normalizer: Arc<dyn Normalizer>,
}

impl Matcher {
    /// Creates a matcher comparing bodies through `normalizer`.
    pub fn new(normalizer: impl Normalizer + 'static) -> Self {
        Self {
            normalizer: Arc::new(normalizer),
        }
    }

    /// Creates a matcher from an already shared normalizer.
    pub fn from_shared(normalizer: Arc<dyn Normalizer>) -> Self {
        Self { normalizer }
    }

    /// Method and URL comparison, which needs no body.
    pub fn matches_head(&self, entry: &CacheEntry, method: &Method, url: &str) -> bool {
        entry.method() == method && entry.url() == url
    }

    /// Runs all three checks against `entry`.
    pub async fn matches(
        &self,
        entry: &CacheEntry,
        subject: &mut (dyn MatchSubject + '_),
    ) -> BackendResult<bool> {
        if !self.matches_head(entry, subject.method(), subject.url()) {
            return Ok(false);
        }
        if !carries_body(subject.method()) {
            return Ok(true);
        }
        let body = subject.body().await.map_err(BackendError::RequestBody)?;
        Ok(self.bodies_equal(entry.body(), &body))
    }

    /// Body comparison under the configured normalizer.
    pub fn bodies_equal(&self, recorded: &[u8], incoming: &[u8]) -> bool {
        if recorded.is_empty() && incoming.is_empty() {
            return true;
        }
        self.normalizer.normalize(recorded) == self.normalizer.normalize(incoming)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(BodyMatch::Raw)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher").finish_non_exhaustive()
    }
}
