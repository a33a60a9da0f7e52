use rewind_core::BodyMatch;
use serde::{Deserialize, Serialize};

/// Deserializable settings for a [`MemoryBackend`](super::MemoryBackend).
///
/// ```yaml
/// respond_from_cache: false
/// body_match: json
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Whether lookups may return recorded entries.
    pub respond_from_cache: bool,
    /// Body-equality policy for `POST`, `PUT` and `PATCH` requests.
    pub body_match: BodyMatch,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            respond_from_cache: true,
            body_match: BodyMatch::Raw,
        }
    }
}
