//! Cache context types for tracking round trip results.

/// Whether a round trip was answered from the cache or from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    /// A recorded entry matched and its response was replayed.
    Hit,
    /// No entry matched; the request was forwarded to the transport.
    #[default]
    Miss,
}

impl CacheStatus {
    /// Returns the status as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
        }
    }
}

/// Outcome of a single round trip, returned next to the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheContext {
    /// Hit or miss.
    pub status: CacheStatus,
    /// Whether the forwarded exchange was appended to the store.
    pub recorded: bool,
}

impl CacheContext {
    /// Context for a round trip served from a recorded entry.
    pub fn hit() -> Self {
        Self {
            status: CacheStatus::Hit,
            recorded: false,
        }
    }
}
