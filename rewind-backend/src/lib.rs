//! Storage backends and request matching for Rewind.
//!
//! If you want to keep recordings somewhere other than process memory,
//! implement [`Backend`]: the round-trip state machine only ever calls
//! [`Backend::find_match`] and [`Backend::add`].
mod backend;
mod error;
pub mod matcher;
pub mod memory;

pub use backend::{Backend, BackendResult};
pub use error::{BackendError, SnapshotError};
pub use matcher::Matcher;
pub use memory::{MemoryBackend, MemoryBackendBuilder, MemoryConfig, MemorySnapshot};
