#![warn(missing_docs)]
//! # rewind-core
//!
//! Core types for the Rewind record-and-replay HTTP cache.
//!
//! Rewind sits in an HTTP client's request path. A request that matches a
//! previously recorded exchange is answered from the recording; anything else
//! is forwarded to the real transport, and successful exchanges are recorded
//! for the next time.
//!
//! This crate holds the pieces every other crate agrees on:
//!
//! - **Record** what was exchanged ([`CacheEntry`])
//! - **Compare** request bodies ([`Normalizer`], [`BodyMatch`])
//! - **Inspect** in-flight requests ([`MatchSubject`])
//! - **Call** the real transport ([`Upstream`])
//! - **Report** the outcome ([`CacheContext`])

pub mod context;
pub mod entry;
pub mod normalize;
mod subject;
pub mod upstream;

pub use context::{CacheContext, CacheStatus};
pub use entry::{CacheEntry, carries_body};
pub use normalize::{BodyMatch, JsonNormalizer, Normalizer};
pub use subject::MatchSubject;
pub use upstream::Upstream;

/// Type-erased error used where a body or backend error crosses crate seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
