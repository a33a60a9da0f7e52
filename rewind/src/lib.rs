#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! # rewind
//!
//! Record-and-replay caching for HTTP clients.
//!
//! A round trip first searches the store for a recorded exchange with the same
//! method, URL and (for body-bearing methods) body. A match is answered with a
//! `200 OK` rebuilt from the recording and never reaches the network. Anything
//! else is forwarded to the real transport; `200 OK` responses are recorded on
//! the way back.
//!
//! This crate holds the round trip itself ([`fsm::CacheFuture`]), its
//! [`CacheError`] and the [`CacheCounters`] it updates. Framework adapters
//! live in `rewind-tower` and `rewind-reqwest`.

mod counters;

/// Error types for cached round trips.
pub mod error;

/// Finite State Machine for cache orchestration.
pub mod fsm;

/// Metrics collection for cache observability.
///
/// When the `metrics` feature is enabled, round trips are counted by status
/// and timed through the [`metrics`](https://docs.rs/metrics) facade.
pub mod metrics;

pub use counters::CacheCounters;
pub use error::CacheError;

pub use rewind_backend::{Backend, BackendError, MemoryBackend};
pub use rewind_core::{BodyMatch, CacheContext, CacheEntry, CacheStatus, Upstream};
