//! Finite State Machine for a cached round trip.
//!
//! Looks the request up, answers from a recorded entry on a hit, and on a miss
//! forwards the request and records successful exchanges.

mod future;
mod states;

pub use future::CacheFuture;
pub use states::{CaptureFuture, LookupFuture, RecordFuture, Recording, State};
