//! Metrics declaration and recording.

use std::time::Duration;

use rewind_core::CacheContext;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track number of cache hit events.
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "rewind_cache_hit_total",
            "Total number of round trips answered from a recorded entry."
        );
        "rewind_cache_hit_total"
    };
    /// Track number of cache miss events.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "rewind_cache_miss_total",
            "Total number of round trips forwarded to the transport."
        );
        "rewind_cache_miss_total"
    };
    /// Track number of recorded exchanges.
    pub static ref CACHE_RECORDED_COUNTER: &'static str = {
        metrics::describe_counter!(
            "rewind_cache_recorded_total",
            "Total number of exchanges appended to the store."
        );
        "rewind_cache_recorded_total"
    };
    /// Histogram of round trip duration.
    pub static ref CACHE_REQUEST_DURATION: &'static str = {
        metrics::describe_histogram!(
            "rewind_request_duration_seconds",
            metrics::Unit::Seconds,
            "Duration of cached round trips in seconds."
        );
        "rewind_request_duration_seconds"
    };
}

/// Records the outcome of a finished round trip.
///
/// `backend` labels every series with the store's
/// [`name`](rewind_backend::Backend::name).
///
/// When the `metrics` feature is disabled, this function is a no-op.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_context_metrics(ctx: &CacheContext, backend: &str, duration: Duration) {
    let status = ctx.status.as_str();

    metrics::histogram!(
        *CACHE_REQUEST_DURATION,
        "status" => status,
        "backend" => backend.to_string()
    )
    .record(duration.as_secs_f64());

    let counter = match ctx.status {
        rewind_core::CacheStatus::Hit => *CACHE_HIT_COUNTER,
        rewind_core::CacheStatus::Miss => *CACHE_MISS_COUNTER,
    };
    metrics::counter!(counter, "backend" => backend.to_string()).increment(1);

    if ctx.recorded {
        metrics::counter!(*CACHE_RECORDED_COUNTER, "backend" => backend.to_string()).increment(1);
    }
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_context_metrics(_ctx: &CacheContext, _backend: &str, _duration: Duration) {}
