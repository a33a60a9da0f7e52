use std::sync::atomic::{AtomicU64, Ordering};

/// Per-decorator tallies of where responses came from.
///
/// Shared by every round trip of a decorator, so updates are atomic.
#[derive(Debug, Default)]
pub struct CacheCounters {
    from_cache: AtomicU64,
    not_from_cache: AtomicU64,
}

impl CacheCounters {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Round trips answered from a recorded entry.
    pub fn requests_from_cache(&self) -> u64 {
        self.from_cache.load(Ordering::Relaxed)
    }

    /// Round trips answered by the transport, whatever the status.
    pub fn requests_not_from_cache(&self) -> u64 {
        self.not_from_cache.load(Ordering::Relaxed)
    }

    pub(crate) fn record_hit(&self) {
        self.from_cache.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.not_from_cache.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn concurrent_updates_are_not_lost() {
        let counters = Arc::new(CacheCounters::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let counters = counters.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        if i % 2 == 0 {
                            counters.record_hit();
                        } else {
                            counters.record_miss();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counters.requests_from_cache(), 4000);
        assert_eq!(counters.requests_not_from_cache(), 4000);
    }
}
