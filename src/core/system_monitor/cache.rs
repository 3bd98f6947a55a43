use std::time::{Duration, Instant};

/// Keeps the last fetched value for a fixed lifetime.
///
/// The stale value stays available after expiry so callers can keep showing
/// it when a refresh fails.
#[derive(Debug, Clone)]
pub struct TimedCache<T> {
    ttl: Duration,
    value: Option<T>,
    fetched_at: Option<Instant>,
}

impl<T> TimedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            value: None,
            fetched_at: None,
        }
    }

    /// The cached value, if it is younger than the lifetime at `now`
    pub fn fresh(&self, now: Instant) -> Option<&T> {
        let fetched_at = self.fetched_at?;
        if now.saturating_duration_since(fetched_at) < self.ttl {
            self.value.as_ref()
        } else {
            None
        }
    }

    /// The last stored value regardless of age
    pub fn last(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn store(&mut self, now: Instant, value: T) {
        self.value = Some(value);
        self.fetched_at = Some(now);
    }

    /// Expire the value but keep it as the stale fallback
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }
}
