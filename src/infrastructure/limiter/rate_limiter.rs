use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::interval;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// A token bucket with fractional refill.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    fn full(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_refill: now,
            last_seen: now,
        }
    }

    fn refill(&mut self, capacity: f64, refill_per_sec: f64, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * refill_per_sec).min(capacity);
        self.last_refill = now;
    }
}

/// Per-client throttle for public form posts.
///
/// Each key (for example `comment:203.0.113.7`) owns a bucket of `burst`
/// tokens refilled at `per_minute` tokens a minute.
#[derive(Clone)]
pub struct ThrottleStore {
    buckets: Arc<DashMap<String, Arc<Mutex<TokenBucket>>>>,
    capacity: f64,
    refill_per_sec: f64,
    idle_ttl: Duration,
}

impl ThrottleStore {
    pub fn new(burst: u32, per_minute: u32) -> Self {
        let capacity = f64::from(burst.max(1));
        let refill_per_sec = f64::from(per_minute.max(1)) / 60.0;
        // an idle bucket is back to full after this long, so it can be dropped
        let idle_ttl = Duration::from_secs_f64(capacity / refill_per_sec);

        Self {
            buckets: Arc::new(DashMap::new()),
            capacity,
            refill_per_sec,
            idle_ttl,
        }
    }

    /// Takes one token for `key`. On refusal returns the seconds until a token is available.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        let bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TokenBucket::full(self.capacity, now))))
            .clone();

        let mut bucket = bucket.lock();
        bucket.refill(self.capacity, self.refill_per_sec, now);
        bucket.last_seen = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            let wait = (1.0 - bucket.tokens) / self.refill_per_sec;
            Err((wait.ceil() as u64).max(1))
        }
    }

    /// Drops buckets that have been idle long enough to be full again.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let before = self.buckets.len();
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.lock().last_seen) <= self.idle_ttl);
        before - self.buckets.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }

    /// Runs `evict_idle` periodically on the current tokio runtime.
    pub fn spawn_eviction(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(EVICTION_INTERVAL);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle();
                if evicted > 0 {
                    tracing::debug!(evicted, "Evicted idle throttle buckets");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_is_allowed_then_refused() {
        let store = ThrottleStore::new(3, 60);
        let now = Instant::now();

        for _ in 0..3 {
            assert!(store.check_at("login:1.2.3.4", now).is_ok());
        }
        let retry = store.check_at("login:1.2.3.4", now).unwrap_err();
        assert_eq!(retry, 1);
    }

    #[test]
    fn keys_are_independent() {
        let store = ThrottleStore::new(1, 1);
        let now = Instant::now();

        assert!(store.check_at("comment:a", now).is_ok());
        assert!(store.check_at("comment:a", now).is_err());
        assert!(store.check_at("comment:b", now).is_ok());
        assert_eq!(store.tracked_keys(), 2);
    }

    #[test]
    fn tokens_refill_over_time() {
        let store = ThrottleStore::new(1, 60);
        let start = Instant::now();

        assert!(store.check_at("k", start).is_ok());
        assert!(store.check_at("k", start).is_err());
        assert!(store.check_at("k", start + Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn retry_after_reflects_refill_rate() {
        let store = ThrottleStore::new(1, 6);
        let now = Instant::now();

        store.check_at("k", now).unwrap();
        assert_eq!(store.check_at("k", now).unwrap_err(), 10);
    }
}
