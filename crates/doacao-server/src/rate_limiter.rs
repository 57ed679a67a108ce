// SPDX-License-Identifier: Apache-2.0

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::Mutex;

/// Map size above which a new key triggers an idle sweep.
const PRUNE_THRESHOLD: usize = 4096;

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    /// A bucket that has refilled to capacity holds no state worth keeping.
    fn is_idle(&self, cfg: &RateLimitConfig, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens + elapsed * cfg.refill_per_sec >= cfg.capacity
    }
}

fn retain_active(
    buckets: &mut HashMap<String, Bucket>,
    cfg: &RateLimitConfig,
    now: Instant,
) -> usize {
    let before = buckets.len();
    buckets.retain(|_, bucket| !bucket.is_idle(cfg, now));
    before - buckets.len()
}

/// Per-key token buckets for the payment endpoints.
#[derive(Debug, Default)]
pub(crate) struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub(crate) async fn allow(&self, key: &str, cfg: &RateLimitConfig) -> bool {
        self.allow_at(key, cfg, Instant::now()).await
    }

    pub(crate) async fn allow_at(&self, key: &str, cfg: &RateLimitConfig, now: Instant) -> bool {
        let mut lock = self.buckets.lock().await;
        if lock.len() >= PRUNE_THRESHOLD && !lock.contains_key(key) {
            retain_active(&mut lock, cfg, now);
        }
        let bucket = lock.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: cfg.capacity,
            last_refill: now,
        });
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + (elapsed * cfg.refill_per_sec)).min(cfg.capacity);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drops buckets that have refilled to capacity.
    pub(crate) async fn prune_idle(&self, cfg: &RateLimitConfig) -> usize {
        self.prune_idle_at(cfg, Instant::now()).await
    }

    pub(crate) async fn prune_idle_at(&self, cfg: &RateLimitConfig, now: Instant) -> usize {
        retain_active(&mut *self.buckets.lock().await, cfg, now)
    }

    #[cfg(test)]
    pub(crate) async fn tracked_keys(&self) -> usize {
        self.buckets.lock().await.len()
    }
}
