//! In-process fixed-window rate limiter.

use super::service::{Decision, RateLimitPolicy, RateLimiter};
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Counter state for one client key.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: Instant,
}

/// Per-process counter store.
///
/// A single mutex guards the whole map, which keeps increment-then-compare
/// atomic per key. Windows are created lazily on a key's first request and
/// reset in place once the window elapses; [`MemoryRateLimiter::prune`]
/// evicts expired entries and is driven by a background task in the server.
pub struct MemoryRateLimiter {
    policy: RateLimitPolicy,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl MemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admission check against an explicit clock reading.
    ///
    /// The count keeps incrementing past capacity so `remaining` stays
    /// truthful; only the first `capacity` requests per window are admitted.
    pub fn check_at(&self, key: IpAddr, now: Instant) -> Decision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let window = windows.entry(key).or_insert(Window {
            count: 0,
            started_at: now,
        });

        if now.duration_since(window.started_at) >= self.policy.window {
            window.count = 0;
            window.started_at = now;
        }

        window.count = window.count.saturating_add(1);

        if window.count > self.policy.capacity {
            let elapsed = now.duration_since(window.started_at);
            Decision::Denied {
                retry_after: self.policy.window.saturating_sub(elapsed),
            }
        } else {
            Decision::Allowed {
                remaining: self.policy.capacity - window.count,
            }
        }
    }

    /// Refunds one admitted slot for `key` if its window is still current.
    pub fn refund_at(&self, key: IpAddr, now: Instant) {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(window) = windows.get_mut(&key)
            && now.duration_since(window.started_at) < self.policy.window
        {
            window.count = window.count.saturating_sub(1);
        }
    }

    /// Evicts keys whose window has elapsed. Returns the number removed.
    pub fn prune(&self, now: Instant) -> usize {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started_at) < self.policy.window);
        before - windows.len()
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check(&self, key: IpAddr) -> Decision {
        self.check_at(key, Instant::now())
    }

    async fn record_outcome(&self, key: IpAddr, succeeded: bool) {
        if self.policy.skip_successful && succeeded {
            self.refund_at(key, Instant::now());
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}
