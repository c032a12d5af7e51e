//! Rate limiter trait and admission policy types.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request admitted; `remaining` slots left in the current window.
    Allowed { remaining: u32 },
    /// Request rejected until the window resets.
    Denied { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

/// Admission policy for one limiter instance.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    /// Requests admitted per window per client key.
    pub capacity: u32,
    /// Fixed window length.
    pub window: Duration,
    /// When true, a successful outcome refunds the slot it consumed.
    /// Used by the login limiter so only failed attempts count.
    pub skip_successful: bool,
}

impl RateLimitPolicy {
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            capacity,
            window,
            skip_successful: false,
        }
    }

    pub fn skip_successful(mut self) -> Self {
        self.skip_successful = true;
        self
    }
}

/// Interface for admission-control counter stores.
///
/// The counters are the only mutable state shared between requests;
/// implementations must make increment-then-compare atomic per client key.
/// Store failures must fail open (admit and log) rather than reject traffic.
///
/// # Implementations
///
/// - [`crate::infrastructure::limiter::MemoryRateLimiter`] - in-process counters
/// - [`crate::infrastructure::limiter::RedisRateLimiter`] - shared counters
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Counts a request against `key`'s current window and decides admission.
    async fn check(&self, key: IpAddr) -> Decision;

    /// Reports how the admitted request ended.
    ///
    /// Limiters configured with `skip_successful` refund the slot when
    /// `succeeded` is true; all other limiters ignore the call.
    async fn record_outcome(&self, key: IpAddr, succeeded: bool);

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> bool;
}
