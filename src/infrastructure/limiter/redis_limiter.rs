//! Redis-backed fixed-window rate limiter.
//!
//! Lets several gateway processes share one set of admission counters. All
//! operations are fail-open: a store error admits the request and logs a
//! warning rather than rejecting traffic.

use super::service::{Decision, RateLimitPolicy, RateLimiter};
use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::net::IpAddr;
use std::time::Duration;
use tracing::warn;

/// Shared counter store keyed per limiter instance and client IP.
///
/// Uses `INCR` with an `EXPIRE` stamped on the window's first request, and
/// `DECR` to refund successful outcomes on `skip_successful` limiters.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    policy: RateLimitPolicy,
    key_prefix: String,
}

impl RedisRateLimiter {
    /// Creates a limiter on an established connection.
    ///
    /// `name` namespaces this instance's keys so the global and login
    /// limiters never share counters.
    pub fn new(conn: ConnectionManager, name: &str, policy: RateLimitPolicy) -> Self {
        Self {
            conn,
            policy,
            key_prefix: format!("ratelimit:{}:", name),
        }
    }

    fn build_key(&self, key: IpAddr) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: IpAddr) -> Decision {
        let redis_key = self.build_key(key);
        let mut conn = self.conn.clone();
        let window_secs = self.policy.window.as_secs().max(1);

        let count: u64 = match conn.incr(&redis_key, 1i64).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Redis INCR error for {}: {}", redis_key, e);
                return Decision::Allowed { remaining: 0 };
            }
        };

        if count == 1
            && let Err(e) = conn.expire::<_, ()>(&redis_key, window_secs as i64).await
        {
            warn!("Redis EXPIRE error for {}: {}", redis_key, e);
        }

        if count > u64::from(self.policy.capacity) {
            let retry_after = match conn.ttl::<_, i64>(&redis_key).await {
                Ok(ttl) if ttl > 0 => Duration::from_secs(ttl as u64),
                _ => self.policy.window,
            };
            Decision::Denied { retry_after }
        } else {
            Decision::Allowed {
                remaining: self.policy.capacity - count as u32,
            }
        }
    }

    async fn record_outcome(&self, key: IpAddr, succeeded: bool) {
        if !self.policy.skip_successful || !succeeded {
            return;
        }

        let redis_key = self.build_key(key);
        let mut conn = self.conn.clone();

        match conn.decr::<_, _, i64>(&redis_key, 1i64).await {
            Ok(count) if count < 0 => {
                // The window expired between check and outcome; drop the stray
                // negative counter instead of letting it grant extra slots.
                if let Err(e) = conn.del::<_, ()>(&redis_key).await {
                    warn!("Redis DEL error for {}: {}", redis_key, e);
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Redis DECR error for {}: {}", redis_key, e);
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }
}
