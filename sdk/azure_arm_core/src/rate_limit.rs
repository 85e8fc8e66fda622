//! Shared admission gate for outbound control-plane calls.
//!
//! All resource clients built from one [`ClientConfig`](crate::config::ClientConfig)
//! share a single limiter, so the combined call rate to the cloud provider is
//! bounded regardless of which resource type is being driven.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

/// A throttle bounding the outbound call rate.
///
/// Implementations must be safe for concurrent acquisition from multiple
/// callers. [`acquire`](RateLimiter::acquire) waits (asynchronously) until a
/// token is available; [`try_acquire`](RateLimiter::try_acquire) returns
/// immediately.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until the next call is admitted.
    async fn acquire(&self);

    /// Admit a call if a token is immediately available.
    fn try_acquire(&self) -> bool;
}

/// A limiter that admits every call. Used when throttling is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopRateLimiter;

#[async_trait]
impl RateLimiter for NopRateLimiter {
    async fn acquire(&self) {}

    fn try_acquire(&self) -> bool {
        true
    }
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket limiter: sustained `qps` with bursts up to `burst` tokens.
pub struct TokenBucketRateLimiter {
    qps: f64,
    burst: u64,
    state: Mutex<BucketState>,
}

impl TokenBucketRateLimiter {
    /// Create a limiter refilling at `qps` tokens per second with a bucket
    /// of `burst` tokens.
    ///
    /// # Panics
    ///
    /// Panics if `qps` is not positive.
    pub fn new(qps: f64, burst: u64) -> Self {
        assert!(qps > 0.0, "qps must be positive");
        Self {
            qps,
            burst,
            state: Mutex::new(BucketState {
                tokens: burst as f64,
                last_refill: Instant::now(),
            }),
        }
    }

    /// The configured sustained rate in queries per second.
    pub fn qps(&self) -> f64 {
        self.qps
    }

    /// The configured bucket size.
    pub fn burst(&self) -> u64 {
        self.burst
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill);
        state.tokens = (state.tokens + elapsed.as_secs_f64() * self.qps).min(self.burst as f64);
        state.last_refill = now;
    }

    /// Take a token if available, otherwise report how long to wait for one.
    /// The lock is never held across an await point.
    fn take_or_wait(&self) -> Option<Duration> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.refill(&mut state);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            return None;
        }

        let deficit = 1.0 - state.tokens;
        Some(Duration::from_secs_f64(deficit / self.qps))
    }
}

#[async_trait]
impl RateLimiter for TokenBucketRateLimiter {
    async fn acquire(&self) {
        loop {
            match self.take_or_wait() {
                None => return,
                Some(wait) => tokio::time::sleep(wait).await,
            }
        }
    }

    fn try_acquire(&self) -> bool {
        self.take_or_wait().is_none()
    }
}

impl std::fmt::Debug for TokenBucketRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucketRateLimiter")
            .field("qps", &self.qps)
            .field("burst", &self.burst)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_limiter_always_admits() {
        let limiter = NopRateLimiter;
        for _ in 0..1000 {
            assert!(limiter.try_acquire());
        }
    }

    #[test]
    fn bucket_admits_up_to_burst_immediately() {
        let limiter = TokenBucketRateLimiter::new(1.0, 3);

        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn bucket_refills_over_time() {
        let limiter = TokenBucketRateLimiter::new(100.0, 1);

        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());

        // 100 qps refills one token in 10ms.
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.try_acquire());
    }

    #[test]
    fn bucket_never_exceeds_burst() {
        let limiter = TokenBucketRateLimiter::new(1000.0, 2);

        std::thread::sleep(Duration::from_millis(50));

        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn acquire_blocks_until_token_available() {
        let limiter = TokenBucketRateLimiter::new(50.0, 1);

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();

        // The second acquire had to wait for a ~20ms refill.
        assert!(
            elapsed >= Duration::from_millis(10),
            "expected the second acquire to wait, elapsed {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn acquire_is_safe_under_concurrency() {
        use std::sync::Arc;

        let limiter = Arc::new(TokenBucketRateLimiter::new(1000.0, 10));
        let mut handles = Vec::new();

        for _ in 0..20 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
            }));
        }

        for handle in handles {
            handle.await.expect("task should complete");
        }
    }

    #[test]
    #[should_panic(expected = "qps must be positive")]
    fn zero_qps_is_rejected() {
        let _ = TokenBucketRateLimiter::new(0.0, 1);
    }
}
