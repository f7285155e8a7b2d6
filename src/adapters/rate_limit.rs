use crate::core::RateLimiter;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Keeps at least `interval` between the starts of consecutive lookups.
///
/// The first call also waits a full interval, so a run never opens with a burst.
pub struct FixedIntervalLimiter {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl FixedIntervalLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[async_trait]
impl RateLimiter for FixedIntervalLimiter {
    async fn wait(&self) {
        let mut last = self.last.lock().await;
        match *last {
            Some(previous) => tokio::time::sleep_until(previous + self.interval).await,
            None => tokio::time::sleep(self.interval).await,
        }
        *last = Some(Instant::now());
    }
}

/// Never waits.
pub struct NoDelay;

#[async_trait]
impl RateLimiter for NoDelay {
    async fn wait(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_interval_spaces_calls() {
        let limiter = FixedIntervalLimiter::new(Duration::from_millis(40));
        let start = std::time::Instant::now();

        limiter.wait().await;
        let first = start.elapsed();
        limiter.wait().await;
        limiter.wait().await;
        let total = start.elapsed();

        assert!(first >= Duration::from_millis(40));
        assert!(total >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_slow_work_between_calls_counts_toward_interval() {
        let limiter = FixedIntervalLimiter::new(Duration::from_millis(50));
        limiter.wait().await;

        tokio::time::sleep(Duration::from_millis(80)).await;
        let before = std::time::Instant::now();
        limiter.wait().await;

        assert!(before.elapsed() < Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_no_delay_returns_immediately() {
        let start = std::time::Instant::now();
        for _ in 0..100 {
            NoDelay.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
