//! Injectable time source for the sweep state machine.
//!
//! The sweep has two timed holds (the inter-step settle pause and the alert
//! hold).  Both go through the [`Clock`] trait so the state machine stays a
//! modeled transition: production code uses [`SystemClock`], tests inject a
//! recording clock and run a full sweep without wall-clock waiting.

use std::time::Duration;

use async_trait::async_trait;

/// Source of timed pauses for the sweep task.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Suspend the calling task for `duration`.
    async fn pause(&self, duration: Duration);
}

/// Production clock backed by [`tokio::time::sleep`].
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn system_clock_actually_pauses() {
        let clock = SystemClock;
        let start = Instant::now();
        clock.pause(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
