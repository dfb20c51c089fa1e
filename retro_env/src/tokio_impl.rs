//! Wall-clock context for playing in a real terminal.

use crate::GameContext;
use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Real time from a monotonic [`Instant`], pauses through `tokio::time`,
/// and randomness from OS entropy.
#[derive(Debug, Clone, Copy)]
pub struct TokioContext {
    started: Instant,
}

impl TokioContext {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameContext for TokioContext {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Always 0: nothing here is reproducible.
    fn seed(&self) -> u64 {
        0
    }

    fn rng(&self, _stream: u64) -> ChaCha8Rng {
        ChaCha8Rng::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[tokio::test]
    async fn test_sleep_takes_real_time() {
        let ctx = TokioContext::new();
        let before = ctx.now();
        ctx.sleep(Duration::from_millis(10)).await;
        assert!(ctx.now() - before >= Duration::from_millis(10));
    }

    #[test]
    fn test_streams_are_not_reproducible() {
        let ctx = TokioContext::new();
        assert_ne!(ctx.rng(1).next_u64(), ctx.rng(1).next_u64());
        assert_eq!(ctx.seed(), 0);
    }
}
