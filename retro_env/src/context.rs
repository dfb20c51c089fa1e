//! The time and randomness seam between the game loop and the world.

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Where the engine gets the time, its pauses, and its random numbers.
///
/// The scheduler never reads the system clock itself. With
/// [`crate::TokioContext`] a game runs at real speed; with
/// [`crate::SimContext`] the same loop runs on a virtual clock and seeded
/// random streams, which is how sessions are tested.
#[async_trait]
pub trait GameContext: Send + Sync + 'static {
    /// Monotonic time since the context was created.
    fn now(&self) -> Duration;

    /// Pauses the caller for `duration`.
    async fn sleep(&self, duration: Duration);

    /// Seed behind [`GameContext::rng`], or 0 when unseeded.
    fn seed(&self) -> u64;

    /// An independent random stream. Seeded contexts return the same
    /// sequence for the same stream id every time.
    fn rng(&self, stream: u64) -> ChaCha8Rng;
}
