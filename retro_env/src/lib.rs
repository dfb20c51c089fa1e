//! Time and randomness for Retro games.
//!
//! Anything that would make a game session non-reproducible goes through
//! [`GameContext`]:
//! - the clock (`now()`, `sleep()`)
//! - random streams (`rng()`)
//!
//! Terminal play uses [`TokioContext`]. Tests use [`SimContext`], whose
//! clock only moves when the game sleeps or the test pushes it forward.
//!
//! ```ignore
//! use retro_env::{GameContext, SimContext};
//!
//! let ctx = SimContext::new(42);
//! ctx.sleep(Duration::from_millis(40)).await;
//! assert_eq!(ctx.now(), Duration::from_millis(40));
//! ```

mod context;
mod sim;
mod tokio_impl;

pub use context::GameContext;
pub use sim::SimContext;
pub use tokio_impl::TokioContext;

/// Random stream handed out by every context.
pub use rand_chacha::ChaCha8Rng as GameRng;
