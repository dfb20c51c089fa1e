//! Fixed-interval tick scheduler with drift compensation.
//!
//! Ticks are paced through a [`GameContext`] rather than the system clock,
//! so the same loop runs against real time in a terminal and against a
//! virtual clock in tests.
//!
//! ```ignore
//! let mut clock = Clock::from_framerate(24.0);
//! loop {
//!     let tick = clock.next_tick(&ctx).await;
//!     // ... work for this tick ...
//! }
//! ```

use retro_env::GameContext;
use std::time::Duration;
use tracing::trace;

/// Produces tick indices 0, 1, 2, ... spaced roughly `interval` apart.
///
/// Time spent by the caller between two ticks counts against the next
/// pause: after each pause the clock measures how far the last period
/// overshot (or undershot) the interval and shortens (or lengthens) the
/// following pause by that much. Pauses never go below zero, so a slow frame
/// makes the next tick fire immediately.
#[derive(Debug, Clone)]
pub struct Clock {
    interval: Duration,
    /// Signed overshoot of the last period, in seconds
    error: f64,
    previous_tick: Option<Duration>,
    next_index: u64,
}

impl Clock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            error: 0.0,
            previous_tick: None,
            next_index: 0,
        }
    }

    /// Clock ticking `framerate` times per second. `framerate` must be
    /// positive and finite; intervals too long for a `Duration` saturate.
    pub fn from_framerate(framerate: f64) -> Self {
        Self::new(Duration::try_from_secs_f64(1.0 / framerate).unwrap_or(Duration::MAX))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drift measured over the last period, in seconds.
    pub fn drift(&self) -> f64 {
        self.error
    }

    /// How long the next call to [`Clock::next_tick`] will sleep.
    pub fn pause(&self) -> Duration {
        if self.previous_tick.is_none() {
            return Duration::ZERO;
        }
        let pause = (self.interval.as_secs_f64() - self.error).max(0.0);
        Duration::try_from_secs_f64(pause).unwrap_or(self.interval)
    }

    /// Waits until the next tick is due and returns its index.
    ///
    /// The first call returns 0 immediately and anchors the schedule.
    pub async fn next_tick<Ctx: GameContext + ?Sized>(&mut self, ctx: &Ctx) -> u64 {
        match self.previous_tick {
            None => self.previous_tick = Some(ctx.now()),
            Some(previous) => {
                ctx.sleep(self.pause()).await;
                let latest = ctx.now();
                self.error = latest.saturating_sub(previous).as_secs_f64() - self.interval.as_secs_f64();
                self.previous_tick = Some(latest);
            }
        }
        let index = self.next_index;
        self.next_index += 1;
        trace!(tick = index, drift = self.error, "clock tick");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use retro_env::SimContext;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[tokio::test]
    async fn test_ticks_count_up_from_zero() {
        let ctx = SimContext::new(1);
        let mut clock = Clock::new(INTERVAL);
        let mut ticks = Vec::new();
        for _ in 0..5 {
            ticks.push(clock.next_tick(&ctx).await);
        }
        assert_eq!(ticks, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_idle_ticks_take_n_intervals() {
        let ctx = SimContext::new(1);
        let mut clock = Clock::new(INTERVAL);
        clock.next_tick(&ctx).await;
        for _ in 0..50 {
            clock.next_tick(&ctx).await;
        }
        assert_abs_diff_eq!(ctx.now().as_secs_f64(), 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(clock.drift(), 0.0, epsilon = 1e-9);
    }

    #[tokio::test]
    async fn test_slow_frame_shortens_next_pause() {
        let ctx = SimContext::new(1);
        let mut clock = Clock::new(INTERVAL);
        clock.next_tick(&ctx).await;
        assert_eq!(clock.pause(), INTERVAL);

        // One iteration's work takes 1.5 intervals
        ctx.advance_time(Duration::from_millis(150));
        clock.next_tick(&ctx).await;
        assert_abs_diff_eq!(clock.drift(), 0.15, epsilon = 1e-9);
        assert_eq!(clock.pause(), Duration::ZERO);

        // The next tick fires immediately and the schedule stays anchored
        let before = ctx.now();
        clock.next_tick(&ctx).await;
        assert_eq!(ctx.now(), before);
        assert!(clock.drift() < 0.0);
        assert!(clock.pause() > INTERVAL);

        for _ in 3..=22 {
            clock.next_tick(&ctx).await;
            assert!(clock.pause() <= INTERVAL * 2 + Duration::from_nanos(10));
        }
        let offset = ctx.now().as_secs_f64() - 22.0 * INTERVAL.as_secs_f64();
        assert!(offset >= -1e-6 && offset <= 0.15 + 1e-6, "offset {offset}");
    }

    #[tokio::test]
    async fn test_steady_work_does_not_accumulate_drift() {
        let ctx = SimContext::new(1);
        let mut clock = Clock::new(INTERVAL);
        clock.next_tick(&ctx).await;
        for _ in 0..100 {
            ctx.advance_time(Duration::from_millis(30));
            clock.next_tick(&ctx).await;
            assert!(clock.drift().abs() <= 0.030 + 1e-9);
        }
        // Average period stays within one work slice of the interval
        let average = ctx.now().as_secs_f64() / 100.0;
        assert!(average >= 0.1 - 1e-9 && average <= 0.13 + 1e-9);
    }

    #[test]
    fn test_from_framerate() {
        let clock = Clock::from_framerate(24.0);
        assert_abs_diff_eq!(clock.interval().as_secs_f64(), 1.0 / 24.0, epsilon = 1e-9);
        assert_eq!(clock.pause(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_from_framerate_saturates_huge_intervals() {
        let ctx = SimContext::new(1);
        let mut clock = Clock::from_framerate(1e-30);
        assert_eq!(clock.interval(), Duration::MAX);
        clock.next_tick(&ctx).await;
        assert_eq!(clock.pause(), Duration::MAX);
    }
}
