//! One-shot countdown measured in unscaled seconds.
//!
//! A [`Delay`] lives on its own entity; that entity is the handle used to
//! cancel it. Unlike gameplay timers, a delay ignores the world time scale:
//! it is advanced with the raw frame delta, so a hit-pause that freezes the
//! simulation still runs out on schedule.
//!
//! # How It Works
//!
//! 1. [`schedule_delay`] spawns an entity carrying a `Delay`
//! 2. [`tick_delays`] adds the unscaled delta to every `Delay` each frame
//! 3. When `elapsed >= duration`, the entity is despawned and a
//!    [`DelayElapsed`] event is triggered with the entity id
//! 4. [`cancel_delay`] despawns the entity early; no event is ever sent for it
//!
//! # Related
//!
//! - [`crate::events::delay::DelayElapsed`] – the expiry event
//! - [`crate::systems::delay`] – scheduling, cancelling and ticking
//!
//! [`schedule_delay`]: crate::systems::delay::schedule_delay
//! [`tick_delays`]: crate::systems::delay::tick_delays
//! [`cancel_delay`]: crate::systems::delay::cancel_delay
//! [`DelayElapsed`]: crate::events::delay::DelayElapsed

use bevy_ecs::prelude::Component;

/// Slack for a sum of many small frame deltas landing just short of the
/// duration.
const FINISH_TOLERANCE: f64 = 1e-6;

/// Countdown that fires once after `duration` unscaled seconds.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Delay {
    /// Total wait in seconds. Never negative.
    pub duration: f32,
    /// Unscaled seconds accumulated so far. Summed in f64 so 120 frames of
    /// 1/60 s reach 2.0.
    pub elapsed: f64,
}

impl Delay {
    /// Create a delay of `seconds`. Negative or NaN durations become zero,
    /// which expires on the next tick.
    pub fn new(seconds: f32) -> Self {
        Delay {
            duration: if seconds.is_nan() { 0.0 } else { seconds.max(0.0) },
            elapsed: 0.0,
        }
    }

    /// Seconds left before expiry, never below zero.
    pub fn remaining(&self) -> f32 {
        (f64::from(self.duration) - self.elapsed).max(0.0) as f32
    }

    /// Whether the delay has run its full duration.
    pub fn is_finished(&self) -> bool {
        self.elapsed + FINISH_TOLERANCE >= f64::from(self.duration)
    }

    /// Advance by `dt` unscaled seconds and report whether it is finished.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += f64::from(dt);
        self.is_finished()
    }
}
