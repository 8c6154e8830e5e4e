//! Simulation clocks and the engine's global time-scale knob.
//!
//! [`WorldTime::time_scale`] is the single value the rest of the engine
//! multiplies frame deltas by. It is written by the time-scale controller
//! (see [`crate::systems::timescale`]) and by nothing else while the
//! controller is alive.
use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldTime {
    /// Scaled seconds since start.
    pub elapsed: f32,
    /// Scaled delta of the current frame.
    pub delta: f32,
    /// Real seconds since start.
    pub unscaled_elapsed: f32,
    /// Raw delta of the current frame.
    pub unscaled_delta: f32,
    /// Effective time scale applied to every frame delta.
    pub time_scale: f32,
    /// Frames ticked so far.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            unscaled_elapsed: 0.0,
            unscaled_delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale.max(0.0);
        self
    }
}

/// Default fixed physics rate: 50 steps per second.
const DEFAULT_FIXED_STEP: f32 = 1.0 / 50.0;
/// Catch-up cap so one long frame cannot run physics forever.
const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 5;

/// Fixed-step accumulator fed with scaled frame time.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_steps_per_frame: u32,
    /// Scaled time not yet consumed by a whole step.
    pub accumulator: f32,
    /// Scaled seconds simulated through fixed steps.
    pub elapsed: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_STEP)
    }
}

impl FixedTimestep {
    /// Create an accumulator with the given step length in seconds.
    /// Non-positive or non-finite steps fall back to the 50 Hz default.
    pub fn new(step: f32) -> Self {
        FixedTimestep {
            step: if step.is_finite() && step > 0.0 {
                step
            } else {
                DEFAULT_FIXED_STEP
            },
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            accumulator: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn with_max_steps_per_frame(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add scaled frame time and return how many whole steps to run.
    ///
    /// Time beyond the per-frame cap is dropped rather than carried over,
    /// so a hitch is absorbed instead of replayed.
    pub fn accumulate(&mut self, scaled_delta: f32) -> u32 {
        self.accumulator += scaled_delta.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps_per_frame {
            self.accumulator -= self.step;
            self.elapsed += self.step;
            steps += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator %= self.step;
        }
        steps
    }
}
