//! Frame ticker and fixed-step driver.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` to the provided delta, and
//! drives [`FixedTimestep`](crate::resources::worldtime::FixedTimestep) from
//! the scaled result.
//!
//! # Frame Order
//!
//! [`advance_frame`] is the canonical per-frame entry point:
//!
//! 1. re-apply the effective time scale (picks up accessibility changes)
//! 2. [`update_world_time`] advances the clocks and triggers [`FrameTick`]
//! 3. [`tick_delays`] runs unscaled delays, which may end an override
//! 4. [`run_fixed_steps`] triggers one [`FixedTick`] per whole fixed step
use bevy_ecs::prelude::*;

use crate::events::tick::{FixedTick, FrameTick};
use crate::resources::worldtime::{FixedTimestep, WorldTime};
use crate::systems::delay::tick_delays;
use crate::systems::timescale::apply_time_scale;

/// Negative and NaN deltas count as a zero-length frame.
pub(crate) fn sanitize_delta(dt: f32) -> f32 {
    if dt.is_nan() { 0.0 } else { dt.max(0.0) }
}

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale`, writes both scaled and unscaled clocks
/// and then triggers a [`FrameTick`].
pub fn update_world_time(world: &mut World, dt: f32) {
    let dt = sanitize_delta(dt);
    let tick = {
        let mut wt = world.get_resource_or_init::<WorldTime>();
        let scaled_dt = dt * wt.time_scale;
        wt.unscaled_delta = dt;
        wt.unscaled_elapsed += dt;
        wt.delta = scaled_dt;
        wt.elapsed += scaled_dt;
        wt.frame_count += 1;
        FrameTick {
            delta: wt.delta,
            unscaled_delta: wt.unscaled_delta,
            elapsed: wt.elapsed,
            unscaled_elapsed: wt.unscaled_elapsed,
        }
    };
    world.trigger(tick);
}

/// Feed this frame's scaled delta into the fixed-step accumulator and
/// trigger a [`FixedTick`] per consumed step. Returns the number of steps.
pub fn run_fixed_steps(world: &mut World) -> u32 {
    let wt = *world.get_resource_or_init::<WorldTime>();
    let (steps, step, start) = {
        let mut fixed = world.get_resource_or_init::<FixedTimestep>();
        let start = fixed.elapsed;
        (fixed.accumulate(wt.delta), fixed.step(), start)
    };

    let unscaled_delta = if wt.time_scale > 0.0 {
        step / wt.time_scale
    } else {
        0.0
    };
    for i in 1..=steps {
        world.trigger(FixedTick {
            delta: step,
            unscaled_delta,
            elapsed: start + step * i as f32,
            unscaled_elapsed: wt.unscaled_elapsed,
        });
    }
    steps
}

/// Run one whole frame of the time pipeline with an unscaled delta `dt`.
pub fn advance_frame(world: &mut World, dt: f32) {
    apply_time_scale(world);
    update_world_time(world, dt);
    tick_delays(world, dt);
    run_fixed_steps(world);
}
