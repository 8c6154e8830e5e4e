//! Time-scale controller operations.
//!
//! The world is the single context object for time scaling: it holds the
//! [`TimeScaleController`] resource, the [`WorldTime`] knob the controller
//! writes into, and the optional [`GameSettings`] store it reads from. Every
//! operation here takes `&mut World`, runs synchronously on the caller's
//! frame, and leaves `WorldTime::time_scale` equal to the effective scale on
//! return.
//!
//! The controller is created lazily by the first operation that needs it
//! (or explicitly with [`init_time_scale`]) and torn down with
//! [`shutdown_time_scale`].
//!
//! # Operations
//!
//! - [`set_base_time_scale`] / [`base_time_scale`]
//! - [`set_manual_pause`] / [`manual_pause`]
//! - [`set_temporary_override`] / [`temporary_override`]
//! - [`cancel_temporary_override`]
//! - [`revert_time_scale`]
//! - [`set_accessibility_time_scale`]
//! - [`effective_time_scale`]
//!
//! Base scale and pause changes trigger the before/after events in
//! [`crate::events::timescale`].
//!
//! # Overrides
//!
//! A temporary override (hit-pause, slow-motion burst) replaces the base
//! scale for a duration measured in real seconds. At most one override
//! delay is outstanding: arming a new override cancels the previous delay
//! before scheduling its own. Expiry is matched against the stored handle,
//! so a superseded delay can never clear a newer override.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};
use serde::Serialize;

use crate::components::delay::Delay;
use crate::events::delay::DelayElapsed;
use crate::events::timescale::{
    BaseTimeScaleChanged, BaseTimeScaleChanging, ManualPauseChanged, ManualPauseChanging,
};
use crate::resources::settings::{GameSettings, accessibility_scale, default_base_scale};
use crate::resources::timescale::{TimeScaleController, approx_eq, clamp_scale};
use crate::resources::worldtime::WorldTime;
use crate::systems::delay::{cancel_delay, schedule_delay};

/// Create the controller if needed and hook up override expiry.
///
/// Reads the starting base scale from [`GameSettings`] (1.0 without a store)
/// and applies the effective scale once. Calling it again is a no-op.
pub fn init_time_scale(world: &mut World) {
    if !world.contains_resource::<TimeScaleController>() {
        let controller = TimeScaleController::from_world(world);
        info!(
            "Time-scale controller created with base scale {}",
            controller.base_time_scale()
        );
        world.insert_resource(controller);
        apply_time_scale(world);
    }

    if world
        .resource::<TimeScaleController>()
        .expiry_observer
        .is_none()
    {
        let observer = world.add_observer(override_expiry_observer).id();
        world.flush();
        world.resource_mut::<TimeScaleController>().expiry_observer = Some(observer);
    }
}

/// Read access to the controller, creating it on first use.
pub fn time_scale_controller(world: &mut World) -> &TimeScaleController {
    init_time_scale(world);
    world.resource::<TimeScaleController>()
}

/// Tear the controller down.
///
/// Cancels a pending override, leaves the non-overridden effective scale in
/// [`WorldTime`], unregisters the expiry observer and removes the resource.
/// Safe to call repeatedly or without a controller.
pub fn shutdown_time_scale(world: &mut World) {
    if !world.contains_resource::<TimeScaleController>() {
        return;
    }
    cancel_temporary_override(world);

    let observer = world
        .resource_mut::<TimeScaleController>()
        .expiry_observer
        .take();
    if let Some(observer) = observer {
        if let Err(e) = world.try_despawn(observer) {
            debug!("Override expiry observer already gone: {}", e);
        }
    }
    world.remove_resource::<TimeScaleController>();

    info!(
        "Time-scale controller shut down, time scale left at {}",
        world.get_resource_or_init::<WorldTime>().time_scale
    );
}

/// Recompute the effective scale and write it to [`WorldTime::time_scale`].
///
/// Pure apart from that single write, so calling it any number of times in a
/// row yields the same knob value. Returns `None` without a controller.
pub fn apply_time_scale(world: &mut World) -> Option<f32> {
    let effective = world
        .get_resource::<TimeScaleController>()?
        .effective_time_scale(accessibility_scale(world.get_resource::<GameSettings>()));
    world.get_resource_or_init::<WorldTime>().time_scale = effective;
    Some(effective)
}

fn write_effective(
    controller: &TimeScaleController,
    settings: Option<&GameSettings>,
    time: &mut WorldTime,
) -> f32 {
    let effective = controller.effective_time_scale(accessibility_scale(settings));
    time.time_scale = effective;
    effective
}

pub fn base_time_scale(world: &mut World) -> f32 {
    time_scale_controller(world).base_time_scale()
}

/// Set the base time scale.
///
/// Negative values clamp to zero. Writes within `f32::EPSILON` of the
/// current value are dropped without notifications. NaN is ignored.
pub fn set_base_time_scale(world: &mut World, value: f32) {
    let Some(new) = clamp_scale(value) else {
        warn!("Ignoring NaN base time scale");
        return;
    };
    let old = base_time_scale(world);
    if approx_eq(old, new) {
        return;
    }

    world.trigger(BaseTimeScaleChanging { old, new });
    if let Some(mut controller) = world.get_resource_mut::<TimeScaleController>() {
        controller.store_base_time_scale(new);
    }
    apply_time_scale(world);
    debug!("Base time scale {} -> {}", old, new);
    world.trigger(BaseTimeScaleChanged { old, new });
}

pub fn manual_pause(world: &mut World) -> bool {
    time_scale_controller(world).manual_pause()
}

/// Pause or resume the simulation. Setting the current value is a no-op.
pub fn set_manual_pause(world: &mut World, paused: bool) {
    let old = manual_pause(world);
    if old == paused {
        return;
    }

    world.trigger(ManualPauseChanging { old, new: paused });
    if let Some(mut controller) = world.get_resource_mut::<TimeScaleController>() {
        controller.store_manual_pause(paused);
    }
    apply_time_scale(world);
    debug!("Manual pause {} -> {}", old, paused);
    world.trigger(ManualPauseChanged { old, new: paused });
}

/// The active temporary override, if any.
pub fn temporary_override(world: &mut World) -> Option<f32> {
    time_scale_controller(world).temporary_override()
}

/// Replace the base scale with `value` for `seconds` of real time.
///
/// Any pending override is cancelled first. The new value takes effect
/// immediately; the revert runs from [`tick_delays`](crate::systems::delay::tick_delays)
/// once the unscaled clock has advanced by `seconds`. Negative values clamp
/// to zero (a full freeze); NaN is ignored.
pub fn set_temporary_override(world: &mut World, value: f32, seconds: f32) {
    let Some(value) = clamp_scale(value) else {
        warn!("Ignoring NaN temporary time-scale override");
        return;
    };
    init_time_scale(world);

    let previous = world.resource_mut::<TimeScaleController>().take_override();
    if let Some(previous) = previous {
        if cancel_delay(world, previous) {
            debug!("Superseded pending time-scale override");
        }
    }

    let handle = schedule_delay(world, seconds);
    world
        .resource_mut::<TimeScaleController>()
        .store_override(value, handle);
    apply_time_scale(world);
    debug!("Temporary time-scale override {} for {}s", value, seconds);
}

/// Drop the active override right away and re-apply the non-overridden scale.
///
/// Safe when nothing is pending and when no controller exists.
pub fn cancel_temporary_override(world: &mut World) {
    let pending = match world.get_resource_mut::<TimeScaleController>() {
        Some(mut controller) => controller.take_override(),
        None => return,
    };
    if let Some(handle) = pending {
        if cancel_delay(world, handle) {
            debug!("Cancelled temporary time-scale override");
        }
    }
    apply_time_scale(world);
}

/// Back to normal: cancel any override, unpause, and restore the base scale
/// from [`GameSettings`] as it reads right now.
pub fn revert_time_scale(world: &mut World) {
    init_time_scale(world);
    cancel_temporary_override(world);
    set_manual_pause(world, false);
    let default = default_base_scale(world.get_resource::<GameSettings>());
    set_base_time_scale(world, default);
}

/// The effective time scale, re-applied to [`WorldTime::time_scale`] first
/// so a settings change made since the last frame is already reflected.
pub fn effective_time_scale(world: &mut World) -> f32 {
    init_time_scale(world);
    apply_time_scale(world).unwrap_or(1.0)
}

/// Change the accessibility multiplier in [`GameSettings`] and re-apply the
/// effective scale right away.
///
/// This is an external signal: no before/after notifications are triggered.
/// Negative values clamp to zero; NaN is ignored.
pub fn set_accessibility_time_scale(world: &mut World, value: f32) {
    if value.is_nan() {
        warn!("Ignoring NaN accessibility time scale");
        return;
    }
    world
        .get_resource_or_init::<GameSettings>()
        .set_accessibility_time_scale(value);
    if let Some(effective) = apply_time_scale(world) {
        debug!("Accessibility time scale {}, time scale {}", value.max(0.0), effective);
    }
}

/// Observer that clears the override when its delay runs out.
///
/// Delays owned by anyone else, and stale override delays, are ignored.
pub fn override_expiry_observer(
    trigger: On<DelayElapsed>,
    controller: Option<ResMut<TimeScaleController>>,
    settings: Option<Res<GameSettings>>,
    world_time: Option<ResMut<WorldTime>>,
) {
    let Some(mut controller) = controller else {
        return;
    };
    if controller.override_delay != Some(trigger.event().entity) {
        return;
    }
    controller.take_override();

    let Some(mut world_time) = world_time else {
        return;
    };
    let effective = write_effective(&controller, settings.as_deref(), &mut world_time);
    debug!("Temporary time-scale override expired, time scale {}", effective);
}

/// Re-apply the effective scale once per frame.
///
/// Covers changes to the accessibility multiplier made directly on
/// [`GameSettings`]; those never raise the base/pause notifications.
pub fn sync_time_scale(
    controller: Option<Res<TimeScaleController>>,
    settings: Option<Res<GameSettings>>,
    world_time: Option<ResMut<WorldTime>>,
) {
    let (Some(controller), Some(mut world_time)) = (controller, world_time) else {
        return;
    };
    if let Some(settings) = settings.as_ref() {
        if settings.is_changed() && !settings.is_added() {
            debug!(
                "Accessibility time scale now {}",
                settings.accessibility_time_scale()
            );
        }
    }
    write_effective(&controller, settings.as_deref(), &mut world_time);
}

/// Serializable view of the time-scale state, one per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeScaleSnapshot {
    pub frame: u64,
    pub base_time_scale: f32,
    pub manual_pause: bool,
    pub accessibility_time_scale: f32,
    pub temporary_override: Option<f32>,
    /// Real seconds until the override reverts.
    pub override_remaining: Option<f32>,
    pub effective_time_scale: f32,
    pub elapsed: f32,
    pub unscaled_elapsed: f32,
}

/// Capture the current time-scale state.
pub fn snapshot(world: &mut World) -> TimeScaleSnapshot {
    init_time_scale(world);
    let accessibility = accessibility_scale(world.get_resource::<GameSettings>());
    let wt = *world.get_resource_or_init::<WorldTime>();
    let controller = world.resource::<TimeScaleController>();
    let override_remaining = controller
        .override_delay
        .and_then(|handle| world.get::<Delay>(handle))
        .map(Delay::remaining);
    TimeScaleSnapshot {
        frame: wt.frame_count,
        base_time_scale: controller.base_time_scale(),
        manual_pause: controller.manual_pause(),
        accessibility_time_scale: accessibility,
        temporary_override: controller.temporary_override(),
        override_remaining,
        effective_time_scale: wt.time_scale,
        elapsed: wt.elapsed,
        unscaled_elapsed: wt.unscaled_elapsed,
    }
}
