//! Time-scale controller state.
//!
//! [`TimeScaleController`] owns the base time scale, the manual pause flag
//! and the optional temporary override. It never writes the engine knob
//! itself; [`TimeScaleController::effective_time_scale`] is a pure function
//! of its fields and the accessibility multiplier, and the world-level
//! operations in [`crate::systems::timescale`] apply its result to
//! [`WorldTime::time_scale`](crate::resources::worldtime::WorldTime).
//!
//! # Precedence
//!
//! | paused | override | effective                      |
//! |--------|----------|--------------------------------|
//! | yes    | any      | `0`                            |
//! | no     | `Some(o)`| `o * accessibility`            |
//! | no     | `None`   | `base * accessibility`         |

use bevy_ecs::prelude::*;

use crate::resources::settings::{GameSettings, default_base_scale};

/// Stored in place of an override value when none is active.
const NO_OVERRIDE: f32 = -1.0;

/// Process-wide time-scale state. One instance per world.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TimeScaleController {
    base_time_scale: f32,
    manual_pause: bool,
    /// Active override, or [`NO_OVERRIDE`].
    override_scale: f32,
    /// Handle of the delay that will clear the override.
    pub(crate) override_delay: Option<Entity>,
    /// Observer that reacts to the override delay running out.
    pub(crate) expiry_observer: Option<Entity>,
}

impl FromWorld for TimeScaleController {
    fn from_world(world: &mut World) -> Self {
        Self::new(default_base_scale(world.get_resource::<GameSettings>()))
    }
}

impl TimeScaleController {
    /// Create a controller with the given base scale, unpaused, no override.
    pub fn new(base_time_scale: f32) -> Self {
        TimeScaleController {
            base_time_scale: clamp_scale(base_time_scale).unwrap_or(1.0),
            manual_pause: false,
            override_scale: NO_OVERRIDE,
            override_delay: None,
            expiry_observer: None,
        }
    }

    pub fn base_time_scale(&self) -> f32 {
        self.base_time_scale
    }

    pub fn manual_pause(&self) -> bool {
        self.manual_pause
    }

    /// The active temporary override, if any.
    pub fn temporary_override(&self) -> Option<f32> {
        (self.override_scale >= 0.0).then_some(self.override_scale)
    }

    /// The effective time scale for the given accessibility multiplier.
    ///
    /// Pause forces exactly zero. Otherwise the override, or the base scale
    /// when there is none, is multiplied by `accessibility`.
    pub fn effective_time_scale(&self, accessibility: f32) -> f32 {
        if self.manual_pause {
            return 0.0;
        }
        let accessibility = if accessibility.is_nan() {
            1.0
        } else {
            accessibility.max(0.0)
        };
        self.temporary_override().unwrap_or(self.base_time_scale) * accessibility
    }

    pub(crate) fn store_base_time_scale(&mut self, value: f32) {
        self.base_time_scale = value;
    }

    pub(crate) fn store_manual_pause(&mut self, value: bool) {
        self.manual_pause = value;
    }

    pub(crate) fn store_override(&mut self, value: f32, delay: Entity) {
        self.override_scale = value;
        self.override_delay = Some(delay);
    }

    /// Drop the override and hand back the pending delay handle, if any.
    pub(crate) fn take_override(&mut self) -> Option<Entity> {
        self.override_scale = NO_OVERRIDE;
        self.override_delay.take()
    }
}

/// Clamp a requested scale to `>= 0`. NaN has no meaningful clamp and yields `None`.
pub fn clamp_scale(value: f32) -> Option<f32> {
    (!value.is_nan()).then(|| value.max(0.0))
}

/// Whether two scales are close enough that a write would be a no-op.
pub fn approx_eq(a: f32, b: f32) -> bool {
    a == b || (a - b).abs() < f32::EPSILON
}
