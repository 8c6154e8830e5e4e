//! Change notifications for the controller-owned time-scale signals.
//!
//! Each observable signal has a pair of events. The `*Changing` event is
//! triggered before the value is stored; the `*Changed` event after the value
//! is stored and the effective time scale has been re-applied. Both carry the
//! old and new values and run synchronously inside the setter call.
//!
//! Listeners are plain bevy observers. Registering one returns its entity;
//! despawning that entity unregisters it:
//!
//! ```ignore
//! let listener = world
//!     .add_observer(|trigger: On<ManualPauseChanged>| {
//!         log::info!("paused: {}", trigger.event().new);
//!     })
//!     .id();
//! // later
//! world.despawn(listener);
//! ```
//!
//! No-op writes (same pause flag, base scale within epsilon) trigger nothing.
//! Changes to the accessibility multiplier are not announced here; the
//! controller simply re-applies the effective scale when it sees them.

use bevy_ecs::prelude::*;

/// Triggered before the base time scale changes.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BaseTimeScaleChanging {
    pub old: f32,
    pub new: f32,
}

/// Triggered after the base time scale changed and the effective scale was applied.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BaseTimeScaleChanged {
    pub old: f32,
    pub new: f32,
}

/// Triggered before the manual pause flag flips.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualPauseChanging {
    pub old: bool,
    pub new: bool,
}

/// Triggered after the manual pause flag flipped and the effective scale was applied.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualPauseChanged {
    pub old: bool,
    pub new: bool,
}
