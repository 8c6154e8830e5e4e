//! Per-frame and per-fixed-step tick events.
//!
//! The frame ticker triggers a [`FrameTick`] once per rendered frame, and the
//! fixed-step driver triggers a [`FixedTick`] for every whole physics step the
//! frame consumed. Both carry the same four clocks so listeners never need to
//! reach back into [`WorldTime`](crate::resources::worldtime::WorldTime).

use bevy_ecs::prelude::*;

/// Emitted once per rendered frame, after [`WorldTime`](crate::resources::worldtime::WorldTime)
/// has been advanced.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Frame delta multiplied by the effective time scale.
    pub delta: f32,
    /// Raw frame delta in seconds.
    pub unscaled_delta: f32,
    /// Scaled seconds since start.
    pub elapsed: f32,
    /// Real seconds since start.
    pub unscaled_elapsed: f32,
}

/// Emitted once per consumed fixed physics step.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FixedTick {
    /// The fixed step length in scaled seconds.
    pub delta: f32,
    /// Real seconds this step stands for (zero while time is stopped).
    pub unscaled_delta: f32,
    /// Scaled seconds simulated by fixed steps since start.
    pub elapsed: f32,
    /// Real seconds since start, as of the owning frame.
    pub unscaled_elapsed: f32,
}
