//! Time-scaling core for a bevy_ecs game loop.
//!
//! Pause, slow down or speed up simulated time independently of wall-clock
//! time, with temporary overrides (hit-pause, slow-motion bursts) that revert
//! on their own after a real-time duration.
//!
//! This module exposes the ECS components, resources, systems, and events
//! for use in integration tests and as a reusable library.
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy_ecs::prelude::*;
//! use timescale::systems::time::advance_frame;
//! use timescale::systems::timescale::{set_temporary_override, effective_time_scale};
//!
//! let mut world = World::new();
//! set_temporary_override(&mut world, 0.05, 0.2); // hit-pause for 200ms
//! advance_frame(&mut world, 1.0 / 60.0);
//! ```

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
