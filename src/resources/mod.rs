//! ECS resources made available to systems.
//!
//! This module groups the long-lived data the time-scaling core keeps in the
//! world. Each submodule documents the semantics and intended usage of its
//! resource(s).
//!
//! Overview
//! - `settings` – persisted player settings (base scale, accessibility multiplier)
//! - `timescale` – controller state and the pure effective-scale function
//! - `worldtime` – simulation clocks, the global time-scale knob, fixed step
pub mod settings;
pub mod timescale;
pub mod worldtime;
