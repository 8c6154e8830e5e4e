//! Engine systems.
//!
//! This module groups the functions that advance time and drive the
//! time-scale controller. Most of them are exclusive (`&mut World`) so that
//! events fire synchronously; [`timescale::sync_time_scale`] is a regular
//! system for hosts that run their own `Schedule`.
//!
//! Submodules overview
//! - [`delay`] – schedule, cancel and tick unscaled one-shot delays
//! - [`time`] – update simulation time and delta, run fixed steps
//! - [`timescale`] – base scale, pause, temporary override, revert

pub mod delay;
pub mod time;
pub mod timescale;
