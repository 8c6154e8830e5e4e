//! Event types used by the time-scaling core.
//!
//! Events are triggered synchronously with `World::trigger`, so every
//! observer has run by the time the triggering call returns.
//!
//! Submodules:
//! - [`delay`] – expiry of a scheduled [`Delay`](crate::components::delay::Delay)
//! - [`tick`] – per-frame and per-fixed-step clock notifications
//! - [`timescale`] – before/after notifications for base scale and manual pause
pub mod delay;
pub mod tick;
pub mod timescale;
