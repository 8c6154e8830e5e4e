//! ECS components.
//!
//! The time-scaling core keeps almost all of its state in resources. The
//! only per-entity data is the [`delay::Delay`] countdown, which lets any
//! number of owners schedule cancellable one-shot actions side by side.
//!
//! Submodules overview:
//! - [`delay`] – one-shot countdown in unscaled seconds; the entity is the handle
pub mod delay;
