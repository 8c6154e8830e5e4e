//! Delay expiration events.
//!
//! When a [`Delay`](crate::components::delay::Delay) runs out, its entity is
//! despawned and a [`DelayElapsed`] event is triggered carrying that entity.
//! Owners compare the entity with the handle they stored when scheduling, so
//! a stale or cancelled handle never matches.
//!
//! # Example
//!
//! ```ignore
//! let handle = schedule_delay(&mut world, 0.2);
//! world.add_observer(move |trigger: On<DelayElapsed>| {
//!     if trigger.event().entity == handle {
//!         // restore whatever the delay was guarding
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;

/// Event emitted when a scheduled delay runs out.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayElapsed {
    /// The (already despawned) entity that held the delay.
    pub entity: Entity,
}
