//! Deferred one-shot actions measured in unscaled time.
//!
//! This is the shared dispatcher any owner can use to run something "after N
//! real seconds" from the main loop. Each scheduled wait is an entity carrying
//! a [`Delay`](crate::components::delay::Delay); the entity is the handle.
//!
//! - [`schedule_delay`] – spawn a delay and return its handle
//! - [`cancel_delay`] – drop a pending delay; it will never fire
//! - [`is_delay_pending`] – whether a handle is still waiting
//! - [`tick_delays`] – advance all delays and trigger [`DelayElapsed`] for
//!   the ones that ran out
//!
//! # Cancellation
//!
//! A handle becomes stale as soon as its delay fires or is cancelled.
//! Cancelling a stale handle is a safe no-op that returns `false`; entity
//! generations guarantee a stale handle never aliases a newer delay.

use bevy_ecs::prelude::*;
use log::debug;
use smallvec::SmallVec;

use crate::components::delay::Delay;
use crate::events::delay::DelayElapsed;
use crate::systems::time::sanitize_delta;

/// Schedule a one-shot delay of `seconds` unscaled seconds.
pub fn schedule_delay(world: &mut World, seconds: f32) -> Entity {
    let delay = Delay::new(seconds);
    let entity = world.spawn(delay).id();
    debug!("Scheduled delay {:?} for {}s", entity, delay.duration);
    entity
}

/// Cancel a pending delay. Returns whether anything was cancelled.
pub fn cancel_delay(world: &mut World, handle: Entity) -> bool {
    if !is_delay_pending(world, handle) {
        return false;
    }
    world.try_despawn(handle).is_ok()
}

/// Whether `handle` refers to a delay that has neither fired nor been cancelled.
pub fn is_delay_pending(world: &World, handle: Entity) -> bool {
    world.get::<Delay>(handle).is_some()
}

/// Advance every delay by `unscaled_dt` and fire the ones that ran out.
///
/// Finished delays are despawned before their [`DelayElapsed`] is
/// triggered, so observers see them as no longer pending. Delays scheduled
/// by an observer during this call start counting on the next tick.
pub fn tick_delays(world: &mut World, unscaled_dt: f32) {
    let dt = sanitize_delta(unscaled_dt);

    let mut expired: SmallVec<[Entity; 4]> = SmallVec::new();
    let mut query = world.query::<(Entity, &mut Delay)>();
    for (entity, mut delay) in query.iter_mut(world) {
        if delay.advance(dt) {
            expired.push(entity);
        }
    }

    for entity in expired {
        // An earlier observer in this batch may have cancelled it already.
        if !cancel_delay(world, entity) {
            continue;
        }
        debug!("Delay {:?} elapsed", entity);
        world.trigger(DelayElapsed { entity });
    }
}
