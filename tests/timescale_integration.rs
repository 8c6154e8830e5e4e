//! Time-scale controller integration tests.
//!
//! Each test builds a bare `World`, optionally inserts `GameSettings`, and
//! drives the controller through its public `&mut World` operations and the
//! frame pipeline (`advance_frame`).

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use std::sync::{Arc, Mutex};

use timescale::components::delay::Delay;
use timescale::events::delay::DelayElapsed;
use timescale::events::timescale::{
    BaseTimeScaleChanged, BaseTimeScaleChanging, ManualPauseChanged, ManualPauseChanging,
};
use timescale::resources::settings::GameSettings;
use timescale::resources::timescale::TimeScaleController;
use timescale::resources::worldtime::WorldTime;
use timescale::systems::delay::{is_delay_pending, schedule_delay};
use timescale::systems::time::advance_frame;
use timescale::systems::timescale::{
    apply_time_scale, base_time_scale, cancel_temporary_override, effective_time_scale,
    init_time_scale, manual_pause, revert_time_scale, set_accessibility_time_scale,
    set_base_time_scale, set_manual_pause, set_temporary_override, shutdown_time_scale, snapshot,
    sync_time_scale, temporary_override,
};

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(base: f32, accessibility: f32) -> World {
    let mut world = World::new();
    let mut settings = GameSettings::new();
    settings.set_base_time_scale(base);
    settings.set_accessibility_time_scale(accessibility);
    world.insert_resource(settings);
    world.insert_resource(WorldTime::default());
    init_time_scale(&mut world);
    world
}

fn knob(world: &World) -> f32 {
    world.resource::<WorldTime>().time_scale
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Seen {
    BaseChanging(f32, f32),
    BaseChanged(f32, f32, f32),
    PauseChanging(bool, bool),
    PauseChanged(bool, bool, f32),
}

/// Record every change event; "after" events also capture the knob value at
/// the time they fire.
fn record_events(world: &mut World) -> Arc<Mutex<Vec<Seen>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    world.add_observer(move |trigger: On<BaseTimeScaleChanging>| {
        let e = trigger.event();
        s.lock().unwrap().push(Seen::BaseChanging(e.old, e.new));
    });
    let s = seen.clone();
    world.add_observer(
        move |trigger: On<BaseTimeScaleChanged>, time: Res<WorldTime>| {
            let e = trigger.event();
            s.lock()
                .unwrap()
                .push(Seen::BaseChanged(e.old, e.new, time.time_scale));
        },
    );
    let s = seen.clone();
    world.add_observer(move |trigger: On<ManualPauseChanging>| {
        let e = trigger.event();
        s.lock().unwrap().push(Seen::PauseChanging(e.old, e.new));
    });
    let s = seen.clone();
    world.add_observer(
        move |trigger: On<ManualPauseChanged>, time: Res<WorldTime>| {
            let e = trigger.event();
            s.lock()
                .unwrap()
                .push(Seen::PauseChanged(e.old, e.new, time.time_scale));
        },
    );
    world.flush();
    seen
}

// =============================================================================
// Base time scale
// =============================================================================

#[test]
fn set_base_time_scale_round_trips_non_negative_values() {
    let mut world = make_world(1.0, 1.0);
    for v in [0.0, 0.25, 1.0, 3.5] {
        set_base_time_scale(&mut world, v);
        assert!(approx_eq(base_time_scale(&mut world), v));
    }
}

#[test]
fn set_base_time_scale_clamps_negative_to_zero() {
    let mut world = make_world(1.0, 1.0);
    set_base_time_scale(&mut world, -2.0);
    assert_eq!(base_time_scale(&mut world), 0.0);
    assert_eq!(knob(&world), 0.0);
}

#[test]
fn set_base_time_scale_ignores_nan() {
    let mut world = make_world(1.0, 1.0);
    let seen = record_events(&mut world);
    set_base_time_scale(&mut world, f32::NAN);
    assert_eq!(base_time_scale(&mut world), 1.0);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn base_change_fires_before_then_after_with_applied_scale() {
    let mut world = make_world(1.0, 0.5);
    let seen = record_events(&mut world);

    set_base_time_scale(&mut world, 2.0);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Seen::BaseChanging(1.0, 2.0), Seen::BaseChanged(1.0, 2.0, 1.0)]
    );
}

#[test]
fn before_event_sees_old_state() {
    let mut world = make_world(1.0, 1.0);
    let observed = Arc::new(Mutex::new(None));
    let observed_clone = observed.clone();
    world.add_observer(
        move |_trigger: On<BaseTimeScaleChanging>, controller: Res<TimeScaleController>| {
            *observed_clone.lock().unwrap() = Some(controller.base_time_scale());
        },
    );
    world.flush();

    set_base_time_scale(&mut world, 0.5);

    assert_eq!(*observed.lock().unwrap(), Some(1.0));
}

#[test]
fn near_equal_base_write_is_silent() {
    let mut world = make_world(1.0, 1.0);
    let seen = record_events(&mut world);

    set_base_time_scale(&mut world, 1.0);
    set_base_time_scale(&mut world, 1.0 + f32::EPSILON / 4.0);

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(base_time_scale(&mut world), 1.0);
}

// =============================================================================
// Manual pause
// =============================================================================

#[test]
fn manual_pause_twice_fires_one_pair() {
    let mut world = make_world(1.0, 1.0);
    let seen = record_events(&mut world);

    set_manual_pause(&mut world, true);
    set_manual_pause(&mut world, true);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            Seen::PauseChanging(false, true),
            Seen::PauseChanged(false, true, 0.0)
        ]
    );
    assert!(manual_pause(&mut world));
}

#[test]
fn resume_restores_previous_scale() {
    let mut world = make_world(0.5, 0.5);
    set_manual_pause(&mut world, true);
    assert_eq!(knob(&world), 0.0);
    set_manual_pause(&mut world, false);
    assert!(approx_eq(knob(&world), 0.25));
}

#[test]
fn unregistered_listener_stops_receiving() {
    let mut world = make_world(1.0, 1.0);
    let count = Arc::new(Mutex::new(0));
    let count_clone = count.clone();
    let listener = world
        .add_observer(move |_trigger: On<ManualPauseChanged>| {
            *count_clone.lock().unwrap() += 1;
        })
        .id();
    world.flush();

    set_manual_pause(&mut world, true);
    world.despawn(listener);
    set_manual_pause(&mut world, false);

    assert_eq!(*count.lock().unwrap(), 1);
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn pause_wins_over_override_and_accessibility() {
    let mut world = make_world(2.0, 0.5);
    set_temporary_override(&mut world, 3.0, 10.0);
    set_manual_pause(&mut world, true);

    assert_eq!(knob(&world), 0.0);
    assert_eq!(effective_time_scale(&mut world), 0.0);
}

#[test]
fn override_wins_over_base() {
    let mut world = make_world(1.0, 0.5);
    set_temporary_override(&mut world, 4.0, 10.0);

    assert!(approx_eq(knob(&world), 2.0));
    assert_eq!(temporary_override(&mut world), Some(4.0));
}

#[test]
fn base_path_multiplies_accessibility() {
    let mut world = make_world(0.5, 0.2);
    assert!(approx_eq(knob(&world), 0.1));
}

// =============================================================================
// Temporary override lifecycle
// =============================================================================

#[test]
fn override_applies_immediately_and_expires_on_unscaled_clock() {
    let mut world = make_world(1.0, 1.0);

    set_temporary_override(&mut world, 5.0, 2.0);
    assert!(approx_eq(knob(&world), 5.0));

    for _ in 0..3 {
        advance_frame(&mut world, 0.5);
        assert!(approx_eq(knob(&world), 5.0));
    }
    advance_frame(&mut world, 0.5);

    assert!(approx_eq(knob(&world), 1.0));
    assert_eq!(temporary_override(&mut world), None);
    assert!(approx_eq(world.resource::<WorldTime>().unscaled_elapsed, 2.0));
}

#[test]
fn override_expires_after_exact_frame_count_at_sixty_fps() {
    let mut world = make_world(1.0, 1.0);
    set_temporary_override(&mut world, 5.0, 2.0);

    let mut frames = 0;
    while temporary_override(&mut world).is_some() && frames < 200 {
        advance_frame(&mut world, 1.0 / 60.0);
        frames += 1;
    }

    assert_eq!(frames, 120);
    assert!(approx_eq(knob(&world), 1.0));
}

#[test]
fn zero_override_still_expires() {
    let mut world = make_world(1.0, 1.0);

    set_temporary_override(&mut world, 0.0, 0.5);
    assert_eq!(knob(&world), 0.0);

    advance_frame(&mut world, 0.25);
    assert_eq!(world.resource::<WorldTime>().delta, 0.0);
    advance_frame(&mut world, 0.25);

    assert!(approx_eq(knob(&world), 1.0));
}

#[test]
fn override_expires_while_paused_and_pause_holds() {
    let mut world = make_world(1.0, 1.0);
    set_temporary_override(&mut world, 2.0, 0.5);
    set_manual_pause(&mut world, true);

    advance_frame(&mut world, 0.5);
    assert_eq!(temporary_override(&mut world), None);
    assert_eq!(knob(&world), 0.0);

    set_manual_pause(&mut world, false);
    assert!(approx_eq(knob(&world), 1.0));
}

#[test]
fn superseded_override_timer_never_fires() {
    let mut world = make_world(1.0, 1.0);
    let fired = Arc::new(Mutex::new(Vec::new()));
    let fired_clone = fired.clone();
    world.add_observer(move |trigger: On<DelayElapsed>| {
        fired_clone.lock().unwrap().push(trigger.event().entity);
    });
    world.flush();

    set_temporary_override(&mut world, 5.0, 10.0);
    assert_eq!(world.query::<&Delay>().iter(&world).count(), 1);

    set_temporary_override(&mut world, 9.0, 1.0);
    assert!(approx_eq(knob(&world), 9.0));
    assert_eq!(world.query::<&Delay>().iter(&world).count(), 1);

    advance_frame(&mut world, 0.5);
    advance_frame(&mut world, 0.5);
    assert!(approx_eq(knob(&world), 1.0));
    assert_eq!(fired.lock().unwrap().len(), 1);

    for _ in 0..24 {
        advance_frame(&mut world, 0.5);
    }
    assert_eq!(fired.lock().unwrap().len(), 1);
    assert!(approx_eq(knob(&world), 1.0));
}

#[test]
fn newer_override_survives_when_older_would_have_expired() {
    let mut world = make_world(1.0, 1.0);

    set_temporary_override(&mut world, 5.0, 0.5);
    advance_frame(&mut world, 0.25);
    set_temporary_override(&mut world, 3.0, 1.0);

    advance_frame(&mut world, 0.5);
    assert!(approx_eq(knob(&world), 3.0));
    advance_frame(&mut world, 0.5);
    assert!(approx_eq(knob(&world), 1.0));
}

#[test]
fn foreign_delay_does_not_clear_override() {
    let mut world = make_world(1.0, 1.0);
    set_temporary_override(&mut world, 4.0, 1.0);
    let other = schedule_delay(&mut world, 0.25);

    advance_frame(&mut world, 0.5);

    assert!(!is_delay_pending(&world, other));
    assert_eq!(temporary_override(&mut world), Some(4.0));
    assert!(approx_eq(knob(&world), 4.0));
}

#[test]
fn cancel_override_restores_immediately() {
    let mut world = make_world(0.5, 1.0);
    set_temporary_override(&mut world, 4.0, 10.0);

    cancel_temporary_override(&mut world);

    assert!(approx_eq(knob(&world), 0.5));
    assert_eq!(temporary_override(&mut world), None);
    assert_eq!(world.query::<&Delay>().iter(&world).count(), 0);
}

#[test]
fn cancel_override_without_pending_is_noop() {
    let mut world = make_world(1.0, 1.0);
    cancel_temporary_override(&mut world);
    cancel_temporary_override(&mut world);
    assert!(approx_eq(knob(&world), 1.0));

    let mut bare = World::new();
    cancel_temporary_override(&mut bare);
    assert!(!bare.contains_resource::<TimeScaleController>());
}

// =============================================================================
// Revert
// =============================================================================

#[test]
fn revert_restores_settings_default_and_unpauses() {
    let mut world = make_world(0.75, 0.5);
    set_base_time_scale(&mut world, 3.0);
    set_manual_pause(&mut world, true);
    set_temporary_override(&mut world, 8.0, 5.0);

    revert_time_scale(&mut world);

    assert!(!manual_pause(&mut world));
    assert!(approx_eq(base_time_scale(&mut world), 0.75));
    assert_eq!(temporary_override(&mut world), None);
    assert!(approx_eq(knob(&world), 0.375));
}

#[test]
fn revert_reads_settings_at_call_time() {
    let mut world = make_world(1.0, 1.0);
    world
        .resource_mut::<GameSettings>()
        .set_base_time_scale(0.25);

    revert_time_scale(&mut world);

    assert!(approx_eq(base_time_scale(&mut world), 0.25));
}

#[test]
fn revert_right_after_override_leaves_no_stale_scale() {
    let mut world = make_world(1.0, 0.5);
    set_temporary_override(&mut world, 6.0, 3.0);
    revert_time_scale(&mut world);

    assert!(approx_eq(knob(&world), 0.5));
    advance_frame(&mut world, 5.0);
    assert!(approx_eq(knob(&world), 0.5));
}

#[test]
fn revert_without_store_uses_one() {
    let mut world = World::new();
    set_base_time_scale(&mut world, 0.1);
    revert_time_scale(&mut world);
    assert_eq!(base_time_scale(&mut world), 1.0);
}

// =============================================================================
// Accessibility and frame sync
// =============================================================================

#[test]
fn accessibility_change_is_picked_up_on_next_frame_without_events() {
    let mut world = make_world(1.0, 1.0);
    let seen = record_events(&mut world);

    world
        .resource_mut::<GameSettings>()
        .set_accessibility_time_scale(0.5);
    advance_frame(&mut world, 0.1);

    assert!(approx_eq(knob(&world), 0.5));
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn accessibility_setter_applies_without_a_frame() {
    let mut world = make_world(1.0, 1.0);
    let seen = record_events(&mut world);

    set_accessibility_time_scale(&mut world, 0.5);

    assert!(approx_eq(knob(&world), 0.5));
    assert!(approx_eq(
        world.resource::<GameSettings>().accessibility_time_scale(),
        0.5
    ));
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn accessibility_setter_clamps_and_ignores_nan() {
    let mut world = make_world(1.0, 1.0);
    set_accessibility_time_scale(&mut world, -1.0);
    assert_eq!(knob(&world), 0.0);
    set_accessibility_time_scale(&mut world, f32::NAN);
    assert_eq!(knob(&world), 0.0);
}

#[test]
fn effective_scale_reflects_direct_settings_write_before_next_frame() {
    let mut world = make_world(1.0, 1.0);
    world
        .resource_mut::<GameSettings>()
        .set_accessibility_time_scale(0.5);

    assert!(approx_eq(effective_time_scale(&mut world), 0.5));
    assert!(approx_eq(knob(&world), 0.5));
}

#[test]
fn accessibility_change_applies_to_active_override() {
    let mut world = make_world(1.0, 1.0);
    set_temporary_override(&mut world, 4.0, 10.0);

    world
        .resource_mut::<GameSettings>()
        .set_accessibility_time_scale(0.25);
    apply_time_scale(&mut world);

    assert!(approx_eq(knob(&world), 1.0));
}

#[test]
fn sync_time_scale_system_runs_in_schedule() {
    let mut world = make_world(2.0, 1.0);
    world.resource_mut::<WorldTime>().time_scale = 123.0;
    world
        .resource_mut::<GameSettings>()
        .set_accessibility_time_scale(0.5);

    let mut schedule = Schedule::default();
    schedule.add_systems(sync_time_scale);
    schedule.run(&mut world);

    assert!(approx_eq(knob(&world), 1.0));
}

#[test]
fn sync_time_scale_system_skips_without_world_time() {
    let mut world = World::new();
    world.init_resource::<TimeScaleController>();

    let mut schedule = Schedule::default();
    schedule.add_systems(sync_time_scale);
    schedule.run(&mut world);

    assert!(!world.contains_resource::<WorldTime>());
}

#[test]
fn recompute_is_idempotent() {
    let mut world = make_world(1.5, 0.5);
    set_temporary_override(&mut world, 2.0, 1.0);
    let first = apply_time_scale(&mut world);
    let second = apply_time_scale(&mut world);
    assert_eq!(first, second);
    assert_eq!(first, Some(knob(&world)));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn controller_is_created_lazily_from_settings() {
    let mut world = World::new();
    let mut settings = GameSettings::new();
    settings.set_base_time_scale(0.5);
    world.insert_resource(settings);

    assert!(!world.contains_resource::<TimeScaleController>());
    assert_eq!(base_time_scale(&mut world), 0.5);
    assert!(world.contains_resource::<TimeScaleController>());
    assert!(approx_eq(knob(&world), 0.5));
}

#[test]
fn controller_defaults_to_one_without_settings() {
    let mut world = World::new();
    assert_eq!(base_time_scale(&mut world), 1.0);
    assert_eq!(effective_time_scale(&mut world), 1.0);
}

#[test]
fn init_resource_controller_still_expires_overrides() {
    let mut world = World::new();
    world.init_resource::<TimeScaleController>();

    set_temporary_override(&mut world, 3.0, 0.5);
    advance_frame(&mut world, 0.5);

    assert_eq!(temporary_override(&mut world), None);
}

#[test]
fn shutdown_cancels_override_and_restores_scale() {
    let mut world = make_world(0.5, 1.0);
    let fired = Arc::new(Mutex::new(0));
    let fired_clone = fired.clone();
    world.add_observer(move |_trigger: On<DelayElapsed>| {
        *fired_clone.lock().unwrap() += 1;
    });
    world.flush();

    set_temporary_override(&mut world, 4.0, 1.0);
    shutdown_time_scale(&mut world);

    assert!(approx_eq(knob(&world), 0.5));
    assert!(!world.contains_resource::<TimeScaleController>());

    advance_frame(&mut world, 2.0);
    assert_eq!(*fired.lock().unwrap(), 0);
    assert!(approx_eq(knob(&world), 0.5));
}

#[test]
fn shutdown_twice_is_safe() {
    let mut world = make_world(1.0, 1.0);
    shutdown_time_scale(&mut world);
    shutdown_time_scale(&mut world);
    assert!(!world.contains_resource::<TimeScaleController>());
}

#[test]
fn snapshot_reports_current_state() {
    let mut world = make_world(1.0, 0.5);
    set_temporary_override(&mut world, 2.0, 1.0);
    advance_frame(&mut world, 0.5);

    let snap = snapshot(&mut world);
    assert_eq!(snap.frame, 1);
    assert_eq!(snap.temporary_override, Some(2.0));
    assert!(approx_eq(snap.override_remaining.unwrap(), 0.5));
    assert!(approx_eq(snap.effective_time_scale, 1.0));
    assert!(approx_eq(snap.accessibility_time_scale, 0.5));
    assert!(approx_eq(snap.elapsed, 0.5));
    assert!(approx_eq(snap.unscaled_elapsed, 0.5));

    let json = serde_json::to_value(snap).unwrap();
    assert_eq!(json["manual_pause"], serde_json::json!(false));

    advance_frame(&mut world, 0.5);
    let snap = snapshot(&mut world);
    assert_eq!(snap.temporary_override, None);
    assert_eq!(snap.override_remaining, None);
}
