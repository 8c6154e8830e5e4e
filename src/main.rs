//! Headless time-scale demo.
//!
//! Drives a simulated frame loop through the time-scaling core and reports
//! the effective time scale each frame, either as a log line or as one JSON
//! object per line (`--json`).
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 120 --hit-pause 0.05:0.25 --hit-pause-frame 30
//! cargo run -- --json --pause-frame 10 --resume-frame 20
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::str::FromStr;

use timescale::events::timescale::{BaseTimeScaleChanged, ManualPauseChanged};
use timescale::resources::settings::GameSettings;
use timescale::resources::worldtime::{FixedTimestep, WorldTime};
use timescale::systems::time::advance_frame;
use timescale::systems::timescale::{
    init_time_scale, revert_time_scale, set_manual_pause, set_temporary_override,
    shutdown_time_scale, snapshot,
};

/// A temporary override given on the command line as `VALUE:SECONDS`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HitPause {
    value: f32,
    seconds: f32,
}

impl FromStr for HitPause {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, seconds) = s
            .split_once(':')
            .ok_or_else(|| format!("expected VALUE:SECONDS, got '{s}'"))?;
        let value = value
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("bad override value '{value}': {e}"))?;
        let seconds = seconds
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("bad override duration '{seconds}': {e}"))?;
        Ok(HitPause { value, seconds })
    }
}

/// Time-scale demo
#[derive(Parser)]
#[command(version, about = "Simulate a frame loop under pause, slow-motion and hit-pause")]
struct Cli {
    /// Settings file with [time] base_scale and [accessibility] time_scale.
    #[arg(long, value_name = "PATH", default_value = "./settings.ini")]
    settings: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u64,

    /// Unscaled seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Temporary override as VALUE:SECONDS, e.g. 0.05:0.2.
    #[arg(long, value_name = "VALUE:SECONDS")]
    hit_pause: Option<HitPause>,

    /// Frame at which the hit-pause starts.
    #[arg(long, default_value_t = 60)]
    hit_pause_frame: u64,

    /// Frame at which manual pause is switched on.
    #[arg(long)]
    pause_frame: Option<u64>,

    /// Frame at which manual pause is switched off again.
    #[arg(long)]
    resume_frame: Option<u64>,

    /// Frame at which everything is reverted to the settings default.
    #[arg(long)]
    revert_frame: Option<u64>,

    /// Print one JSON snapshot per frame instead of log lines.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if !(cli.dt.is_finite() && cli.dt > 0.0) {
        error!("--dt must be a positive number of seconds, got {}", cli.dt);
        std::process::exit(1);
    }

    let mut settings = GameSettings::with_path(&cli.settings);
    if let Err(e) = settings.load_from_file() {
        warn!("{e}; using default settings");
    }

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(FixedTimestep::default());
    world.insert_resource(settings);
    init_time_scale(&mut world);

    world.add_observer(|trigger: On<BaseTimeScaleChanged>| {
        let event = trigger.event();
        info!("Base time scale changed: {} -> {}", event.old, event.new);
    });
    world.add_observer(|trigger: On<ManualPauseChanged>| {
        let event = trigger.event();
        info!("Manual pause changed: {} -> {}", event.old, event.new);
    });
    world.flush();

    // --------------- Main loop ---------------
    for frame in 0..cli.frames {
        if cli.pause_frame == Some(frame) {
            set_manual_pause(&mut world, true);
        }
        if cli.resume_frame == Some(frame) {
            set_manual_pause(&mut world, false);
        }
        if let Some(hit) = cli.hit_pause {
            if frame == cli.hit_pause_frame {
                set_temporary_override(&mut world, hit.value, hit.seconds);
            }
        }
        if cli.revert_frame == Some(frame) {
            revert_time_scale(&mut world);
        }

        advance_frame(&mut world, cli.dt);

        let snap = snapshot(&mut world);
        if cli.json {
            match serde_json::to_string(&snap) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("Failed to serialize snapshot: {e}"),
            }
        } else {
            info!(
                "frame {:>4}: scale {:.3} (base {:.3}, paused {}, override {:?} for {:?}s) elapsed {:.3}/{:.3}",
                snap.frame,
                snap.effective_time_scale,
                snap.base_time_scale,
                snap.manual_pause,
                snap.temporary_override,
                snap.override_remaining,
                snap.elapsed,
                snap.unscaled_elapsed
            );
        }
    }

    shutdown_time_scale(&mut world);
}
