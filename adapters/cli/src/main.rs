#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Last Stand session.

mod autopilot;
mod logger;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use last_stand_core::{Event, Tuning};
use last_stand_system_simulation::Simulation;
use last_stand_world::query;
use log::{debug, error, info, LevelFilter};

use crate::{autopilot::Autopilot, logger::Logger};

const SPAWNER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Runs the survival simulation with an autopilot holding the trigger.
#[derive(Debug, Parser)]
#[command(name = "last-stand", version)]
struct Args {
    /// Tuning file to load instead of the built-in tables.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 18_000)]
    frames: u64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Seed for every random decision of the session.
    #[arg(long, default_value_t = 0x1a57_57a2)]
    seed: u64,
    /// Most verbose log level to print.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[derive(Debug, Default)]
struct Tally {
    kills: u32,
    pickups: u32,
    purchases: u32,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::Collected { .. } => self.pickups += 1,
                Event::WeaponPurchased { weapon, cost } => {
                    self.purchases += 1;
                    info!("bought {weapon:?} for {cost}");
                }
                Event::WaveStarted { wave } => debug!("wave {wave} started"),
                _ => {}
            }
        }
    }
}

/// Entry point for the Last Stand command-line interface.
fn main() -> ExitCode {
    let args = Args::parse();
    Logger::init(args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    ensure!(args.fps > 0, "frames per second must be positive");
    let tuning = load_tuning(args.tuning.as_deref())?;
    let dt = Duration::from_secs(1) / args.fps;

    let mut simulation = Simulation::new(tuning, args.seed, args.seed ^ SPAWNER_SEED_SALT);
    let mut autopilot = Autopilot::default();
    let mut tally = Tally::default();
    let mut frames = 0;

    while frames < args.frames && simulation.player_alive() {
        autopilot.steer(&mut simulation);
        simulation.advance(dt);
        tally.record(&simulation.drain_events());
        frames += 1;
    }

    let score = query::player_state(simulation.world()).map_or(0, |player| player.score());
    info!(
        "session ended after {frames} frames ({:.1}s) on wave {}: score {score}, {} kills, {} pickups, {} purchases, player {}",
        dt.as_secs_f64() * frames as f64,
        simulation.wave(),
        tally.kills,
        tally.pickups,
        tally.purchases,
        if simulation.player_alive() { "alive" } else { "dead" },
    );
    Ok(())
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Tuning::builtin().context("built-in tuning is invalid");
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    Tuning::from_toml_str(&contents)
        .with_context(|| format!("failed to load tuning from {}", path.display()))
}
