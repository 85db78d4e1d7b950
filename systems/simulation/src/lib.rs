#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame scheduler tying the world and the wave spawner together.
//!
//! Each frame the world advances first (entity updates, collisions, deferred
//! mutations), then the spawner reacts to the resulting events and its commands
//! are applied. Input arrives between frames as key and aim commands.

use std::time::Duration;

use last_stand_core::{Command, Drawable, Event, KeyEvent, RandomSource, SeededRandom, Tuning, Vec2};
use last_stand_system_wave_spawning::{Config, WaveSpawner};
use last_stand_world::{self as world, query, World};
use log::trace;
use thiserror::Error;

/// Errors reported by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// Elapsed time was negative, not finite or too large to represent.
    #[error("elapsed time must be a finite, non-negative number of seconds, got {0}")]
    InvalidElapsed(f64),
}

/// A running game session.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    spawner: WaveSpawner,
    events: Vec<Event>,
    frames: u64,
}

impl Simulation {
    /// Creates a session whose randomness replays from the two seeds.
    #[must_use]
    pub fn new(tuning: Tuning, world_seed: u64, spawner_seed: u64) -> Self {
        Self::with_sources(
            tuning,
            Box::new(SeededRandom::new(world_seed)),
            Box::new(SeededRandom::new(spawner_seed)),
        )
    }

    /// Creates a session drawing randomness from the provided sources.
    #[must_use]
    pub fn with_sources(
        tuning: Tuning,
        world_rng: Box<dyn RandomSource>,
        spawner_rng: Box<dyn RandomSource>,
    ) -> Self {
        let spawner = WaveSpawner::new(Config::from_tuning(&tuning), spawner_rng);
        Self {
            world: World::new(tuning, world_rng),
            spawner,
            events: Vec::new(),
            frames: 0,
        }
    }

    /// Advances the whole simulation by one frame of `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        self.spawner.handle(
            &events,
            query::enemies_present(&self.world),
            query::spawn_points(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        trace!("frame {} produced {} events", self.frames, events.len());
        self.events.append(&mut events);
    }

    /// Advances by a frame expressed in seconds.
    pub fn advance_secs(&mut self, seconds: f64) -> Result<(), SimulationError> {
        let dt = Duration::try_from_secs_f64(seconds)
            .map_err(|_| SimulationError::InvalidElapsed(seconds))?;
        self.advance(dt);
        Ok(())
    }

    /// Forwards a key state change to the player.
    pub fn key(&mut self, event: KeyEvent) {
        self.apply_input(Command::Key {
            key: event.key,
            state: event.state,
        });
    }

    /// Moves the aim pointer, in world coordinates.
    pub fn aim(&mut self, point: Vec2) {
        self.apply_input(Command::Aim { point });
    }

    /// Draw-ordered view of the current frame.
    #[must_use]
    pub fn drawables(&self) -> Vec<Drawable> {
        query::drawables(&self.world)
    }

    /// Takes every event produced since the previous call.
    ///
    /// Events accumulate until drained.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Whether the player is still alive; the session ends once this is `false`.
    #[must_use]
    pub fn player_alive(&self) -> bool {
        query::player_alive(&self.world)
    }

    /// Number of the current wave.
    #[must_use]
    pub fn wave(&self) -> u32 {
        query::wave(&self.world)
    }

    /// Read access to the world for queries.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    fn apply_input(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }
}
