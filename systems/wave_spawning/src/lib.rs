#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave spawning system that queues budgeted waves and trickles them into the arena.

use std::{collections::VecDeque, time::Duration};

use last_stand_core::{Command, EnemyKind, Event, RandomSource, Tuning, Vec2};
use log::info;

/// Configuration parameters required to construct the wave spawner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    wave_timeout: Duration,
    release_interval: Duration,
    budget_per_wave: u32,
    boss_every: u32,
    weights: [u32; 3],
    scores: [u32; 3],
}

impl Config {
    /// Creates a configuration from explicit pacing values.
    ///
    /// `weights` and `scores` are indexed by [`EnemyKind::index`].
    #[must_use]
    pub const fn new(
        wave_timeout: Duration,
        release_interval: Duration,
        budget_per_wave: u32,
        boss_every: u32,
        weights: [u32; 3],
        scores: [u32; 3],
    ) -> Self {
        Self {
            wave_timeout,
            release_interval,
            budget_per_wave,
            boss_every,
            weights,
            scores,
        }
    }

    /// Reads pacing, sampling weights and budget costs from tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let pacing = tuning.spawning;
        Self::new(
            pacing.wave_timeout,
            pacing.release_interval,
            pacing.budget_per_wave,
            pacing.boss_every,
            EnemyKind::ALL.map(|kind| tuning.enemy(kind).weight),
            EnemyKind::ALL.map(|kind| tuning.enemy(kind).score),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Queued {
    kind: EnemyKind,
    position: Vec2,
    wave: u32,
}

/// Pure system that starts waves and releases their members one at a time.
///
/// A wave starts when the previous one timed out or no enemy is left alive.
/// Queued enemies survive the start of a new wave.
#[derive(Debug)]
pub struct WaveSpawner {
    config: Config,
    rng: Box<dyn RandomSource>,
    wave: u32,
    elapsed: Duration,
    release_in: Duration,
    queue: VecDeque<Queued>,
}

impl WaveSpawner {
    /// Creates a spawner that has not started any wave yet.
    #[must_use]
    pub fn new(config: Config, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            rng,
            wave: 0,
            elapsed: Duration::ZERO,
            release_in: Duration::ZERO,
            queue: VecDeque::new(),
        }
    }

    /// Number of the latest wave, zero before the first.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Enemies waiting to enter, in release order.
    pub fn queued(&self) -> impl Iterator<Item = EnemyKind> + '_ {
        self.queue.iter().map(|queued| queued.kind)
    }

    /// Consumes events and world views to emit wave and spawn commands.
    ///
    /// Nothing happens unless time advanced.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies_present: bool,
        spawn_points: &[Vec2],
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }
        if accumulated.is_zero() {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(accumulated);
        self.release_in = self.release_in.saturating_sub(accumulated);

        if self.elapsed > self.config.wave_timeout || !enemies_present {
            self.elapsed = Duration::ZERO;
            self.wave = self.wave.saturating_add(1);
            out.push(Command::BeginWave { wave: self.wave });
            self.queue_wave(spawn_points);
        }

        if self.release_in.is_zero() {
            if let Some(next) = self.queue.pop_front() {
                self.release_in = self.config.release_interval;
                out.push(Command::SpawnEnemy {
                    kind: next.kind,
                    position: next.position,
                    wave: next.wave,
                });
            }
        }
    }

    fn queue_wave(&mut self, spawn_points: &[Vec2]) {
        let wave = self.wave;
        let total_weight: u32 = self.config.weights.iter().sum();
        if spawn_points.is_empty() || total_weight == 0 {
            return;
        }

        let before = self.queue.len();
        let mut budget = i64::from(self.config.budget_per_wave) * i64::from(wave);
        let mut boss_pending = self.config.boss_every != 0 && wave % self.config.boss_every == 0;
        while budget > 0 {
            let point = self.rng.roll_below(spawn_points.len() as u32) as usize;
            let position = spawn_points[point.min(spawn_points.len() - 1)];

            if boss_pending {
                boss_pending = false;
                self.queue.push_back(Queued {
                    kind: EnemyKind::Boss,
                    position,
                    wave,
                });
            }

            let kind = self.sample_kind(total_weight);
            let cost = self.config.scores[kind.index()];
            if cost == 0 {
                break;
            }
            budget -= i64::from(cost);
            self.queue.push_back(Queued {
                kind,
                position,
                wave,
            });
        }
        info!(
            "wave {wave} queued {} enemies ({} waiting)",
            self.queue.len() - before,
            self.queue.len()
        );
    }

    fn sample_kind(&mut self, total_weight: u32) -> EnemyKind {
        let mut roll = self.rng.roll_below(total_weight);
        for kind in EnemyKind::ALL {
            let weight = self.config.weights[kind.index()];
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        EnemyKind::Walker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use last_stand_core::SeededRandom;

    #[test]
    fn cumulative_weights_pick_by_roll() {
        #[derive(Debug)]
        struct Fixed(u32);

        impl RandomSource for Fixed {
            fn roll_below(&mut self, _bound: u32) -> u32 {
                self.0
            }

            fn roll_unit(&mut self) -> f64 {
                0.0
            }
        }

        let config = Config::new(
            Duration::from_secs(35),
            Duration::from_millis(500),
            7,
            10,
            [80, 20, 0],
            [1, 3, 20],
        );
        let mut low = WaveSpawner::new(config, Box::new(Fixed(79)));
        assert_eq!(low.sample_kind(100), EnemyKind::Walker);
        let mut high = WaveSpawner::new(config, Box::new(Fixed(80)));
        assert_eq!(high.sample_kind(100), EnemyKind::Cop);
    }

    #[test]
    fn zero_weights_queue_nothing() {
        let config = Config::new(
            Duration::from_secs(35),
            Duration::from_millis(500),
            7,
            10,
            [0, 0, 0],
            [1, 3, 20],
        );
        let mut spawner = WaveSpawner::new(config, Box::new(SeededRandom::new(1)));
        let mut out = Vec::new();
        spawner.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(16),
            }],
            false,
            &[Vec2::ZERO],
            &mut out,
        );
        assert_eq!(out, vec![Command::BeginWave { wave: 1 }]);
        assert_eq!(spawner.queued().count(), 0);
    }
}
