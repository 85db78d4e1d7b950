use std::time::Duration;

use last_stand_core::{Command, EnemyKind, Event, SeededRandom, Tuning};
use last_stand_system_wave_spawning::{Config, WaveSpawner};
use last_stand_world::{query, World};

fn tuning() -> Tuning {
    Tuning::builtin().expect("builtin tuning")
}

fn elapsed(millis: u64) -> [Event; 1] {
    [Event::TimeAdvanced {
        dt: Duration::from_millis(millis),
    }]
}

fn spawner(seed: u64) -> WaveSpawner {
    WaveSpawner::new(
        Config::from_tuning(&tuning()),
        Box::new(SeededRandom::new(seed)),
    )
}

#[test]
fn empty_arena_starts_first_wave_and_releases_immediately() {
    let world = World::new(tuning(), Box::new(SeededRandom::new(1)));
    let spawn_points = query::spawn_points(&world);
    let mut spawner = spawner(7);
    let mut commands = Vec::new();

    spawner.handle(&elapsed(16), false, spawn_points, &mut commands);

    assert_eq!(commands.first(), Some(&Command::BeginWave { wave: 1 }));
    assert_eq!(commands.len(), 2, "one enemy released with the wave");
    match &commands[1] {
        Command::SpawnEnemy { position, wave, .. } => {
            assert_eq!(*wave, 1);
            assert!(spawn_points.contains(position));
        }
        other => panic!("unexpected command emitted: {other:?}"),
    }
}

#[test]
fn queued_enemies_trickle_at_release_interval() {
    let world = World::new(tuning(), Box::new(SeededRandom::new(1)));
    let spawn_points = query::spawn_points(&world);
    let mut spawner = spawner(3);
    let mut commands = Vec::new();
    spawner.handle(&elapsed(16), false, spawn_points, &mut commands);
    commands.clear();
    assert!(spawner.queued().count() > 0, "wave one has more members");

    spawner.handle(&elapsed(200), true, spawn_points, &mut commands);
    assert!(commands.is_empty(), "release interval not yet elapsed");
    spawner.handle(&elapsed(300), true, spawn_points, &mut commands);
    assert_eq!(commands.len(), 1);
    spawner.handle(&elapsed(499), true, spawn_points, &mut commands);
    assert_eq!(commands.len(), 1);
    spawner.handle(&elapsed(1), true, spawn_points, &mut commands);
    assert_eq!(commands.len(), 2);
}

#[test]
fn waves_time_out_even_with_survivors() {
    let world = World::new(tuning(), Box::new(SeededRandom::new(1)));
    let spawn_points = query::spawn_points(&world);
    let mut spawner = spawner(5);
    let mut commands = Vec::new();
    spawner.handle(&elapsed(16), false, spawn_points, &mut commands);

    spawner.handle(&elapsed(30_000), true, spawn_points, &mut commands);
    assert_eq!(spawner.wave(), 1);
    spawner.handle(&elapsed(6_000), true, spawn_points, &mut commands);
    assert_eq!(spawner.wave(), 2);
    assert!(commands.contains(&Command::BeginWave { wave: 2 }));
}

#[test]
fn no_time_no_wave() {
    let mut spawner = spawner(5);
    let mut commands = Vec::new();
    spawner.handle(&[], false, &[], &mut commands);
    assert!(commands.is_empty());
    assert_eq!(spawner.wave(), 0);
}

#[test]
fn every_tenth_wave_adds_exactly_one_boss() {
    let world = World::new(tuning(), Box::new(SeededRandom::new(1)));
    let spawn_points = query::spawn_points(&world);
    let mut spawner = spawner(11);
    let mut commands = Vec::new();

    for _ in 0..9 {
        spawner.handle(&elapsed(16), false, spawn_points, &mut commands);
    }
    assert_eq!(spawner.wave(), 9);
    let waiting_before = spawner.queued().count();
    assert_eq!(
        spawner.queued().filter(|kind| *kind == EnemyKind::Boss).count(),
        0
    );

    spawner.handle(&elapsed(16), false, spawn_points, &mut commands);
    assert_eq!(spawner.wave(), 10);
    let wave_ten: Vec<EnemyKind> = spawner.queued().skip(waiting_before).collect();
    let bosses = wave_ten.iter().filter(|kind| **kind == EnemyKind::Boss).count();
    assert_eq!(bosses, 1);

    let tuning = tuning();
    let budget: u32 = wave_ten
        .iter()
        .filter(|kind| **kind != EnemyKind::Boss)
        .map(|kind| tuning.enemy(*kind).score)
        .sum();
    assert!(budget >= tuning.spawning.budget_per_wave * 10);
}
