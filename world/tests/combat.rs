use std::{collections::VecDeque, time::Duration};

use last_stand_core::{
    BulletKind, CollectableKind, EnemyKind, EntityId, Event, RandomSource, Rotation, SeededRandom,
    Tuning, Vec2, WeaponKind,
};
use last_stand_world::{BulletVariant, Catalog, Entity, EntityRegistry, Shot, PIERCE_DEPTH};

const FRAME: Duration = Duration::from_millis(16);
const NOBODY: EntityId = EntityId::new(9_999, 0);

#[derive(Debug, Default)]
struct Scripted {
    units: VecDeque<f64>,
    below: VecDeque<u32>,
}

impl RandomSource for Scripted {
    fn roll_below(&mut self, _bound: u32) -> u32 {
        self.below.pop_front().unwrap_or(0)
    }

    fn roll_unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.99)
    }
}

fn catalog() -> Catalog {
    Catalog::new(Tuning::builtin().expect("builtin tuning"))
}

fn shot(origin: Vec2, damage: i32, kind: BulletKind) -> Shot {
    Shot {
        weapon: WeaponKind::Pistol,
        origin,
        rotation: Rotation::default(),
        speed: 0.0,
        damage,
        kind,
    }
}

fn health(registry: &EntityRegistry, id: EntityId) -> Option<i32> {
    registry
        .get(id)
        .and_then(Entity::living)
        .map(|living| living.health())
}

#[test]
fn lethal_bullet_kills_once_awards_score_and_drops_cash() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let player = registry.add(catalog.player(Vec2::new(1_000.0, 600.0)));
    let walker = registry.add(catalog.enemy(EnemyKind::Walker, Vec2::new(300.0, 300.0), 0, NOBODY));
    registry.commit();
    assert_eq!(health(&registry, walker), Some(30));

    let centre = registry.get(walker).map(Entity::centre).expect("walker");
    let _ = registry.add(catalog.bullet(shot(centre, 30, BulletKind::Regular), player));
    registry.commit();

    let mut rng = Scripted {
        units: VecDeque::from([0.1]),
        below: VecDeque::from([0]),
    };
    let mut events = Vec::new();
    registry.update(FRAME, &catalog, &mut rng, &mut events);

    let kills: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .collect();
    assert_eq!(
        kills,
        vec![&Event::EnemyKilled {
            enemy: walker,
            killer: player,
            score: 1
        }]
    );
    assert!(registry.get(walker).is_none());
    let score = registry
        .get(player)
        .and_then(Entity::as_player)
        .map(|player| player.score());
    assert_eq!(score, Some(1));

    let drops: Vec<(CollectableKind, Vec2)> = registry
        .iter()
        .filter_map(|entity| {
            entity
                .as_collectable()
                .map(|collectable| (collectable.kind(), entity.body().position))
        })
        .collect();
    assert_eq!(drops, vec![(CollectableKind::Cash, Vec2::new(300.0, 300.0))]);
    assert!(registry.iter().all(|entity| entity.as_bullet().is_none()));
}

#[test]
fn failed_drop_roll_leaves_nothing() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let player = registry.add(catalog.player(Vec2::new(1_000.0, 600.0)));
    let walker = registry.add(catalog.enemy(EnemyKind::Walker, Vec2::new(300.0, 300.0), 0, NOBODY));
    registry.commit();
    let centre = registry.get(walker).map(Entity::centre).expect("walker");
    let _ = registry.add(catalog.bullet(shot(centre, 50, BulletKind::Regular), player));
    registry.commit();

    let mut rng = Scripted {
        units: VecDeque::from([0.95]),
        below: VecDeque::new(),
    };
    registry.update(FRAME, &catalog, &mut rng, &mut Vec::new());
    assert!(registry.iter().all(|entity| entity.as_collectable().is_none()));
}

#[test]
fn piercing_round_survives_three_victims_without_repeat_damage() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let spot = Vec2::new(300.0, 300.0);
    let walkers: Vec<EntityId> = (0..PIERCE_DEPTH)
        .map(|_| registry.add(catalog.enemy(EnemyKind::Walker, spot, 0, NOBODY)))
        .collect();
    registry.commit();
    let centre = registry.get(walkers[0]).map(Entity::centre).expect("walker");
    let round = registry.add(catalog.bullet(shot(centre, 5, BulletKind::Piercing), NOBODY));
    registry.commit();

    let mut rng = SeededRandom::new(5);
    for _ in 0..3 {
        registry.update(FRAME, &catalog, &mut rng, &mut Vec::new());
    }

    for walker in &walkers {
        assert_eq!(health(&registry, *walker), Some(25));
    }
    let hits = registry
        .get(round)
        .and_then(Entity::as_bullet)
        .map(|bullet| match bullet.variant() {
            BulletVariant::Piercing { hits, .. } => *hits,
            _ => 0,
        });
    assert_eq!(hits, Some(PIERCE_DEPTH));
}

#[test]
fn piercing_round_is_removed_on_fourth_victim() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let spot = Vec2::new(300.0, 300.0);
    let walkers: Vec<EntityId> = (0..=PIERCE_DEPTH)
        .map(|_| registry.add(catalog.enemy(EnemyKind::Walker, spot, 0, NOBODY)))
        .collect();
    registry.commit();
    let centre = registry.get(walkers[0]).map(Entity::centre).expect("walker");
    let round = registry.add(catalog.bullet(shot(centre, 5, BulletKind::Piercing), NOBODY));
    registry.commit();

    registry.update(FRAME, &catalog, &mut SeededRandom::new(5), &mut Vec::new());

    assert!(registry.get(round).is_none());
    for walker in &walkers {
        assert_eq!(health(&registry, *walker), Some(25));
    }
}

#[test]
fn explosion_hurts_each_victim_once_spares_owner_and_expires() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let player = registry.add(catalog.player(Vec2::new(380.0, 360.0)));
    let walker = registry.add(catalog.enemy(EnemyKind::Walker, Vec2::new(420.0, 380.0), 0, NOBODY));
    registry.commit();
    let blast = registry.add(catalog.explosion(Vec2::new(420.0, 410.0), player, 10));
    registry.commit();

    let full = health(&registry, player);
    let mut rng = SeededRandom::new(11);
    let mut events = Vec::new();
    for _ in 0..10 {
        registry.update(Duration::from_millis(50), &catalog, &mut rng, &mut events);
    }
    assert_eq!(health(&registry, walker), Some(20));
    assert_eq!(health(&registry, player), full);
    assert!(registry.get(blast).is_some());

    for _ in 0..11 {
        registry.update(Duration::from_millis(50), &catalog, &mut rng, &mut events);
    }
    assert!(registry.get(blast).is_none());
    assert_eq!(health(&registry, walker), Some(20));
}

#[test]
fn explosive_round_detonates_exactly_once_when_flight_ends() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let round = registry.add(catalog.bullet(
        shot(Vec2::new(600.0, 300.0), 40, BulletKind::Explosive),
        NOBODY,
    ));
    registry.commit();
    let corner = registry
        .get(round)
        .map(|entity| entity.body().position)
        .expect("round");

    let mut rng = SeededRandom::new(2);
    let mut events = Vec::new();
    for _ in 0..12 {
        registry.update(Duration::from_millis(100), &catalog, &mut rng, &mut events);
    }

    assert!(registry.get(round).is_none());
    let blasts: Vec<Vec2> = registry
        .iter()
        .filter(|entity| {
            entity
                .as_bullet()
                .is_some_and(|bullet| matches!(bullet.variant(), BulletVariant::Explosion { .. }))
        })
        .map(Entity::centre)
        .collect();
    assert_eq!(blasts, vec![corner], "the blast is centred on the round's corner");
    let detonations = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::Cue {
                    cue: last_stand_core::Cue::Explosion
                }
            )
        })
        .count();
    assert_eq!(detonations, 1);
}

#[test]
fn any_bullet_contact_staggers_including_the_enemys_own() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let player = registry.add(catalog.player(Vec2::new(1_000.0, 600.0)));
    let hit = registry.add(catalog.enemy(EnemyKind::Walker, Vec2::new(100.0, 100.0), 0, NOBODY));
    let shooter = registry.add(catalog.enemy(EnemyKind::Walker, Vec2::new(500.0, 100.0), 0, NOBODY));
    registry.commit();

    let hit_centre = registry.get(hit).map(Entity::centre).expect("hit");
    let shooter_centre = registry.get(shooter).map(Entity::centre).expect("shooter");
    let _ = registry.add(catalog.bullet(shot(hit_centre, 1, BulletKind::Regular), player));
    let _ = registry.add(catalog.bullet(shot(shooter_centre, 1, BulletKind::Regular), shooter));
    registry.commit();
    registry.update(FRAME, &catalog, &mut SeededRandom::new(5), &mut Vec::new());

    let staggered = |id| {
        registry
            .get(id)
            .and_then(Entity::as_enemy)
            .map(|enemy| enemy.staggered())
    };
    assert_eq!(staggered(hit), Some(true));
    assert_eq!(staggered(shooter), Some(true));
    assert_eq!(health(&registry, hit), Some(29));
    assert_eq!(health(&registry, shooter), Some(30));
}

#[test]
fn bullets_pass_through_walls() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let wall = registry.add(catalog.boundary(Vec2::ZERO, Vec2::splat(200.0), false));
    let round = registry.add(catalog.bullet(
        shot(Vec2::splat(100.0), 10, BulletKind::Regular),
        NOBODY,
    ));
    registry.commit();

    for _ in 0..5 {
        registry.update(FRAME, &catalog, &mut SeededRandom::new(1), &mut Vec::new());
    }
    assert!(registry.get(round).is_some());
    assert!(registry.get(wall).is_some());
}

#[test]
fn enemies_ignore_barriers_but_not_obstacles() {
    let catalog = catalog();
    let mut registry = EntityRegistry::new();
    let player = registry.add(catalog.player(Vec2::new(700.0, 290.0)));
    let runner = registry.add(catalog.enemy(EnemyKind::Walker, Vec2::new(100.0, 0.0), 0, player));
    let _ = registry.add(catalog.boundary(Vec2::new(200.0, 0.0), Vec2::new(20.0, 200.0), true));
    let _ = registry.add(catalog.boundary(Vec2::new(200.0, 250.0), Vec2::new(20.0, 200.0), false));
    let blocked = registry.add(catalog.enemy(EnemyKind::Walker, Vec2::new(100.0, 300.0), 0, player));
    registry.commit();

    let mut rng = SeededRandom::new(4);
    for _ in 0..100 {
        registry.update(Duration::from_millis(50), &catalog, &mut rng, &mut Vec::new());
    }

    let x = |id| registry.get(id).map(|entity| entity.body().position.x);
    assert!(x(runner).is_some_and(|x| x > 220.0));
    assert!(x(blocked).is_some_and(|x| x < 160.0));
}
