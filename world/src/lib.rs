#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state of the Last Stand arena.
//!
//! The world owns the entity registry, the catalog that builds entities from
//! tuning and the random source used for loot and furnishing. Adapters and
//! systems mutate it exclusively through [`apply`] and read it through
//! [`query`].

mod catalog;
mod collision;
mod context;
mod entity;
mod layout;
mod overlay;
mod registry;
mod weapon;

use last_stand_core::{Command, EntityId, Event, RandomSource, Timer, Tuning, Vec2};
use log::debug;

pub use catalog::Catalog;
pub use entity::{
    Body, Bullet, BulletVariant, Collectable, Enemy, Entity, Living, Player, Role, Wall,
    PIERCE_DEPTH,
};
pub use registry::EntityRegistry;
pub use weapon::{
    InventoryError, MeleeWeapon, ProjectileWeapon, Shot, Strike, Weapon, WeaponInventory,
};

/// Represents the authoritative Last Stand world state.
#[derive(Debug)]
pub struct World {
    registry: EntityRegistry,
    catalog: Catalog,
    rng: Box<dyn RandomSource>,
    player: EntityId,
    spawn_points: [Vec2; 4],
    wave: u32,
    banner: Timer,
    tick_index: u64,
}

impl World {
    /// Creates a furnished arena with the player standing at its start point.
    #[must_use]
    pub fn new(tuning: Tuning, mut rng: Box<dyn RandomSource>) -> Self {
        let catalog = Catalog::new(tuning);
        let furnishing = layout::furnish(&catalog, rng.as_mut());
        let mut registry = EntityRegistry::new();
        for obstacle in furnishing.obstacles {
            let _ = registry.add(obstacle);
        }
        let player = registry.add(catalog.player(furnishing.player_start));
        registry.commit();
        debug!(
            "arena furnished with {} entities, player {:?}",
            registry.len(),
            player
        );

        Self {
            registry,
            catalog,
            rng,
            player,
            spawn_points: furnishing.spawn_points,
            wave: 0,
            banner: Timer::complete(),
            tick_index: 0,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world
                .registry
                .update(dt, &world.catalog, world.rng.as_mut(), out_events);
            world.banner.advance(dt);
        }
        Command::Key { key, state } => {
            if let Some(player) = world
                .registry
                .get_mut(world.player)
                .and_then(Entity::as_player_mut)
            {
                player.on_key(key, state, &world.catalog, out_events);
            }
        }
        Command::Aim { point } => {
            if let Some(player) = world
                .registry
                .get_mut(world.player)
                .and_then(Entity::as_player_mut)
            {
                player.aim = point;
            }
        }
        Command::BeginWave { wave } => {
            world.wave = wave;
            world
                .banner
                .restart(world.catalog.tuning().spawning.banner);
            debug!("wave {wave} begins at tick {}", world.tick_index);
            out_events.push(Event::WaveStarted { wave });
        }
        Command::SpawnEnemy {
            kind,
            position,
            wave,
        } => {
            let enemy = world.catalog.enemy(kind, position, wave, world.player);
            let id = world.registry.add(enemy);
            out_events.push(Event::EnemySpawned { enemy: id, kind });
        }
    }
}

/// Read-only views over the world.
pub mod query {
    use last_stand_core::{CollisionKind, DrawLayer, Drawable, EntityId, Rotation, Vec2, Visual};

    use super::{overlay, Entity, Player, World};

    /// Everything to paint this frame, grouped by layer in painting order.
    ///
    /// Entities appear in registry order; invisible walls are skipped.
    #[must_use]
    pub fn drawables(world: &World) -> Vec<Drawable> {
        let arena = world.catalog.tuning().arena;
        let mut out = vec![Drawable {
            layer: DrawLayer::Background,
            position: Vec2::ZERO,
            size: arena,
            rotation: Rotation::default(),
            visual: Visual::Background,
        }];

        for entity in world.registry.iter() {
            if let Some(visual) = entity.visual() {
                let body = entity.body();
                out.push(Drawable {
                    layer: DrawLayer::Entities,
                    position: body.position,
                    size: body.size,
                    rotation: body.rotation,
                    visual,
                });
            }
        }

        for entity in world.registry.iter() {
            overlay::status_bars(entity, &mut out);
            overlay::trail(entity, &mut out);
        }
        if world.wave > 0 && !world.banner.is_complete() {
            overlay::wave_banner(world.wave, arena, &mut out);
        }
        if let Some(player) = player(world) {
            overlay::hud(player, &mut out);
        }
        out
    }

    /// The player entity.
    #[must_use]
    pub fn player(world: &World) -> Option<&Entity> {
        world.registry.get(world.player)
    }

    /// Player specific state.
    #[must_use]
    pub fn player_state(world: &World) -> Option<&Player> {
        player(world).and_then(Entity::as_player)
    }

    /// Whether the session is still running.
    #[must_use]
    pub fn player_alive(world: &World) -> bool {
        player_state(world).is_some_and(Player::alive)
    }

    /// Whether any live entity is of `kind` or specialises it.
    #[must_use]
    pub fn contains_kind(world: &World, kind: CollisionKind) -> bool {
        world.registry.contains_kind(kind)
    }

    /// Whether any enemy is live.
    #[must_use]
    pub fn enemies_present(world: &World) -> bool {
        contains_kind(world, CollisionKind::Enemy)
    }

    /// Points just outside the arena edges where enemies enter.
    #[must_use]
    pub fn spawn_points(world: &World) -> &[Vec2; 4] {
        &world.spawn_points
    }

    /// Number of the current wave, zero before the first one.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Arena width and height.
    #[must_use]
    pub fn arena(world: &World) -> Vec2 {
        world.catalog.tuning().arena
    }

    /// Live entity behind `id`.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<&Entity> {
        world.registry.get(id)
    }

    /// Live entities in registry order.
    pub fn entities(world: &World) -> impl Iterator<Item = &Entity> + '_ {
        world.registry.iter()
    }
}
