#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Last Stand engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! collaborators (audio, UI) to react to. Geometry, countdowns, tuning tables
//! and the injectable [`RandomSource`] live here as well so every crate agrees
//! on them.

pub mod geometry;
mod random;
mod timing;
mod tuning;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use geometry::{Direction8, Rotation, Shape};
pub use glam::Vec2;
pub use random::{RandomSource, SeededRandom};
pub use timing::{secs_to_duration, Timer, TimerError};
pub use tuning::{
    ConfigError, DropTable, EnemyStats, MeleeStats, PlayerStats, ProjectileStats, SpawnPacing,
    SpriteMetrics, Tuning, DEFAULT_TUNING_TOML,
};

/// Generation tagged handle of an entity living in the registry.
///
/// A handle stays unique forever: once its entity is removed, the slot index
/// may be reused but the generation differs, so stale handles never alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Creates a handle from its slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the registry arena.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot at the time the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Fixed tag selecting the collision handler chain of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionKind {
    /// Generic entity; the root of every fallback chain.
    Entity,
    /// Anything with health.
    LivingEntity,
    /// Projectiles and explosions.
    Bullet,
    /// Static obstacles and boundaries.
    Wall,
    /// The player character.
    Player,
    /// Hostile characters.
    Enemy,
    /// Pickups.
    Collectable,
}

impl CollisionKind {
    /// Every kind, in declaration order.
    pub const ALL: [CollisionKind; 7] = [
        Self::Entity,
        Self::LivingEntity,
        Self::Bullet,
        Self::Wall,
        Self::Player,
        Self::Enemy,
        Self::Collectable,
    ];

    /// Kind consulted next when no handler is registered for this one.
    #[must_use]
    pub const fn fallback(self) -> Option<CollisionKind> {
        match self {
            Self::Entity => None,
            Self::Player | Self::Enemy => Some(Self::LivingEntity),
            Self::LivingEntity | Self::Bullet | Self::Wall | Self::Collectable => {
                Some(Self::Entity)
            }
        }
    }

    /// Reports whether this kind is `other` or specialises it.
    #[must_use]
    pub fn is_a(self, other: CollisionKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.fallback();
        }
        false
    }
}

/// Side a living entity fights for; melee only hurts the opposing side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    /// The player.
    Survivor,
    /// Every enemy.
    Horde,
}

impl Faction {
    /// The side this faction attacks.
    #[must_use]
    pub const fn opponent(self) -> Faction {
        match self {
            Self::Survivor => Self::Horde,
            Self::Horde => Self::Survivor,
        }
    }
}

/// Enemy archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow melee zombie.
    Walker,
    /// Armed enemy that keeps its distance.
    Cop,
    /// Large melee enemy appearing on boss waves.
    Boss,
}

impl EnemyKind {
    /// Every enemy kind in tuning order.
    pub const ALL: [EnemyKind; 3] = [Self::Walker, Self::Cop, Self::Boss];

    /// Position of the kind inside [`EnemyKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Walker => 0,
            Self::Cop => 1,
            Self::Boss => 2,
        }
    }
}

/// Every weapon the game knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Starting sidearm.
    Pistol,
    /// Rapid fire submachine gun.
    Uzi,
    /// Rifle firing piercing rounds.
    Rifle,
    /// Rocket launcher firing explosive rounds.
    Rpg,
    /// Claws of regular melee enemies.
    Melee,
    /// Claws of the boss.
    MeleeBoss,
}

impl WeaponKind {
    /// Firearms the player may own, cheapest first.
    pub const ARSENAL: [WeaponKind; 4] = [Self::Pistol, Self::Uzi, Self::Rifle, Self::Rpg];
}

/// Projectile variants fired by firearms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletKind {
    /// Removed on first contact.
    Regular,
    /// Passes through several living entities.
    Piercing,
    /// Detonates into an explosion when removed.
    Explosive,
}

/// Pickup variants dropped by enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectableKind {
    /// Spare magazines for the selected weapon.
    Ammo,
    /// Money for buying weapons.
    Cash,
    /// Restores health.
    Health,
}

/// Logical keys understood by the player controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Move up.
    Up,
    /// Move left.
    Left,
    /// Move down.
    Down,
    /// Move right.
    Right,
    /// Fire while held.
    Shoot,
    /// Reload the selected weapon.
    Reload,
    /// Buy the next weapon.
    Buy,
    /// Cycle to the next owned weapon.
    Switch,
}

/// Whether a key went down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    /// The key was pressed.
    Pressed,
    /// The key was released.
    Released,
}

/// Discrete key state change delivered by an input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key that changed.
    pub key: Key,
    /// New state of the key.
    pub state: KeyState,
}

impl KeyEvent {
    /// Key press.
    #[must_use]
    pub const fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    /// Key release.
    #[must_use]
    pub const fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
        }
    }
}

/// Audio cue requested from the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// A firearm fired.
    Shot(WeaponKind),
    /// A firearm started reloading.
    Reload(WeaponKind),
    /// A living entity took damage.
    Flesh,
    /// An enemy died.
    Death,
    /// An enemy swung its claws.
    Growl,
    /// An explosive round detonated.
    Explosion,
    /// The player picked something up.
    Pickup,
    /// The player bought a weapon.
    Purchase,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Forwards a key state change to the player controller.
    Key {
        /// Key that changed.
        key: Key,
        /// New state of the key.
        state: KeyState,
    },
    /// Moves the pointer the player aims at, in world coordinates.
    Aim {
        /// Pointer position.
        point: Vec2,
    },
    /// Announces that a new wave begins.
    BeginWave {
        /// One-based wave number.
        wave: u32,
    },
    /// Requests that an enemy enters the arena.
    SpawnEnemy {
        /// Archetype to build.
        kind: EnemyKind,
        /// Top-left corner of the new enemy.
        position: Vec2,
        /// Wave whose scaling applies to the enemy.
        wave: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// A new wave began.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
    },
    /// An enemy was scheduled to enter the arena.
    EnemySpawned {
        /// Handle of the new enemy.
        enemy: EntityId,
        /// Archetype of the enemy.
        kind: EnemyKind,
    },
    /// An enemy died.
    EnemyKilled {
        /// Handle of the dead enemy.
        enemy: EntityId,
        /// Entity credited with the kill.
        killer: EntityId,
        /// Score awarded to the killer.
        score: u32,
    },
    /// The player ran out of health; the session is over.
    PlayerDied {
        /// Final score.
        score: u32,
    },
    /// A living entity bled at the given point.
    BloodSpilled {
        /// Centre of the victim's collision area.
        at: Vec2,
    },
    /// The player picked up a collectable.
    Collected {
        /// Variant that was collected.
        kind: CollectableKind,
    },
    /// The player bought a weapon.
    WeaponPurchased {
        /// Weapon that was bought.
        weapon: WeaponKind,
        /// Price paid.
        cost: u32,
    },
    /// An audio cue should be played.
    Cue {
        /// Cue to play.
        cue: Cue,
    },
}

/// Draw pass a drawable belongs to. Passes are painted in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawLayer {
    /// Static scenery painted first.
    Background,
    /// Live entities.
    Entities,
    /// Bars, trails and text painted last.
    Overlay,
}

/// Character skins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Skin {
    /// The player.
    Survivor,
    /// A walker enemy.
    Walker,
    /// A cop enemy.
    Cop,
    /// The boss.
    Boss,
}

impl From<EnemyKind> for Skin {
    fn from(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Walker => Self::Walker,
            EnemyKind::Cop => Self::Cop,
            EnemyKind::Boss => Self::Boss,
        }
    }
}

/// Animation frame family of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Neutral frame shared by both cycles.
    Base,
    /// Alternate frame while moving.
    Walking,
    /// Alternate frame while standing.
    Idle,
}

/// Colour role of a status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarColour {
    /// Background of a health bar.
    Missing,
    /// Remaining health.
    Health,
    /// Remaining reload time.
    Reload,
}

/// Opaque visual reference resolved by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    /// Arena background image.
    Background,
    /// Character frame.
    Character {
        /// Whose sprite sheet to use.
        skin: Skin,
        /// Animation frame family.
        pose: Pose,
        /// Facing selecting the sprite column.
        facing: Direction8,
    },
    /// Bullet sprite.
    Bullet(BulletKind),
    /// Explosion sprite.
    Explosion,
    /// Car obstacle sprite.
    Car,
    /// Pickup sprite.
    Pickup(CollectableKind),
    /// Filled bar.
    Bar(BarColour),
    /// Line from the drawable position to position + size.
    Trail,
    /// Text line.
    Text(String),
}

/// Everything the renderer needs to paint one element.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    /// Draw pass.
    pub layer: DrawLayer,
    /// Top-left corner.
    pub position: Vec2,
    /// Extent.
    pub size: Vec2,
    /// Rotation around the centre.
    pub rotation: Rotation,
    /// What to paint.
    pub visual: Visual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_chains_end_at_entity() {
        assert_eq!(
            CollisionKind::Player.fallback(),
            Some(CollisionKind::LivingEntity)
        );
        assert_eq!(
            CollisionKind::LivingEntity.fallback(),
            Some(CollisionKind::Entity)
        );
        assert_eq!(CollisionKind::Wall.fallback(), Some(CollisionKind::Entity));
        for kind in CollisionKind::ALL {
            assert!(kind.is_a(CollisionKind::Entity));
        }
    }

    #[test]
    fn living_capability_matches_players_and_enemies_only() {
        let living: Vec<_> = CollisionKind::ALL
            .into_iter()
            .filter(|kind| kind.is_a(CollisionKind::LivingEntity))
            .collect();
        assert_eq!(
            living,
            vec![
                CollisionKind::LivingEntity,
                CollisionKind::Player,
                CollisionKind::Enemy
            ]
        );
        assert!(!CollisionKind::Enemy.is_a(CollisionKind::Player));
    }

    #[test]
    fn factions_oppose_each_other() {
        assert_eq!(Faction::Survivor.opponent(), Faction::Horde);
        assert_eq!(Faction::Horde.opponent(), Faction::Survivor);
    }
}
