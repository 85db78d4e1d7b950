//! Factories building fully configured entities and weapons from tuning.

use std::collections::BTreeSet;

use last_stand_core::{
    CollectableKind, EnemyKind, EntityId, Faction, Timer, Tuning, Vec2, WeaponKind,
};

use crate::{
    entity::{
        Body, Bullet, BulletVariant, Collectable, Enemy, Entity, Living, Player, Role, Trail, Wall,
        BULLET_FLIGHT, ENEMY_ANIMATION_TICK, EXPLOSION_LIFETIME, PLAYER_ANIMATION_TICK,
    },
    weapon::{MeleeWeapon, ProjectileWeapon, Shot, Weapon, WeaponInventory},
};

/// Wave from which armed enemies carry each firearm, highest threshold last.
const ENEMY_ARSENAL: [(u32, WeaponKind); 4] = [
    (0, WeaponKind::Pistol),
    (15, WeaponKind::Uzi),
    (25, WeaponKind::Rifle),
    (35, WeaponKind::Rpg),
];

/// Builds entities from validated tuning.
#[derive(Clone, Debug)]
pub struct Catalog {
    tuning: Tuning,
}

impl Catalog {
    /// Creates a catalog over the provided tuning.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }

    /// Tuning backing the catalog.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Fresh firearm of the given kind, or `None` for melee kinds.
    #[must_use]
    pub fn firearm(&self, kind: WeaponKind) -> Option<ProjectileWeapon> {
        self.tuning
            .projectile(kind)
            .map(|stats| ProjectileWeapon::new(kind, *stats))
    }

    /// Weapon handed to an enemy joining at the given wave.
    ///
    /// Walkers and the boss always fight with claws; armed enemies get better
    /// firearms as waves progress.
    #[must_use]
    pub fn enemy_weapon(&self, kind: EnemyKind, wave: u32) -> Weapon {
        let claws = match kind {
            EnemyKind::Walker => Some(WeaponKind::Melee),
            EnemyKind::Boss => Some(WeaponKind::MeleeBoss),
            EnemyKind::Cop => None,
        };
        if let Some((claws, stats)) =
            claws.and_then(|claws| self.tuning.melee(claws).map(|stats| (claws, *stats)))
        {
            return Weapon::Melee(MeleeWeapon::new(claws, stats, Faction::Horde));
        }

        let firearm = ENEMY_ARSENAL
            .iter()
            .rev()
            .find(|(from, _)| wave >= *from)
            .map_or(WeaponKind::Pistol, |(_, kind)| *kind);
        let weapon = self.firearm(firearm).unwrap_or_else(|| {
            let (kind, stats) = self.tuning.starting_firearm();
            ProjectileWeapon::new(kind, *stats)
        });
        Weapon::Projectile(weapon)
    }

    /// The player, standing at `position` with a pistol and spare magazines.
    #[must_use]
    pub fn player(&self, position: Vec2) -> Entity {
        let stats = self.tuning.player;
        let (kind, pistol) = self.tuning.starting_firearm();
        let inventory = WeaponInventory::new(
            ProjectileWeapon::new(kind, *pistol),
            stats.starting_magazines,
        );
        let living = Living::new(
            stats.health,
            stats.speed,
            Faction::Survivor,
            position,
            PLAYER_ANIMATION_TICK,
        );
        let size = self.tuning.sprites.character;
        let aim = position + Vec2::new(size.x * 0.5, 0.0);
        Entity::new(
            Body::at(position, size),
            Role::Player(Player::new(living, inventory, aim)),
        )
    }

    /// An enemy of the given kind scaled to `wave`, chasing `target`.
    ///
    /// Health, speed and range grow linearly with the wave; score does not.
    #[must_use]
    pub fn enemy(&self, kind: EnemyKind, position: Vec2, wave: u32, target: EntityId) -> Entity {
        let stats = self.tuning.enemy(kind);
        let growth = stats.scaling * wave as f32;
        let health = (stats.health as f32 + growth) as i32;
        let size = match kind {
            EnemyKind::Boss => self.tuning.sprites.boss,
            EnemyKind::Walker | EnemyKind::Cop => self.tuning.sprites.character,
        };
        let enemy = Enemy {
            living: Living::new(
                health,
                stats.speed + growth,
                Faction::Horde,
                position,
                ENEMY_ANIMATION_TICK,
            ),
            kind,
            weapon: self.enemy_weapon(kind, wave),
            target,
            score: stats.score,
            attack_range: stats.attack_range + 3.0 * growth,
            stagger: Timer::complete(),
        };
        Entity::new(Body::at(position, size), Role::Enemy(enemy))
    }

    /// Bullet for a shot fired by `owner`, centred on the muzzle.
    #[must_use]
    pub fn bullet(&self, shot: Shot, owner: EntityId) -> Entity {
        let size = self.tuning.sprites.bullet;
        let position = shot.origin - size * 0.5;
        let body = Body {
            position,
            velocity: shot.rotation.unit() * shot.speed,
            size,
            rotation: shot.rotation,
        };
        let bullet = Bullet {
            owner,
            damage: shot.damage,
            flight: Timer::started(BULLET_FLIGHT),
            trail: Some(Trail::starting_at(position)),
            variant: BulletVariant::for_kind(shot.kind),
        };
        Entity::new(body, Role::Bullet(bullet))
    }

    /// Stationary blast centred on the detonation point.
    #[must_use]
    pub fn explosion(&self, centre: Vec2, owner: EntityId, damage: i32) -> Entity {
        let size = self.tuning.sprites.explosion;
        let bullet = Bullet {
            owner,
            damage,
            flight: Timer::started(EXPLOSION_LIFETIME),
            trail: None,
            variant: BulletVariant::Explosion {
                victims: BTreeSet::new(),
            },
        };
        Entity::new(Body::at(centre - size * 0.5, size), Role::Bullet(bullet))
    }

    /// Pickup whose corner rests at `position`.
    #[must_use]
    pub fn collectable(&self, kind: CollectableKind, position: Vec2) -> Entity {
        let size = self.tuning.sprites.collectable;
        let drops = self.tuning.drops;
        let amount = match kind {
            CollectableKind::Ammo => drops.magazines,
            CollectableKind::Cash => drops.cash,
            CollectableKind::Health => u32::try_from(drops.health).unwrap_or_default(),
        };
        let collectable = Collectable {
            kind,
            amount,
            anchor: position,
            elapsed: std::time::Duration::ZERO,
            collected: false,
        };
        Entity::new(Body::at(position, size), Role::Collectable(collectable))
    }

    /// Drawn car obstacle that blocks everyone.
    #[must_use]
    pub fn car(&self, position: Vec2) -> Entity {
        Entity::new(
            Body::at(position, self.tuning.sprites.car),
            Role::Wall(Wall {
                barrier: false,
                visible: true,
            }),
        )
    }

    /// Invisible wall; barriers only stop the player.
    #[must_use]
    pub fn boundary(&self, position: Vec2, size: Vec2, barrier: bool) -> Entity {
        Entity::new(
            Body::at(position, size),
            Role::Wall(Wall {
                barrier,
                visible: false,
            }),
        )
    }
}
