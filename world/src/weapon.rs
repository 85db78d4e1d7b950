//! Firearms, melee weapons and the player's inventory.

use std::time::Duration;

use last_stand_core::{
    BulletKind, Direction8, Faction, MeleeStats, ProjectileStats, Rotation, Shape, Timer, Vec2,
    WeaponKind,
};
use thiserror::Error;

/// Bullet requested by a firearm that fired.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Weapon that fired.
    pub weapon: WeaponKind,
    /// Top-left corner of the new bullet.
    pub origin: Vec2,
    /// Direction of travel.
    pub rotation: Rotation,
    /// Travel speed.
    pub speed: f32,
    /// Damage on hit.
    pub damage: i32,
    /// Bullet variant.
    pub kind: BulletKind,
}

/// Melee swing waiting to be resolved against the live set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    /// Reach of the swing.
    pub area: Shape,
    /// Damage dealt to every victim.
    pub damage: i32,
    /// Side of the attacker; only the opposing side is hurt.
    pub faction: Faction,
}

/// Ammunition, cooldown and reload state machine of a firearm.
///
/// A single countdown serves both as the delay between shots and as the
/// reload duration. Reloading refills the magazine at once; the flag only
/// prevents another reload from starting until the countdown completes.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileWeapon {
    kind: WeaponKind,
    stats: ProjectileStats,
    ammo: u32,
    timer: Timer,
    reloading: bool,
}

impl ProjectileWeapon {
    /// Creates a weapon with a full magazine, ready to fire.
    #[must_use]
    pub fn new(kind: WeaponKind, stats: ProjectileStats) -> Self {
        Self {
            kind,
            stats,
            ammo: stats.max_ammo,
            timer: Timer::complete(),
            reloading: false,
        }
    }

    /// Fires one bullet from `origin` if a round is chambered and the countdown elapsed.
    pub fn attack(&mut self, origin: Vec2, rotation: Rotation) -> Option<Shot> {
        if self.ammo == 0 || !self.timer.is_complete() {
            return None;
        }
        self.ammo -= 1;
        self.timer.restart(self.stats.cooldown);
        Some(Shot {
            weapon: self.kind,
            origin,
            rotation,
            speed: self.stats.speed,
            damage: self.stats.damage,
            kind: self.stats.bullet,
        })
    }

    /// Starts a reload and refills the magazine immediately.
    pub fn reload(&mut self) {
        self.reloading = true;
        self.timer.restart(self.stats.reload);
        self.ammo = self.stats.max_ammo;
    }

    /// Advances the shared countdown.
    pub fn update(&mut self, dt: Duration) {
        self.timer.advance(dt);
        if self.timer.is_complete() {
            self.reloading = false;
        }
    }

    /// Muzzle position relative to the owner's corner for the given facing.
    #[must_use]
    pub fn muzzle(&self, facing: Direction8) -> Vec2 {
        self.stats.muzzle[facing.index()]
    }

    /// Weapon identity.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Rounds left in the magazine.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Magazine capacity.
    #[must_use]
    pub const fn max_ammo(&self) -> u32 {
        self.stats.max_ammo
    }

    /// Whether a reload is still running.
    #[must_use]
    pub const fn reloading(&self) -> bool {
        self.reloading
    }

    /// Fraction of the reload still to go, `0.0` when not reloading.
    #[must_use]
    pub fn reload_left(&self) -> f32 {
        if !self.reloading || self.stats.reload.is_zero() {
            return 0.0;
        }
        self.timer.remaining().as_secs_f32() / self.stats.reload.as_secs_f32()
    }

    /// Purchase price.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.stats.cost
    }
}

/// Area attack that hurts every opponent within reach.
#[derive(Clone, Debug, PartialEq)]
pub struct MeleeWeapon {
    kind: WeaponKind,
    stats: MeleeStats,
    recharging: Timer,
    faction: Faction,
}

impl MeleeWeapon {
    /// Creates a ready weapon wielded by the given side.
    #[must_use]
    pub fn new(kind: WeaponKind, stats: MeleeStats, faction: Faction) -> Self {
        Self {
            kind,
            stats,
            recharging: Timer::complete(),
            faction,
        }
    }

    /// Swings if recharged. The reach ellipse grows from the owner's corner by the range.
    #[must_use]
    pub fn attack(&self, owner_position: Vec2, owner_size: Vec2) -> Option<Strike> {
        if !self.recharging.is_complete() {
            return None;
        }
        let range = Vec2::splat(self.stats.range);
        Some(Strike {
            area: Shape::ellipse(owner_position - range, owner_size + range),
            damage: self.stats.damage,
            faction: self.faction,
        })
    }

    /// Restarts the cooldown after a swing connected.
    pub fn landed(&mut self) {
        self.recharging.restart(self.stats.cooldown);
    }

    /// Advances the cooldown.
    pub fn update(&mut self, dt: Duration) {
        self.recharging.advance(dt);
    }

    /// Weapon identity.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Whether the cooldown is still running.
    #[must_use]
    pub const fn recharging(&self) -> bool {
        !self.recharging.is_complete()
    }
}

/// Weapon wielded by an enemy.
#[derive(Clone, Debug, PartialEq)]
pub enum Weapon {
    /// A firearm.
    Projectile(ProjectileWeapon),
    /// Claws.
    Melee(MeleeWeapon),
}

impl Weapon {
    /// Weapon identity.
    #[must_use]
    pub const fn kind(&self) -> WeaponKind {
        match self {
            Self::Projectile(weapon) => weapon.kind(),
            Self::Melee(weapon) => weapon.kind(),
        }
    }

    /// Rounds left, or `None` for melee weapons.
    #[must_use]
    pub const fn ammo(&self) -> Option<u32> {
        match self {
            Self::Projectile(weapon) => Some(weapon.ammo()),
            Self::Melee(_) => None,
        }
    }

    /// Advances cooldowns.
    pub fn update(&mut self, dt: Duration) {
        match self {
            Self::Projectile(weapon) => weapon.update(dt),
            Self::Melee(weapon) => weapon.update(dt),
        }
    }
}

/// Failure to address an inventory slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The slot index does not exist.
    #[error("inventory slot {index} is out of range for {len} weapons")]
    OutOfRange {
        /// Requested slot.
        index: usize,
        /// Number of owned weapons.
        len: usize,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct OwnedWeapon {
    weapon: ProjectileWeapon,
    magazines: u32,
}

/// Ordered firearms owned by the player, with spare magazines per weapon.
///
/// Never empty: it is created around a starting weapon and only grows.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponInventory {
    owned: Vec<OwnedWeapon>,
    selected: usize,
}

impl WeaponInventory {
    /// Creates an inventory holding the starting weapon.
    #[must_use]
    pub fn new(first: ProjectileWeapon, magazines: u32) -> Self {
        Self {
            owned: vec![OwnedWeapon {
                weapon: first,
                magazines,
            }],
            selected: 0,
        }
    }

    /// Number of owned weapons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owned.len()
    }

    /// Reports whether no weapon is owned, which never holds after construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owned.is_empty()
    }

    /// Weapon in the given slot.
    pub fn weapon(&self, index: usize) -> Result<&ProjectileWeapon, InventoryError> {
        self.slot(index).map(|owned| &owned.weapon)
    }

    /// Spare magazines of the weapon in the given slot.
    pub fn magazines(&self, index: usize) -> Result<u32, InventoryError> {
        self.slot(index).map(|owned| owned.magazines)
    }

    /// Selects the given slot.
    pub fn select(&mut self, index: usize) -> Result<(), InventoryError> {
        let _ = self.slot(index)?;
        self.selected = index;
        Ok(())
    }

    /// Index of the selected slot.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// Cycles to the next slot, wrapping around.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.owned.len();
    }

    /// The selected weapon.
    #[must_use]
    pub fn selected(&self) -> &ProjectileWeapon {
        &self.owned[self.selected].weapon
    }

    /// The selected weapon, mutably.
    pub fn selected_mut(&mut self) -> &mut ProjectileWeapon {
        &mut self.owned[self.selected].weapon
    }

    /// Spare magazines of the selected weapon.
    #[must_use]
    pub fn selected_magazines(&self) -> u32 {
        self.owned[self.selected].magazines
    }

    /// Most recently acquired weapon.
    #[must_use]
    pub fn newest(&self) -> &ProjectileWeapon {
        &self.owned[self.owned.len() - 1].weapon
    }

    /// Adds a weapon without spare magazines and selects it.
    pub fn acquire(&mut self, weapon: ProjectileWeapon) {
        self.owned.push(OwnedWeapon {
            weapon,
            magazines: 0,
        });
        self.selected = self.owned.len() - 1;
    }

    /// Adds spare magazines to the selected weapon.
    pub fn add_magazines(&mut self, count: u32) {
        let owned = &mut self.owned[self.selected];
        owned.magazines = owned.magazines.saturating_add(count);
    }

    /// Consumes one spare magazine of the selected weapon, if any.
    pub fn take_magazine(&mut self) -> bool {
        let owned = &mut self.owned[self.selected];
        if owned.magazines == 0 {
            return false;
        }
        owned.magazines -= 1;
        true
    }

    fn slot(&self, index: usize) -> Result<&OwnedWeapon, InventoryError> {
        self.owned.get(index).ok_or(InventoryError::OutOfRange {
            index,
            len: self.owned.len(),
        })
    }
}
