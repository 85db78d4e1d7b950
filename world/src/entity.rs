//! Entity model: shared body, role specific state, per tick behaviour and damage.

use std::{collections::BTreeSet, f32::consts::TAU, time::Duration};

use last_stand_core::{
    BulletKind, CollectableKind, CollisionKind, Cue, Direction8, EnemyKind, EntityId, Event,
    Faction, Key, KeyState, Pose, Rotation, Shape, Skin, Timer, Vec2, Visual, WeaponKind,
};
use last_stand_system_enemy_ai::{decide, Perception};
use log::{debug, info};
use smallvec::SmallVec;

use crate::{
    catalog::Catalog,
    context::Ctx,
    weapon::{Weapon, WeaponInventory},
};

/// Depth a piercing round survives; the next living contact removes it.
pub const PIERCE_DEPTH: u32 = 3;

pub(crate) const STAGGER: Duration = Duration::from_secs(1);
pub(crate) const BULLET_FLIGHT: Duration = Duration::from_secs(1);
pub(crate) const EXPLOSION_LIFETIME: Duration = Duration::from_secs(1);
pub(crate) const TRAIL_SPAN: Duration = Duration::from_millis(100);
pub(crate) const PLAYER_ANIMATION_TICK: Duration = Duration::from_millis(250);
pub(crate) const ENEMY_ANIMATION_TICK: Duration = Duration::from_millis(700);

const PLAYER_HITBOX_TRIM: f32 = 0.3;
const CAR_INSET_LEFT: f32 = 20.0;
const CAR_SHRINK: Vec2 = Vec2::new(40.0, 50.0);
const BOUNCE_AMPLITUDE: f32 = 5.0;
const BOUNCE_FREQUENCY: f32 = 1.0;
const UNASSIGNED: EntityId = EntityId::new(u32::MAX, 0);

/// Spatial state shared by every entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Top-left corner.
    pub position: Vec2,
    /// Movement per second.
    pub velocity: Vec2,
    /// Extent of the sprite.
    pub size: Vec2,
    /// Facing or travel direction.
    pub rotation: Rotation,
}

impl Body {
    /// Stationary body.
    #[must_use]
    pub fn at(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            rotation: Rotation::default(),
        }
    }
}

/// Health, movement and animation state of players and enemies.
#[derive(Clone, Debug, PartialEq)]
pub struct Living {
    pub(crate) health: i32,
    pub(crate) max_health: i32,
    pub(crate) speed: f32,
    pub(crate) facing: Direction8,
    pub(crate) previous_position: Vec2,
    pub(crate) animation: Duration,
    pub(crate) animation_tick: Duration,
    pub(crate) dead: bool,
    pub(crate) faction: Faction,
}

impl Living {
    pub(crate) fn new(
        health: i32,
        speed: f32,
        faction: Faction,
        position: Vec2,
        animation_tick: Duration,
    ) -> Self {
        Self {
            health,
            max_health: health,
            speed,
            facing: Direction8::SOUTH,
            previous_position: position,
            animation: Duration::ZERO,
            animation_tick,
            dead: false,
            faction,
        }
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Health cap.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Movement speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Sprite facing.
    #[must_use]
    pub const fn facing(&self) -> Direction8 {
        self.facing
    }

    /// Whether death already happened.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Side this entity fights for.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// Position before the latest movement step.
    #[must_use]
    pub const fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    /// Removes health, reporting `true` exactly once, on the blow that kills.
    pub(crate) fn wound(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0);
        if self.health == 0 && !self.dead {
            self.dead = true;
            return true;
        }
        false
    }

    pub(crate) fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    fn advance(&mut self, body: &mut Body, dt: Duration) {
        self.previous_position = body.position;
        body.position += body.velocity * dt.as_secs_f32();
        self.animation = self.animation.saturating_add(dt);
    }

    fn face(&mut self, rotation: Rotation) {
        self.facing = Direction8::from_rotation(rotation);
    }

    fn pose(&self, moving: bool) -> Pose {
        let tick = self.animation_tick.as_secs_f32();
        if tick <= 0.0 || self.animation.as_secs_f32() % (tick * 2.0) <= tick {
            Pose::Base
        } else if moving {
            Pose::Walking
        } else {
            Pose::Idle
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct HeldKeys {
    up: bool,
    left: bool,
    down: bool,
    right: bool,
}

impl HeldKeys {
    fn heading(&self) -> Vec2 {
        let axis = |positive: bool, negative: bool| f32::from(positive) - f32::from(negative);
        Vec2::new(
            axis(self.right, self.left),
            axis(self.down, self.up),
        )
        .normalize_or_zero()
    }
}

/// The survivor controlled through key events and the aim pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub(crate) living: Living,
    pub(crate) inventory: WeaponInventory,
    pub(crate) score: u32,
    pub(crate) cash: u32,
    pub(crate) alive: bool,
    held: HeldKeys,
    pub(crate) aim: Vec2,
    shooting: bool,
}

impl Player {
    pub(crate) fn new(living: Living, inventory: WeaponInventory, aim: Vec2) -> Self {
        Self {
            living,
            inventory,
            score: 0,
            cash: 0,
            alive: true,
            held: HeldKeys::default(),
            aim,
            shooting: false,
        }
    }

    /// Health and movement state.
    #[must_use]
    pub const fn living(&self) -> &Living {
        &self.living
    }

    /// Owned firearms.
    #[must_use]
    pub const fn inventory(&self) -> &WeaponInventory {
        &self.inventory
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Cash available for purchases.
    #[must_use]
    pub const fn cash(&self) -> u32 {
        self.cash
    }

    /// `false` once health ran out; the session is over from then on.
    #[must_use]
    pub const fn alive(&self) -> bool {
        self.alive
    }

    /// Applies a key state change. Actions trigger on press only.
    pub(crate) fn on_key(
        &mut self,
        key: Key,
        state: KeyState,
        catalog: &Catalog,
        events: &mut Vec<Event>,
    ) {
        let pressed = state == KeyState::Pressed;
        match key {
            Key::Up => self.held.up = pressed,
            Key::Left => self.held.left = pressed,
            Key::Down => self.held.down = pressed,
            Key::Right => self.held.right = pressed,
            Key::Shoot => self.shooting = pressed,
            Key::Reload if pressed && self.alive => {
                if self.reload() {
                    let weapon = self.inventory.selected().kind();
                    events.push(Event::Cue {
                        cue: Cue::Reload(weapon),
                    });
                }
            }
            Key::Buy if pressed && self.alive => self.buy(catalog, events),
            Key::Switch if pressed => self.inventory.select_next(),
            Key::Reload | Key::Buy | Key::Switch => {}
        }
    }

    /// Starts reloading the selected weapon from a spare magazine.
    ///
    /// Refused while a reload runs, when the magazine is full, or without spares.
    pub(crate) fn reload(&mut self) -> bool {
        let weapon = self.inventory.selected();
        if weapon.reloading() || weapon.ammo() == weapon.max_ammo() {
            return false;
        }
        if !self.inventory.take_magazine() {
            return false;
        }
        self.inventory.selected_mut().reload();
        true
    }

    fn buy(&mut self, catalog: &Catalog, events: &mut Vec<Event>) {
        let newest = self.inventory.newest().cost();
        for kind in WeaponKind::ARSENAL {
            let Some(weapon) = catalog.firearm(kind) else {
                continue;
            };
            let cost = weapon.cost();
            if cost <= newest || cost > self.cash {
                continue;
            }
            self.cash -= cost;
            self.inventory.acquire(weapon);
            events.push(Event::WeaponPurchased { weapon: kind, cost });
            events.push(Event::Cue { cue: Cue::Purchase });
            return;
        }
    }

    fn update(&mut self, id: EntityId, body: &mut Body, dt: Duration, ctx: &mut Ctx<'_>) {
        body.velocity = if self.alive {
            self.held.heading() * self.living.speed
        } else {
            Vec2::ZERO
        };
        self.living.advance(body, dt);
        self.inventory.selected_mut().update(dt);
        body.rotation = Rotation::toward(body.position, self.aim);
        self.living.face(body.rotation);

        if self.alive && self.shooting {
            let facing = self.living.facing;
            let weapon = self.inventory.selected_mut();
            let origin = body.position + weapon.muzzle(facing);
            if let Some(shot) = weapon.attack(origin, Rotation::toward(origin, self.aim)) {
                let bullet = ctx.catalog.bullet(shot, id);
                ctx.spawn(bullet);
                ctx.cue(Cue::Shot(shot.weapon));
            }
        }
    }
}

/// A hostile character chasing its target.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub(crate) living: Living,
    pub(crate) kind: EnemyKind,
    pub(crate) weapon: Weapon,
    pub(crate) target: EntityId,
    pub(crate) score: u32,
    pub(crate) attack_range: f32,
    pub(crate) stagger: Timer,
}

impl Enemy {
    /// Health and movement state.
    #[must_use]
    pub const fn living(&self) -> &Living {
        &self.living
    }

    /// Archetype.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Wielded weapon.
    #[must_use]
    pub const fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Score awarded on death.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Attack distance after wave scaling.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.attack_range
    }

    /// Whether the enemy is currently slowed by a hit.
    #[must_use]
    pub const fn staggered(&self) -> bool {
        !self.stagger.is_complete()
    }

    fn update(
        &mut self,
        id: EntityId,
        centre: Vec2,
        body: &mut Body,
        dt: Duration,
        target: Option<Vec2>,
        ctx: &mut Ctx<'_>,
    ) {
        if self.living.dead {
            return;
        }
        self.stagger.advance(dt);

        let intent = decide(&Perception {
            centre,
            target,
            speed: self.living.speed,
            attack_range: self.attack_range,
            staggered: self.staggered(),
            ammo: self.weapon.ammo(),
        });
        if let Some(facing) = intent.facing {
            body.rotation = facing;
        }
        body.velocity = intent.velocity;
        if intent.attack {
            self.attack(id, body, target, ctx);
        }
        if intent.reload {
            if let Weapon::Projectile(weapon) = &mut self.weapon {
                weapon.reload();
                ctx.cue(Cue::Reload(weapon.kind()));
            }
        }

        self.living.advance(body, dt);
        self.weapon.update(dt);
        self.living.face(body.rotation);
    }

    fn attack(&mut self, id: EntityId, body: &Body, target: Option<Vec2>, ctx: &mut Ctx<'_>) {
        match &mut self.weapon {
            Weapon::Projectile(weapon) => {
                let origin = body.position + weapon.muzzle(self.living.facing);
                let rotation = target.map_or(body.rotation, |goal| Rotation::toward(origin, goal));
                if let Some(shot) = weapon.attack(origin, rotation) {
                    let bullet = ctx.catalog.bullet(shot, id);
                    ctx.spawn(bullet);
                    ctx.cue(Cue::Shot(shot.weapon));
                }
            }
            Weapon::Melee(weapon) => {
                if let Some(strike) = weapon.attack(body.position, body.size) {
                    ctx.strike(id, strike);
                    ctx.cue(Cue::Growl);
                }
            }
        }
    }
}

/// Variant specific bullet state.
#[derive(Clone, Debug, PartialEq)]
pub enum BulletVariant {
    /// Removed on the first contact with anything but its owner.
    Regular,
    /// Passes through up to [`PIERCE_DEPTH`] living entities.
    Piercing {
        /// Entities already damaged.
        hit: SmallVec<[EntityId; 4]>,
        /// Distinct living contacts so far.
        hits: u32,
    },
    /// Detonates once when removed.
    Explosive {
        /// Whether the explosion was already scheduled.
        detonated: bool,
    },
    /// Stationary blast damaging every victim at most once.
    Explosion {
        /// Entities already damaged.
        victims: BTreeSet<EntityId>,
    },
}

impl BulletVariant {
    pub(crate) fn for_kind(kind: BulletKind) -> Self {
        match kind {
            BulletKind::Regular => Self::Regular,
            BulletKind::Piercing => Self::Piercing {
                hit: SmallVec::new(),
                hits: 0,
            },
            BulletKind::Explosive => Self::Explosive { detonated: false },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Trail {
    pub(crate) origin: Vec2,
    timer: Timer,
}

impl Trail {
    pub(crate) fn starting_at(origin: Vec2) -> Self {
        Self {
            origin,
            timer: Timer::started(TRAIL_SPAN),
        }
    }
}

/// A projectile or an explosion.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub(crate) owner: EntityId,
    pub(crate) damage: i32,
    pub(crate) flight: Timer,
    pub(crate) trail: Option<Trail>,
    pub(crate) variant: BulletVariant,
}

impl Bullet {
    /// Entity that fired the bullet; it is never damaged by it.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Damage per hit.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    /// Variant specific state.
    #[must_use]
    pub const fn variant(&self) -> &BulletVariant {
        &self.variant
    }

    /// Schedules removal; an explosive round detonates the first time this runs.
    pub(crate) fn retire(&mut self, id: EntityId, body: &Body, ctx: &mut Ctx<'_>) {
        ctx.remove(id);
        if let BulletVariant::Explosive { detonated } = &mut self.variant {
            if !*detonated {
                *detonated = true;
                let explosion = ctx.catalog.explosion(body.position, self.owner, self.damage);
                ctx.spawn(explosion);
                ctx.cue(Cue::Explosion);
            }
        }
    }

    fn update(&mut self, id: EntityId, body: &mut Body, dt: Duration, ctx: &mut Ctx<'_>) {
        body.position += body.velocity * dt.as_secs_f32();
        if let Some(trail) = &mut self.trail {
            trail.timer.advance(dt);
            if trail.timer.is_complete() {
                *trail = Trail::starting_at(body.position);
            }
        }
        self.flight.advance(dt);
        if self.flight.is_complete() {
            self.retire(id, body, ctx);
        }
    }
}

/// Immovable obstacle or boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    pub(crate) barrier: bool,
    pub(crate) visible: bool,
}

impl Wall {
    /// Map edge that only blocks the player.
    #[must_use]
    pub const fn barrier(&self) -> bool {
        self.barrier
    }

    /// Drawn obstacle with an inset collision area.
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.visible
    }
}

/// Bouncing pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collectable {
    pub(crate) kind: CollectableKind,
    pub(crate) amount: u32,
    pub(crate) anchor: Vec2,
    pub(crate) elapsed: Duration,
    pub(crate) collected: bool,
}

impl Collectable {
    /// Pickup variant.
    #[must_use]
    pub const fn kind(&self) -> CollectableKind {
        self.kind
    }

    /// Magnitude of the effect.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    fn update(&mut self, body: &mut Body, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        let phase = self.elapsed.as_secs_f32() * BOUNCE_FREQUENCY * TAU;
        body.position.y = self.anchor.y + phase.sin() * BOUNCE_AMPLITUDE;
    }
}

/// Role specific state of an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum Role {
    /// The player.
    Player(Player),
    /// An enemy.
    Enemy(Enemy),
    /// A bullet or explosion.
    Bullet(Bullet),
    /// A wall.
    Wall(Wall),
    /// A pickup.
    Collectable(Collectable),
}

/// Anything living in the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    id: EntityId,
    pub(crate) body: Body,
    collision: CollisionKind,
    pub(crate) role: Role,
}

impl Entity {
    /// Builds an entity; its collision kind follows from the role and never changes.
    #[must_use]
    pub fn new(body: Body, role: Role) -> Self {
        let collision = match &role {
            Role::Player(_) => CollisionKind::Player,
            Role::Enemy(_) => CollisionKind::Enemy,
            Role::Bullet(_) => CollisionKind::Bullet,
            Role::Wall(_) => CollisionKind::Wall,
            Role::Collectable(_) => CollisionKind::Collectable,
        };
        Self {
            id: UNASSIGNED,
            body,
            collision,
            role,
        }
    }

    /// Handle assigned by the registry.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    /// Spatial state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Collision tag.
    #[must_use]
    pub const fn collision_kind(&self) -> CollisionKind {
        self.collision
    }

    /// Role specific state.
    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    /// Player state, if this is the player.
    #[must_use]
    pub fn as_player(&self) -> Option<&Player> {
        match &self.role {
            Role::Player(player) => Some(player),
            _ => None,
        }
    }

    pub(crate) fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.role {
            Role::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Enemy state, if this is an enemy.
    #[must_use]
    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.role {
            Role::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Bullet state, if this is a bullet or explosion.
    #[must_use]
    pub fn as_bullet(&self) -> Option<&Bullet> {
        match &self.role {
            Role::Bullet(bullet) => Some(bullet),
            _ => None,
        }
    }

    /// Wall state, if this is a wall.
    #[must_use]
    pub fn as_wall(&self) -> Option<&Wall> {
        match &self.role {
            Role::Wall(wall) => Some(wall),
            _ => None,
        }
    }

    /// Pickup state, if this is a collectable.
    #[must_use]
    pub fn as_collectable(&self) -> Option<&Collectable> {
        match &self.role {
            Role::Collectable(collectable) => Some(collectable),
            _ => None,
        }
    }

    /// Health state of players and enemies.
    #[must_use]
    pub fn living(&self) -> Option<&Living> {
        match &self.role {
            Role::Player(player) => Some(&player.living),
            Role::Enemy(enemy) => Some(&enemy.living),
            _ => None,
        }
    }

    pub(crate) fn living_mut(&mut self) -> Option<&mut Living> {
        match &mut self.role {
            Role::Player(player) => Some(&mut player.living),
            Role::Enemy(enemy) => Some(&mut enemy.living),
            _ => None,
        }
    }

    /// Collision area in world coordinates.
    #[must_use]
    pub fn shape(&self) -> Shape {
        let Body { position, size, .. } = self.body;
        match &self.role {
            Role::Player(_) => {
                let trim = size.y * PLAYER_HITBOX_TRIM;
                Shape::ellipse(position + Vec2::new(0.0, trim), Vec2::new(size.x, size.y - trim))
            }
            Role::Wall(wall) if wall.visible => Shape::rect(
                position + Vec2::new(CAR_INSET_LEFT, 0.0),
                (size - CAR_SHRINK).max(Vec2::ZERO),
            ),
            Role::Wall(_) => Shape::rect(position, size),
            Role::Enemy(_) | Role::Bullet(_) | Role::Collectable(_) => {
                Shape::ellipse(position, size)
            }
        }
    }

    /// Centre of the collision area.
    #[must_use]
    pub fn centre(&self) -> Vec2 {
        self.shape().centre()
    }

    /// Entity this one chases, if any.
    #[must_use]
    pub fn target(&self) -> Option<EntityId> {
        self.as_enemy().map(|enemy| enemy.target)
    }

    /// Visual reference, or `None` for invisible geometry.
    #[must_use]
    pub fn visual(&self) -> Option<Visual> {
        let moving = self.body.velocity != Vec2::ZERO;
        match &self.role {
            Role::Player(player) => Some(Visual::Character {
                skin: Skin::Survivor,
                pose: player.living.pose(moving),
                facing: player.living.facing,
            }),
            Role::Enemy(enemy) => Some(Visual::Character {
                skin: Skin::from(enemy.kind),
                pose: enemy.living.pose(moving),
                facing: enemy.living.facing,
            }),
            Role::Bullet(bullet) => Some(match bullet.variant {
                BulletVariant::Regular => Visual::Bullet(BulletKind::Regular),
                BulletVariant::Piercing { .. } => Visual::Bullet(BulletKind::Piercing),
                BulletVariant::Explosive { .. } => Visual::Bullet(BulletKind::Explosive),
                BulletVariant::Explosion { .. } => Visual::Explosion,
            }),
            Role::Wall(wall) => wall.visible.then_some(Visual::Car),
            Role::Collectable(collectable) => Some(Visual::Pickup(collectable.kind)),
        }
    }

    /// Runs one tick of behaviour. `target` is the centre of the chased entity.
    pub(crate) fn update(&mut self, dt: Duration, target: Option<Vec2>, ctx: &mut Ctx<'_>) {
        let centre = self.centre();
        let Self { id, body, role, .. } = self;
        match role {
            Role::Player(player) => player.update(*id, body, dt, ctx),
            Role::Enemy(enemy) => enemy.update(*id, centre, body, dt, target, ctx),
            Role::Bullet(bullet) => bullet.update(*id, body, dt, ctx),
            Role::Collectable(collectable) => collectable.update(body, dt),
            Role::Wall(_) => {}
        }
    }
}

/// Damages a living entity on behalf of `attacker`, running death logic once.
///
/// Non-living entities and entities that already died are left untouched.
pub(crate) fn inflict(victim: &mut Entity, amount: i32, attacker: EntityId, ctx: &mut Ctx<'_>) {
    let at = victim.centre();
    let Some(living) = victim.living_mut() else {
        return;
    };
    if living.dead {
        return;
    }
    let died = living.wound(amount);
    ctx.emit(Event::BloodSpilled { at });
    ctx.cue(Cue::Flesh);
    if died {
        die(victim, attacker, ctx);
    }
}

fn die(victim: &mut Entity, killer: EntityId, ctx: &mut Ctx<'_>) {
    let id = victim.id;
    let corner = victim.body.position;
    match &mut victim.role {
        Role::Player(player) => {
            player.alive = false;
            info!("player died with score {}", player.score);
            ctx.emit(Event::PlayerDied {
                score: player.score,
            });
        }
        Role::Enemy(enemy) => {
            debug!("{:?} {:?} killed by {:?}", enemy.kind, id, killer);
            ctx.award(killer, enemy.score);
            ctx.emit(Event::EnemyKilled {
                enemy: id,
                killer,
                score: enemy.score,
            });
            ctx.cue(Cue::Death);
            ctx.remove(id);
            drop_loot(corner, ctx);
        }
        Role::Bullet(_) | Role::Wall(_) | Role::Collectable(_) => {}
    }
}

const DROP_ORDER: [CollectableKind; 3] = [
    CollectableKind::Cash,
    CollectableKind::Health,
    CollectableKind::Ammo,
];

fn drop_loot(corner: Vec2, ctx: &mut Ctx<'_>) {
    if ctx.rng.roll_unit() > ctx.catalog.tuning().drops.chance {
        return;
    }
    let roll = ctx.rng.roll_below(DROP_ORDER.len() as u32) as usize;
    let kind = DROP_ORDER[roll.min(DROP_ORDER.len() - 1)];
    let loot = ctx.catalog.collectable(kind, corner);
    ctx.spawn(loot);
}

/// Applies a pickup to the player.
pub(crate) fn collect(player: &mut Player, collectable: &Collectable) {
    match collectable.kind {
        CollectableKind::Ammo => player.inventory.add_magazines(collectable.amount),
        CollectableKind::Cash => player.cash = player.cash.saturating_add(collectable.amount),
        CollectableKind::Health => player
            .living
            .heal(i32::try_from(collectable.amount).unwrap_or(i32::MAX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn living() -> Living {
        Living::new(30, 40.0, Faction::Horde, Vec2::ZERO, ENEMY_ANIMATION_TICK)
    }

    #[test]
    fn wound_reports_death_exactly_once() {
        let mut living = living();
        assert!(!living.wound(10));
        assert!(living.wound(25));
        assert_eq!(living.health(), 0);
        assert!(!living.wound(5));
        assert!(living.is_dead());
    }

    #[test]
    fn heal_is_capped_at_max_health() {
        let mut living = living();
        let _ = living.wound(5);
        living.heal(100);
        assert_eq!(living.health(), living.max_health());
    }

    #[test]
    fn held_keys_give_unit_heading() {
        let held = HeldKeys {
            up: true,
            right: true,
            ..HeldKeys::default()
        };
        let heading = held.heading();
        assert!((heading.length() - 1.0).abs() < 1e-6);
        assert!(heading.x > 0.0 && heading.y < 0.0);
        let cancelled = HeldKeys {
            left: true,
            right: true,
            ..HeldKeys::default()
        };
        assert_eq!(cancelled.heading(), Vec2::ZERO);
    }

    #[test]
    fn pose_alternates_with_animation_tick() {
        let mut living = living();
        assert_eq!(living.pose(true), Pose::Base);
        living.animation = Duration::from_millis(1_000);
        assert_eq!(living.pose(true), Pose::Walking);
        assert_eq!(living.pose(false), Pose::Idle);
    }

    #[test]
    fn buying_skips_weapons_not_newer_than_the_latest() {
        let catalog = Catalog::new(last_stand_core::Tuning::builtin().expect("tuning"));
        let mut entity = catalog.player(Vec2::ZERO);
        let player = entity.as_player_mut().expect("player");
        let mut events = Vec::new();

        player.cash = 60;
        player.on_key(Key::Buy, KeyState::Pressed, &catalog, &mut events);
        assert_eq!(player.inventory().newest().kind(), WeaponKind::Uzi);
        assert_eq!(player.cash(), 10);

        player.on_key(Key::Buy, KeyState::Pressed, &catalog, &mut events);
        assert_eq!(player.inventory().len(), 2);

        player.cash = 1_000;
        player.on_key(Key::Buy, KeyState::Pressed, &catalog, &mut events);
        assert_eq!(player.inventory().newest().kind(), WeaponKind::Rifle);
        assert_eq!(player.inventory().selected_index(), 2);
        let purchases = events
            .iter()
            .filter(|event| matches!(event, Event::WeaponPurchased { .. }))
            .count();
        assert_eq!(purchases, 2);
    }

    #[test]
    fn player_death_is_reported_once() {
        let catalog = Catalog::new(last_stand_core::Tuning::builtin().expect("tuning"));
        let mut player = catalog.player(Vec2::ZERO);
        player.assign_id(EntityId::new(0, 0));
        let mut rng = last_stand_core::SeededRandom::new(3);
        let mut events = Vec::new();
        let mut effects = crate::context::Effects::default();
        let mut ctx = Ctx::new(&catalog, &mut rng, &mut events, &mut effects);
        inflict(&mut player, 500, EntityId::new(1, 0), &mut ctx);
        inflict(&mut player, 500, EntityId::new(1, 0), &mut ctx);

        assert!(!player.as_player().expect("player").alive());
        let deaths = events
            .iter()
            .filter(|event| matches!(event, Event::PlayerDied { score: 0 }))
            .count();
        assert_eq!(deaths, 1);
        assert!(effects.removals.is_empty());
    }

    #[test]
    fn car_collision_area_is_inset_from_sprite() {
        let wall = Entity::new(
            Body::at(Vec2::ZERO, Vec2::new(100.0, 120.0)),
            Role::Wall(Wall {
                barrier: false,
                visible: true,
            }),
        );
        let shape = wall.shape();
        assert_eq!(shape.min(), Vec2::new(20.0, 0.0));
        assert_eq!(shape.size(), Vec2::new(60.0, 70.0));
        assert_eq!(wall.visual(), Some(Visual::Car));
    }
}
