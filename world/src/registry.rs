//! Generation tagged entity storage with deferred mutation.
//!
//! `add` and `remove` only record intent. The live set changes once per tick,
//! after every entity was updated and every intersecting pair was resolved, so
//! handles gathered at the start of a tick stay valid for its whole duration.

use std::time::Duration;

use last_stand_core::{CollisionKind, EntityId, Event, RandomSource, Shape};
use log::trace;

use crate::{
    catalog::Catalog,
    collision::notify,
    context::{Ctx, Effects},
    entity::{inflict, Entity, Role},
    weapon::Weapon,
};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
    reserved: bool,
}

/// Owns every entity of the world.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: Vec<EntityId>,
    pending_adds: Vec<Entity>,
    pending_removes: Vec<EntityId>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `entity` for insertion and returns its handle.
    ///
    /// The entity becomes visible once the pending mutations are committed.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.reserved = true;
        let id = EntityId::new(index, slot.generation);
        entity.assign_id(id);
        self.pending_adds.push(entity);
        id
    }

    /// Schedules removal. Repeated or stale requests are ignored.
    pub fn remove(&mut self, id: EntityId) {
        let known = self.slot(id).is_some_and(|slot| slot.entity.is_some() || slot.reserved);
        if known && !self.pending_removes.contains(&id) {
            self.pending_removes.push(id);
        }
    }

    /// Applies scheduled additions, then scheduled removals.
    pub fn commit(&mut self) {
        for entity in std::mem::take(&mut self.pending_adds) {
            let id = entity.id();
            let slot = &mut self.slots[id.index() as usize];
            slot.reserved = false;
            slot.entity = Some(entity);
            self.live.push(id);
        }

        for id in std::mem::take(&mut self.pending_removes) {
            let Some(slot) = self.slots.get_mut(id.index() as usize) else {
                continue;
            };
            if slot.generation != id.generation() || slot.entity.take().is_none() {
                continue;
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index());
            self.live.retain(|live| *live != id);
        }
    }

    /// Live entity behind `id`, if it still exists.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slot(id).and_then(|slot| slot.entity.as_ref())
    }

    /// Live entity behind `id`, mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.live.iter().filter_map(|id| self.get(*id))
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live entities whose collision shape intersects `area`.
    #[must_use]
    pub fn entities_in_area(&self, area: &Shape) -> Vec<EntityId> {
        self.iter()
            .filter(|entity| entity.shape().intersects(area))
            .map(Entity::id)
            .collect()
    }

    /// Whether any live entity is of `kind`, directly or through its fallbacks.
    #[must_use]
    pub fn contains_kind(&self, kind: CollisionKind) -> bool {
        self.iter().any(|entity| entity.collision_kind().is_a(kind))
    }

    /// Runs one tick: updates, collision sweep, then deferred mutations.
    pub fn update(
        &mut self,
        dt: Duration,
        catalog: &Catalog,
        rng: &mut dyn RandomSource,
        events: &mut Vec<Event>,
    ) {
        let mut effects = Effects::default();
        let snapshot = self.live.clone();

        for id in &snapshot {
            let target = self
                .get(*id)
                .and_then(Entity::target)
                .and_then(|target| self.get(target))
                .map(Entity::centre);
            if let Some(entity) = self.get_mut(*id) {
                let mut ctx = Ctx::new(catalog, rng, events, &mut effects);
                entity.update(dt, target, &mut ctx);
            }
            self.resolve_strikes(catalog, rng, events, &mut effects);
        }

        for (position, first) in snapshot.iter().enumerate() {
            for second in &snapshot[position + 1..] {
                let Some((a, b)) = self.pair_mut(*first, *second) else {
                    continue;
                };
                if !a.shape().intersects(&b.shape()) {
                    continue;
                }
                trace!("{first:?} touches {second:?}");
                let mut ctx = Ctx::new(catalog, rng, events, &mut effects);
                notify(a, b, &mut ctx);
                notify(b, a, &mut ctx);
            }
        }

        self.resolve_awards(&mut effects);
        for entity in effects.spawns.drain(..) {
            let _ = self.add(entity);
        }
        for id in effects.removals.drain(..) {
            self.remove(id);
        }
        self.commit();
    }

    fn resolve_strikes(
        &mut self,
        catalog: &Catalog,
        rng: &mut dyn RandomSource,
        events: &mut Vec<Event>,
        effects: &mut Effects,
    ) {
        let strikes = std::mem::take(&mut effects.strikes);
        for (attacker, strike) in strikes {
            let victims: Vec<EntityId> = self
                .entities_in_area(&strike.area)
                .into_iter()
                .filter(|id| {
                    self.get(*id)
                        .and_then(Entity::living)
                        .is_some_and(|living| {
                            !living.is_dead() && living.faction() == strike.faction.opponent()
                        })
                })
                .collect();
            if victims.is_empty() {
                continue;
            }
            for victim in victims {
                if let Some(entity) = self.get_mut(victim) {
                    let mut ctx = Ctx::new(catalog, rng, events, effects);
                    inflict(entity, strike.damage, attacker, &mut ctx);
                }
            }
            if let Some(Role::Enemy(enemy)) = self.get_mut(attacker).map(|entity| &mut entity.role)
            {
                if let Weapon::Melee(weapon) = &mut enemy.weapon {
                    weapon.landed();
                }
            }
        }
    }

    fn resolve_awards(&mut self, effects: &mut Effects) {
        for (killer, score) in effects.awards.drain(..) {
            if let Some(player) = self.get_mut(killer).and_then(Entity::as_player_mut) {
                player.score = player.score.saturating_add(score);
            }
        }
    }

    fn pair_mut(&mut self, first: EntityId, second: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        let (a, b) = (first.index() as usize, second.index() as usize);
        if a == b || self.slot(first).is_none() || self.slot(second).is_none() {
            return None;
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(high);
        let (low_slot, high_slot) = (&mut head[low], &mut tail[0]);
        let (low_entity, high_entity) = (low_slot.entity.as_mut()?, high_slot.entity.as_mut()?);
        if a < b {
            Some((low_entity, high_entity))
        } else {
            Some((high_entity, low_entity))
        }
    }

    fn slot(&self, id: EntityId) -> Option<&Slot> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
    }
}
