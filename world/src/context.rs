use last_stand_core::{Cue, EntityId, Event, RandomSource};

use crate::{catalog::Catalog, entity::Entity, weapon::Strike};

/// Mutations requested while the registry iterates its live set.
#[derive(Debug, Default)]
pub(crate) struct Effects {
    pub(crate) spawns: Vec<Entity>,
    pub(crate) removals: Vec<EntityId>,
    pub(crate) awards: Vec<(EntityId, u32)>,
    pub(crate) strikes: Vec<(EntityId, Strike)>,
}

/// Services available to entity updates and collision handlers.
pub(crate) struct Ctx<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) rng: &'a mut dyn RandomSource,
    events: &'a mut Vec<Event>,
    effects: &'a mut Effects,
}

impl<'a> Ctx<'a> {
    pub(crate) fn new(
        catalog: &'a Catalog,
        rng: &'a mut dyn RandomSource,
        events: &'a mut Vec<Event>,
        effects: &'a mut Effects,
    ) -> Self {
        Self {
            catalog,
            rng,
            events,
            effects,
        }
    }

    pub(crate) fn spawn(&mut self, entity: Entity) {
        self.effects.spawns.push(entity);
    }

    pub(crate) fn remove(&mut self, id: EntityId) {
        self.effects.removals.push(id);
    }

    pub(crate) fn award(&mut self, killer: EntityId, score: u32) {
        self.effects.awards.push((killer, score));
    }

    pub(crate) fn strike(&mut self, attacker: EntityId, strike: Strike) {
        self.effects.strikes.push((attacker, strike));
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn cue(&mut self, cue: Cue) {
        self.events.push(Event::Cue { cue });
    }
}
