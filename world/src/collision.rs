//! Type directed collision resolution.
//!
//! Every role owns a [`HandlerTable`] keyed by the collision kind of the other
//! party. When no handler is registered for that kind, or a handler returns
//! [`Flow::Continue`], resolution walks [`CollisionKind::fallback`] until the
//! generic `Entity` entry has been consulted.

use last_stand_core::{CollisionKind, Cue, Event};
use log::trace;

use crate::{
    context::Ctx,
    entity::{collect, inflict, BulletVariant, Entity, Role, PIERCE_DEPTH, STAGGER},
};

/// Whether resolution proceeds to the fallback kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Stop,
    Continue,
}

type Handler = fn(&mut Entity, &mut Entity, &mut Ctx<'_>) -> Flow;

/// Handlers of one role, one entry per collision kind of the other party.
#[derive(Clone, Copy)]
pub(crate) struct HandlerTable {
    entity: Option<Handler>,
    living_entity: Option<Handler>,
    bullet: Option<Handler>,
    wall: Option<Handler>,
    player: Option<Handler>,
    enemy: Option<Handler>,
    collectable: Option<Handler>,
}

impl HandlerTable {
    const EMPTY: HandlerTable = HandlerTable {
        entity: None,
        living_entity: None,
        bullet: None,
        wall: None,
        player: None,
        enemy: None,
        collectable: None,
    };

    fn get(&self, kind: CollisionKind) -> Option<Handler> {
        match kind {
            CollisionKind::Entity => self.entity,
            CollisionKind::LivingEntity => self.living_entity,
            CollisionKind::Bullet => self.bullet,
            CollisionKind::Wall => self.wall,
            CollisionKind::Player => self.player,
            CollisionKind::Enemy => self.enemy,
            CollisionKind::Collectable => self.collectable,
        }
    }
}

const PLAYER: HandlerTable = HandlerTable {
    wall: Some(slide_along_wall),
    ..HandlerTable::EMPTY
};

const ENEMY: HandlerTable = HandlerTable {
    wall: Some(enemy_meets_wall),
    bullet: Some(stagger),
    ..HandlerTable::EMPTY
};

const BULLET: HandlerTable = HandlerTable {
    entity: Some(bullet_contact),
    living_entity: Some(bullet_hits_living),
    wall: Some(pass_through),
    collectable: Some(pass_through),
    ..HandlerTable::EMPTY
};

const PIERCING: HandlerTable = HandlerTable {
    entity: Some(piercing_contact),
    living_entity: Some(piercing_hits_living),
    wall: Some(pass_through),
    collectable: Some(pass_through),
    ..HandlerTable::EMPTY
};

const EXPLOSION: HandlerTable = HandlerTable {
    entity: Some(pass_through),
    living_entity: Some(explosion_hits_living),
    ..HandlerTable::EMPTY
};

const COLLECTABLE: HandlerTable = HandlerTable {
    player: Some(picked_up),
    ..HandlerTable::EMPTY
};

fn table_for(entity: &Entity) -> &'static HandlerTable {
    match &entity.role {
        Role::Player(_) => &PLAYER,
        Role::Enemy(_) => &ENEMY,
        Role::Bullet(bullet) => match bullet.variant {
            BulletVariant::Regular | BulletVariant::Explosive { .. } => &BULLET,
            BulletVariant::Piercing { .. } => &PIERCING,
            BulletVariant::Explosion { .. } => &EXPLOSION,
        },
        Role::Wall(_) => &HandlerTable::EMPTY,
        Role::Collectable(_) => &COLLECTABLE,
    }
}

/// Tells `me` that it touches `other`.
pub(crate) fn notify(me: &mut Entity, other: &mut Entity, ctx: &mut Ctx<'_>) {
    let table = table_for(me);
    let mut kind = Some(other.collision_kind());
    while let Some(current) = kind {
        if let Some(handler) = table.get(current) {
            if handler(me, other, ctx) == Flow::Stop {
                return;
            }
        }
        kind = current.fallback();
    }
}

fn pass_through(_: &mut Entity, _: &mut Entity, _: &mut Ctx<'_>) -> Flow {
    Flow::Stop
}

fn slide_along_wall(me: &mut Entity, wall: &mut Entity, _: &mut Ctx<'_>) -> Flow {
    let Some(previous) = me.living().map(|living| living.previous_position) else {
        return Flow::Stop;
    };
    let obstacle = wall.shape();
    let attempted = me.body.position;

    me.body.position = previous;
    me.body.position.x = attempted.x;
    if me.shape().intersects(&obstacle) {
        me.body.position.x = previous.x;
    }
    me.body.position.y = attempted.y;
    if me.shape().intersects(&obstacle) {
        me.body.position.y = previous.y;
    }
    Flow::Stop
}

fn enemy_meets_wall(me: &mut Entity, wall: &mut Entity, ctx: &mut Ctx<'_>) -> Flow {
    if wall.as_wall().is_some_and(|wall| wall.barrier) {
        return Flow::Stop;
    }
    slide_along_wall(me, wall, ctx)
}

fn stagger(me: &mut Entity, _: &mut Entity, _: &mut Ctx<'_>) -> Flow {
    if let Role::Enemy(enemy) = &mut me.role {
        enemy.stagger.restart(STAGGER);
    }
    Flow::Continue
}

fn bullet_contact(me: &mut Entity, other: &mut Entity, ctx: &mut Ctx<'_>) -> Flow {
    let id = me.id();
    let body = me.body;
    if let Role::Bullet(bullet) = &mut me.role {
        if other.id() != bullet.owner {
            bullet.retire(id, &body, ctx);
        }
    }
    Flow::Stop
}

fn bullet_hits_living(me: &mut Entity, victim: &mut Entity, ctx: &mut Ctx<'_>) -> Flow {
    let Role::Bullet(bullet) = &me.role else {
        return Flow::Stop;
    };
    if victim.id() != bullet.owner {
        inflict(victim, bullet.damage, bullet.owner, ctx);
    }
    Flow::Continue
}

fn piercing_hits_living(me: &mut Entity, victim: &mut Entity, ctx: &mut Ctx<'_>) -> Flow {
    let id = me.id();
    let Role::Bullet(bullet) = &mut me.role else {
        return Flow::Stop;
    };
    let BulletVariant::Piercing { hit, hits } = &mut bullet.variant else {
        return Flow::Stop;
    };
    let target = victim.id();
    if target == bullet.owner || hit.contains(&target) {
        return Flow::Stop;
    }
    hit.push(target);
    *hits += 1;
    trace!("piercing round {id:?} hit {target:?} ({hits} so far)");
    inflict(victim, bullet.damage, bullet.owner, ctx);
    Flow::Continue
}

fn piercing_contact(me: &mut Entity, other: &mut Entity, ctx: &mut Ctx<'_>) -> Flow {
    let id = me.id();
    let body = me.body;
    if let Role::Bullet(bullet) = &mut me.role {
        let spent = matches!(bullet.variant, BulletVariant::Piercing { hits, .. } if hits > PIERCE_DEPTH);
        if spent && other.id() != bullet.owner {
            bullet.retire(id, &body, ctx);
        }
    }
    Flow::Stop
}

fn explosion_hits_living(me: &mut Entity, victim: &mut Entity, ctx: &mut Ctx<'_>) -> Flow {
    let Role::Bullet(bullet) = &mut me.role else {
        return Flow::Stop;
    };
    let BulletVariant::Explosion { victims } = &mut bullet.variant else {
        return Flow::Stop;
    };
    let target = victim.id();
    if target != bullet.owner && victims.insert(target) {
        inflict(victim, bullet.damage, bullet.owner, ctx);
    }
    Flow::Stop
}

fn picked_up(me: &mut Entity, other: &mut Entity, ctx: &mut Ctx<'_>) -> Flow {
    let id = me.id();
    let (Role::Collectable(collectable), Some(player)) = (&mut me.role, other.as_player_mut())
    else {
        return Flow::Stop;
    };
    if collectable.collected || !player.alive {
        return Flow::Stop;
    }
    collectable.collected = true;
    collect(player, collectable);
    ctx.emit(Event::Collected {
        kind: collectable.kind,
    });
    ctx.cue(Cue::Pickup);
    ctx.remove(id);
    Flow::Stop
}

#[cfg(test)]
mod tests {
    use super::*;
    use last_stand_core::Vec2;

    use crate::entity::{Body, Wall};

    #[test]
    fn player_falls_back_to_living_then_entity() {
        let chain: Vec<_> =
            std::iter::successors(Some(CollisionKind::Player), |kind| kind.fallback()).collect();
        assert_eq!(
            chain,
            vec![
                CollisionKind::Player,
                CollisionKind::LivingEntity,
                CollisionKind::Entity
            ]
        );
        assert!(PLAYER.get(CollisionKind::Player).is_none());
        assert!(BULLET.get(CollisionKind::Player).is_none());
        assert!(BULLET.get(CollisionKind::LivingEntity).is_some());
    }

    #[test]
    fn walls_have_no_handlers() {
        let wall = Entity::new(
            Body::at(Vec2::ZERO, Vec2::ONE),
            Role::Wall(Wall {
                barrier: true,
                visible: false,
            }),
        );
        let table = table_for(&wall);
        assert!(CollisionKind::ALL.iter().all(|kind| table.get(*kind).is_none()));
    }
}
