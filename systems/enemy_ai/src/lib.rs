#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure decision logic steering every enemy towards its target.
//!
//! The world gathers a [`Perception`] for an enemy each tick and applies the
//! returned [`Intent`]; this crate never touches world state itself.

use last_stand_core::{Rotation, Vec2};

/// Speed multiplier applied while an enemy is staggered.
pub const STAGGER_SPEED_FACTOR: f32 = 0.2;

/// What an enemy knows about itself and its target this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perception {
    /// Centre of the enemy's collision area.
    pub centre: Vec2,
    /// Centre of the target's collision area, if the target still exists.
    pub target: Option<Vec2>,
    /// Full movement speed.
    pub speed: f32,
    /// Distance at which the enemy attacks.
    pub attack_range: f32,
    /// Whether the stagger countdown is still running.
    pub staggered: bool,
    /// Rounds left for firearm wielders, `None` for melee.
    pub ammo: Option<u32>,
}

/// What the enemy does this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intent {
    /// New facing, when there is something to face.
    pub facing: Option<Rotation>,
    /// New velocity.
    pub velocity: Vec2,
    /// Whether to use the weapon.
    pub attack: bool,
    /// Whether to reload the firearm.
    pub reload: bool,
}

impl Intent {
    const IDLE: Intent = Intent {
        facing: None,
        velocity: Vec2::ZERO,
        attack: false,
        reload: false,
    };
}

/// Chooses facing, velocity, attack and reload for one enemy.
///
/// The enemy walks straight at its target, slowed while staggered, attacks
/// once within range unless staggered, and reloads an empty firearm.
#[must_use]
pub fn decide(perception: &Perception) -> Intent {
    let reload = perception.ammo == Some(0);
    let Some(target) = perception.target else {
        return Intent {
            reload,
            ..Intent::IDLE
        };
    };

    let offset = target - perception.centre;
    let speed = if perception.staggered {
        perception.speed * STAGGER_SPEED_FACTOR
    } else {
        perception.speed
    };

    Intent {
        facing: Some(Rotation::toward(perception.centre, target)),
        velocity: offset.normalize_or_zero() * speed,
        attack: offset.length() <= perception.attack_range && !perception.staggered,
        reload,
    }
}
