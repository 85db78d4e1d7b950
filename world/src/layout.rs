//! Static furnishing of the arena.

use last_stand_core::{RandomSource, Vec2};

use crate::{catalog::Catalog, entity::Entity};

const CAR_COUNT: u32 = 5;
const CAR_BANDS: f32 = 6.0;
const CAR_TOP: f32 = 0.3;
const CAR_DEPTH: f32 = 0.2;
const HOUSE_SIZE: Vec2 = Vec2::new(0.33, 0.09);
const PLAYER_START: Vec2 = Vec2::new(0.5, 0.8);

/// Obstacles, player start and enemy entry points of a fresh arena.
#[derive(Debug)]
pub(crate) struct Furnishing {
    pub(crate) obstacles: Vec<Entity>,
    pub(crate) player_start: Vec2,
    pub(crate) spawn_points: [Vec2; 4],
}

/// Lays out an arena of the tuned size. Cars are shuffled within their bands.
pub(crate) fn furnish(catalog: &Catalog, rng: &mut dyn RandomSource) -> Furnishing {
    let arena = catalog.tuning().arena;
    let margin = catalog.tuning().spawning.spawn_margin;
    let (w, h) = (arena.x, arena.y);

    let mut cars: Vec<Vec2> = (0..CAR_COUNT)
        .map(|band| {
            let x = w * (band as f32 + rng.roll_unit() as f32) / CAR_BANDS;
            let y = h * (CAR_TOP + CAR_DEPTH * rng.roll_unit() as f32);
            Vec2::new(x, y)
        })
        .collect();
    cars.sort_by(|a, b| a.y.total_cmp(&b.y));

    let house = arena * HOUSE_SIZE;
    let houses = [
        Vec2::ZERO,
        Vec2::new(w - house.x, 0.0),
        Vec2::new(0.0, h - house.y),
        Vec2::new(w - house.x, h - house.y),
    ];

    let barriers = [
        (Vec2::new(-margin, -margin), Vec2::new(w + 2.0 * margin, margin)),
        (Vec2::new(-margin, h), Vec2::new(w + 2.0 * margin, margin)),
        (Vec2::new(-margin, -margin), Vec2::new(margin, h + 2.0 * margin)),
        (Vec2::new(w, -margin), Vec2::new(margin, h + 2.0 * margin)),
    ];

    let mut obstacles: Vec<Entity> = barriers
        .into_iter()
        .map(|(position, size)| catalog.boundary(position, size, true))
        .collect();
    obstacles.extend(
        houses
            .into_iter()
            .map(|position| catalog.boundary(position, house, false)),
    );
    obstacles.extend(cars.into_iter().map(|position| catalog.car(position)));

    Furnishing {
        obstacles,
        player_start: arena * PLAYER_START,
        spawn_points: [
            Vec2::new(w * 0.5, -margin),
            Vec2::new(w * 0.5, h + margin),
            Vec2::new(-margin, h * 0.5),
            Vec2::new(w + margin, h * 0.5),
        ],
    }
}
