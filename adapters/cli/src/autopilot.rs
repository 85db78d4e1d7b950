use last_stand_core::{Key, KeyEvent};
use last_stand_system_simulation::Simulation;
use last_stand_world::query;

/// Headless stand-in for a human: aims at the closest enemy and keeps firing.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    shooting: bool,
    last_cash: u32,
}

impl Autopilot {
    /// Issues this frame's input.
    pub(crate) fn steer(&mut self, simulation: &mut Simulation) {
        let world = simulation.world();
        let (Some(player), Some(state)) = (query::player(world), query::player_state(world)) else {
            return;
        };
        let centre = player.centre();
        let target = query::entities(world)
            .filter(|entity| entity.as_enemy().is_some())
            .map(|entity| entity.centre())
            .min_by(|a, b| {
                a.distance_squared(centre)
                    .total_cmp(&b.distance_squared(centre))
            });
        let empty = state.inventory().selected().ammo() == 0;
        let cash = state.cash();

        match target {
            Some(point) => {
                simulation.aim(point);
                if !self.shooting {
                    simulation.key(KeyEvent::pressed(Key::Shoot));
                    self.shooting = true;
                }
            }
            None if self.shooting => {
                simulation.key(KeyEvent::released(Key::Shoot));
                self.shooting = false;
            }
            None => {}
        }

        if empty {
            tap(simulation, Key::Reload);
        }
        if cash > self.last_cash {
            tap(simulation, Key::Buy);
        }
        self.last_cash = cash;
    }
}

fn tap(simulation: &mut Simulation, key: Key) {
    simulation.key(KeyEvent::pressed(key));
    simulation.key(KeyEvent::released(key));
}
