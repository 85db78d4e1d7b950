//! Bars, trails and text painted above the entities.

use last_stand_core::{BarColour, DrawLayer, Drawable, Rotation, Vec2, Visual};

use crate::entity::{Entity, Role};

const BAR_HEIGHT: f32 = 4.0;
const BAR_GAP: f32 = 6.0;
const RELOAD_BAR_OFFSET: f32 = 10.0;
const HUD_LINE: f32 = 24.0;
const HUD_MARGIN: f32 = 10.0;
const BANNER_HEIGHT: f32 = 0.05;

fn overlay(position: Vec2, size: Vec2, visual: Visual) -> Drawable {
    Drawable {
        layer: DrawLayer::Overlay,
        position,
        size,
        rotation: Rotation::default(),
        visual,
    }
}

fn bar(position: Vec2, width: f32, fill: f32, colour: BarColour) -> Drawable {
    overlay(
        position,
        Vec2::new(width * fill.clamp(0.0, 1.0), BAR_HEIGHT),
        Visual::Bar(colour),
    )
}

/// Health bars above living entities and the reload bar of the player.
pub(crate) fn status_bars(entity: &Entity, out: &mut Vec<Drawable>) {
    let Some(living) = entity.living() else {
        return;
    };
    let body = entity.body();
    let anchor = body.position - Vec2::new(0.0, BAR_GAP);
    let health = if living.max_health() > 0 {
        living.health() as f32 / living.max_health() as f32
    } else {
        0.0
    };
    out.push(bar(anchor, body.size.x, 1.0, BarColour::Missing));
    out.push(bar(anchor, body.size.x, health, BarColour::Health));

    if let Role::Player(player) = entity.role() {
        let left = player.inventory().selected().reload_left();
        if left > 0.0 {
            let above = anchor - Vec2::new(0.0, RELOAD_BAR_OFFSET);
            out.push(bar(above, body.size.x, left, BarColour::Reload));
        }
    }
}

/// Streak left behind a travelling bullet.
pub(crate) fn trail(entity: &Entity, out: &mut Vec<Drawable>) {
    let Some(trail) = entity.as_bullet().and_then(|bullet| bullet.trail) else {
        return;
    };
    let body = entity.body();
    let half = body.size * 0.5;
    out.push(overlay(
        trail.origin + half,
        body.position - trail.origin,
        Visual::Trail,
    ));
}

/// Announcement shown after a wave begins.
pub(crate) fn wave_banner(wave: u32, arena: Vec2, out: &mut Vec<Drawable>) {
    out.push(overlay(
        Vec2::new(0.0, arena.y * BANNER_HEIGHT),
        Vec2::new(arena.x, HUD_LINE),
        Visual::Text(format!("WAVE {wave}")),
    ));
}

/// Score, cash and ammunition of the player.
pub(crate) fn hud(player: &Entity, out: &mut Vec<Drawable>) {
    let Some(state) = player.as_player() else {
        return;
    };
    let weapon = state.inventory().selected();
    let lines = [
        format!("SCORE {}", state.score()),
        format!("CASH {}", state.cash()),
        format!(
            "{} / {}",
            weapon.ammo(),
            state.inventory().selected_magazines()
        ),
    ];
    for (row, text) in lines.into_iter().enumerate() {
        out.push(overlay(
            Vec2::new(HUD_MARGIN, HUD_MARGIN + HUD_LINE * row as f32),
            Vec2::new(0.0, HUD_LINE),
            Visual::Text(text),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use last_stand_core::Tuning;

    use crate::catalog::Catalog;

    #[test]
    fn living_entities_get_two_health_bars() {
        let catalog = Catalog::new(Tuning::builtin().expect("tuning"));
        let player = catalog.player(Vec2::new(100.0, 100.0));
        let mut out = Vec::new();
        status_bars(&player, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].visual, Visual::Bar(BarColour::Missing));
        assert_eq!(out[1].size.x, player.body().size.x);
        assert!(out.iter().all(|drawable| drawable.position.y < 100.0));

        let car = catalog.car(Vec2::ZERO);
        status_bars(&car, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn hud_reports_score_cash_and_ammo() {
        let catalog = Catalog::new(Tuning::builtin().expect("tuning"));
        let player = catalog.player(Vec2::ZERO);
        let mut out = Vec::new();
        hud(&player, &mut out);
        let texts: Vec<_> = out
            .iter()
            .filter_map(|drawable| match &drawable.visual {
                Visual::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let pistol = catalog.tuning().starting_firearm().1.max_ammo;
        let magazines = catalog.tuning().player.starting_magazines;
        assert_eq!(
            texts,
            vec![
                "SCORE 0".to_owned(),
                "CASH 0".to_owned(),
                format!("{pistol} / {magazines}")
            ]
        );
    }
}
