use last_stand_core::Vec2;
use last_stand_system_enemy_ai::{decide, Perception, STAGGER_SPEED_FACTOR};

fn close_quarters() -> Perception {
    Perception {
        centre: Vec2::new(100.0, 100.0),
        target: Some(Vec2::new(120.0, 100.0)),
        speed: 40.0,
        attack_range: 30.0,
        staggered: false,
        ammo: Some(5),
    }
}

#[test]
fn attacks_once_target_is_in_range() {
    let intent = decide(&close_quarters());
    assert!(intent.attack, "target 20px away must be attacked");
    assert!(!intent.reload);
    assert_eq!(intent.velocity, Vec2::new(40.0, 0.0));
}

#[test]
fn stagger_slows_and_suppresses_attacks() {
    let intent = decide(&Perception {
        staggered: true,
        ..close_quarters()
    });
    assert!(!intent.attack, "staggered enemies hold their fire");
    let expected = 40.0 * STAGGER_SPEED_FACTOR;
    assert!((intent.velocity.length() - expected).abs() < 1e-5);
}

#[test]
fn empty_firearm_triggers_reload_while_advancing() {
    let intent = decide(&Perception {
        ammo: Some(0),
        target: Some(Vec2::new(600.0, 100.0)),
        ..close_quarters()
    });
    assert!(intent.reload);
    assert!(!intent.attack);
    assert!(intent.velocity.x > 0.0);
}

#[test]
fn melee_wielders_never_reload() {
    let intent = decide(&Perception {
        ammo: None,
        ..close_quarters()
    });
    assert!(!intent.reload);
}
