//! Tests for damage systems.

use bevy::prelude::*;

use super::damage::{apply_damage_requests, apply_heal_requests};
use crate::boss::BossCombatant;
use crate::combat::{DamageDealt, DamageModel, DamageTuning, Dead, DeathCause, EntityDied, HealthChanged};
use crate::components::Velocity;
use crate::events::{AudioCue, DamageRequest, HealRequest, PresentationCue, PresentationSignal};
use crate::player::PlayerCombatant;

fn test_app() -> App {
    let mut app = App::new();
    app.add_event::<DamageRequest>()
        .add_event::<HealRequest>()
        .add_event::<DamageDealt>()
        .add_event::<EntityDied>()
        .add_event::<HealthChanged>()
        .add_event::<PresentationSignal>()
        .add_systems(Update, (apply_damage_requests, apply_heal_requests).chain());
    app
}

fn spawn_player(app: &mut App, x: f32) -> Entity {
    app.world_mut()
        .spawn((
            PlayerCombatant::default(),
            DamageModel::new(DamageTuning::player()),
            Transform::from_xyz(x, 0.0, 0.0),
        ))
        .id()
}

fn collect<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world()
        .resource::<Events<E>>()
        .iter_current_update_events()
        .cloned()
        .collect()
}

fn hit(target: Entity, amount: f32, source_x: Option<f32>) -> DamageRequest {
    DamageRequest {
        target,
        attacker: None,
        amount,
        source_position: source_x.map(|x| Vec2::new(x, 0.0)),
    }
}

#[test]
fn test_knockback_sets_velocity_and_reports_damage() {
    let mut app = test_app();
    let player = spawn_player(&mut app, 5.0);

    app.world_mut().send_event(hit(player, 30.0, Some(2.0)));
    app.update();

    let model = app.world().get::<DamageModel>(player).expect("model");
    assert_eq!(model.health, 70.0);
    assert!(model.is_invincible());

    let velocity = app.world().get::<Velocity>(player).expect("velocity");
    assert_eq!(velocity.0, Vec2::new(8.0, 6.0));

    let dealt = collect::<DamageDealt>(&app);
    assert_eq!(dealt.len(), 1);
    assert_eq!(dealt[0].amount, 30.0);
    assert_eq!(dealt[0].health_after, 70.0);

    let health = collect::<HealthChanged>(&app);
    assert_eq!(health.last().map(|e| e.current), Some(70.0));
}

#[test]
fn test_requests_in_one_step_respect_invincibility() {
    let mut app = test_app();
    let player = spawn_player(&mut app, 0.0);

    app.world_mut().send_event(hit(player, 10.0, None));
    app.world_mut().send_event(hit(player, 10.0, None));
    app.world_mut().send_event(hit(player, 10.0, None));
    app.update();

    assert_eq!(app.world().get::<DamageModel>(player).map(|m| m.health), Some(90.0));
    assert_eq!(collect::<DamageDealt>(&app).len(), 1);
}

#[test]
fn test_lethal_damage_marks_dead_and_locks_player() {
    let mut app = test_app();
    let player = spawn_player(&mut app, 0.0);
    let attacker = app.world_mut().spawn_empty().id();

    app.world_mut().send_event(DamageRequest {
        target: player,
        attacker: Some(attacker),
        amount: 150.0,
        source_position: Some(Vec2::new(-1.0, 0.0)),
    });
    app.update();

    assert!(app.world().get::<Dead>(player).is_some());
    assert_eq!(app.world().get::<Velocity>(player).map(|v| v.0), Some(Vec2::ZERO));
    assert!(app.world().get::<PlayerCombatant>(player).is_some_and(|p| p.input_locked));

    let died = collect::<EntityDied>(&app);
    assert_eq!(died.len(), 1);
    assert_eq!(died[0].killer, Some(attacker));
    assert_eq!(died[0].cause, DeathCause::Damage);
}

#[test]
fn test_boss_takes_every_hit() {
    let mut app = test_app();
    let boss = app
        .world_mut()
        .spawn((BossCombatant::default(), DamageModel::new(DamageTuning::boss())))
        .id();

    for _ in 0..3 {
        app.world_mut().send_event(hit(boss, 30.0, Some(0.0)));
    }
    app.update();

    let model = app.world().get::<DamageModel>(boss).expect("model");
    assert_eq!(model.health, 910.0);
    assert_eq!(collect::<DamageDealt>(&app).len(), 3);
    // У босса нет knockback
    assert_eq!(app.world().get::<Velocity>(boss).map(|v| v.0), Some(Vec2::ZERO));
}

#[test]
fn test_heal_emits_cue_only_on_gain() {
    let mut app = test_app();
    let player = spawn_player(&mut app, 0.0);

    app.world_mut().send_event(HealRequest {
        target: player,
        amount: 25.0,
    });
    app.update();
    assert!(collect::<PresentationSignal>(&app).is_empty());

    app.world_mut().get_mut::<DamageModel>(player).expect("model").health = 50.0;
    app.world_mut().send_event(HealRequest {
        target: player,
        amount: 25.0,
    });
    app.update();

    assert_eq!(app.world().get::<DamageModel>(player).map(|m| m.health), Some(75.0));
    let signals = collect::<PresentationSignal>(&app);
    assert_eq!(
        signals,
        vec![PresentationSignal::new(player, PresentationCue::Audio(AudioCue::Heal))]
    );
}

#[test]
fn test_unknown_target_is_ignored() {
    let mut app = test_app();
    let stray = app.world_mut().spawn_empty().id();

    app.world_mut().send_event(hit(stray, 10.0, None));
    app.update();

    assert!(collect::<DamageDealt>(&app).is_empty());
}
