//! Tests for the boss FSM.

use bevy::prelude::*;

use super::fsm::{BossAction, BossCombatant, BossEffect, BossState, BossTuning};
use crate::combat::{DamageModel, DamageOutcome, DamageTuning, DeathCause};
use crate::events::PresentationCue;

fn setup() -> (BossCombatant, DamageModel) {
    (
        BossCombatant::new(BossTuning::default()),
        DamageModel::new(DamageTuning::boss()),
    )
}

fn strike_count(effects: &[BossEffect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, BossEffect::Strike { .. }))
        .count()
}

fn has_cue(effects: &[BossEffect], cue: &PresentationCue) -> bool {
    effects
        .iter()
        .any(|effect| matches!(effect, BossEffect::Signal(c) if c == cue))
}

fn horizontal_velocity(effects: &[BossEffect]) -> Option<f32> {
    effects.iter().rev().find_map(|effect| match effect {
        BossEffect::SetHorizontalVelocity(v) => Some(*v),
        _ => None,
    })
}

#[test]
fn test_attack_takes_priority_at_min_distance() {
    let (mut boss, mut model) = setup();

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(1.5, 0.0)), 0.016);

    assert_eq!(boss.state, BossState::Attacking);
    assert!(boss.attack_locked);
    let effects = boss.drain_effects();
    assert!(effects.contains(&BossEffect::Strike {
        target_in_range: true,
        damage: 20.0
    }));
    assert_eq!(horizontal_velocity(&effects), Some(0.0));
}

#[test]
fn test_single_strike_per_lock_cycle() {
    let (mut boss, mut model) = setup();
    let target = Some(Vec2::new(1.5, 0.0));
    let mut strikes = 0;

    boss.tick(&mut model, Vec2::ZERO, target, 0.1);
    strikes += strike_count(&boss.drain_effects());

    for _ in 0..5 {
        boss.tick(&mut model, Vec2::ZERO, target, 0.1);
        strikes += strike_count(&boss.drain_effects());
        assert_eq!(boss.state, BossState::Attacking);
    }
    assert_eq!(strikes, 1);

    // Lock 0.6 истёк → Idle, cooldown ещё не прошёл
    boss.tick(&mut model, Vec2::ZERO, target, 0.2);
    strikes += strike_count(&boss.drain_effects());
    assert!(!boss.attack_locked);
    assert_eq!(boss.state, BossState::Idle);
    assert_eq!(strikes, 1);

    // Cooldown 2.0 прошёл → вторая атака
    boss.tick(&mut model, Vec2::ZERO, target, 1.5);
    strikes += strike_count(&boss.drain_effects());
    assert_eq!(boss.state, BossState::Attacking);
    assert_eq!(strikes, 2);
}

#[test]
fn test_pursuit_moves_toward_target() {
    let (mut boss, mut model) = setup();

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(5.0, 0.0)), 0.016);
    assert_eq!(boss.state, BossState::Pursuing);
    let effects = boss.drain_effects();
    assert_eq!(horizontal_velocity(&effects), Some(3.0));
    assert!(effects.contains(&BossEffect::FaceToward(5.0)));
    assert!(has_cue(&effects, &PresentationCue::AnimationFlag("isWalking", true)));

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(-5.0, 0.0)), 0.016);
    let effects = boss.drain_effects();
    assert_eq!(horizontal_velocity(&effects), Some(-3.0));
    assert!(effects.contains(&BossEffect::FaceToward(-5.0)));
    // isWalking не меняется → флаг не пишется повторно
    assert!(!has_cue(&effects, &PresentationCue::AnimationFlag("isWalking", true)));

    // Диагональ: горизонтальная составляющая направления
    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(4.0, 3.0)), 0.016);
    let velocity = horizontal_velocity(&boss.drain_effects()).expect("velocity set");
    assert!((velocity - 2.4).abs() < 1e-5);
}

#[test]
fn test_idle_outside_detection_and_without_target() {
    let (mut boss, mut model) = setup();

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(5.0, 0.0)), 0.016);
    assert_eq!(boss.state, BossState::Pursuing);

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(10.5, 0.0)), 0.016);
    assert_eq!(boss.state, BossState::Idle);
    assert_eq!(horizontal_velocity(&boss.drain_effects()), Some(0.0));

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(5.0, 0.0)), 0.016);
    boss.drain_effects();
    boss.tick(&mut model, Vec2::ZERO, None, 0.016);
    assert_eq!(boss.state, BossState::Idle);
    let effects = boss.drain_effects();
    assert_eq!(horizontal_velocity(&effects), Some(0.0));
    assert!(has_cue(&effects, &PresentationCue::AnimationFlag("isWalking", false)));
}

#[test]
fn test_lifetime_timeout_kills_at_full_health() {
    let (mut boss, mut model) = setup();
    boss.alive_duration = 179.9;

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(5.0, 0.0)), 0.2);

    assert!(boss.alive_duration >= 180.0);
    assert_eq!(boss.state, BossState::Dead);
    assert!(model.is_dead);
    assert_eq!(model.health, 1000.0);
    let effects = boss.drain_effects();
    assert!(effects.contains(&BossEffect::Died(DeathCause::Lifetime)));
    assert_eq!(strike_count(&effects), 0);
}

#[test]
fn test_lifetime_reached_exactly() {
    let (mut boss, mut model) = setup();
    boss.alive_duration = 180.0;

    boss.tick(&mut model, Vec2::ZERO, None, 0.0);
    assert_eq!(boss.state, BossState::Dead);
}

#[test]
fn test_death_chain_with_victory_dialog() {
    let (mut boss, mut model) = setup();

    let outcome = boss.receive_damage(&mut model, 2000.0);
    assert!(outcome.died);
    let effects = boss.drain_effects();
    assert!(effects.contains(&BossEffect::Died(DeathCause::Damage)));
    assert!(has_cue(&effects, &PresentationCue::DeactivateChildren));
    assert!(has_cue(&effects, &PresentationCue::StartSink { duration: 1.0, speed: 2.0 }));

    boss.tick(&mut model, Vec2::ZERO, None, 1.0);
    assert!(has_cue(&boss.drain_effects(), &PresentationCue::StartFade { duration: 0.5 }));

    boss.tick(&mut model, Vec2::ZERO, None, 0.5);
    assert!(boss.drain_effects().is_empty());
    assert!(boss.has_pending(BossAction::RevealVictory));

    // Диалог ещё не показан → закрытие игнорируется
    assert!(!boss.on_victory_dialog_closed());

    boss.tick(&mut model, Vec2::ZERO, None, 4.5);
    assert!(boss.drain_effects().is_empty());
    boss.tick(&mut model, Vec2::ZERO, None, 0.5);
    assert!(has_cue(&boss.drain_effects(), &PresentationCue::ShowVictory));

    // Без закрытия диалога меню не грузится
    boss.tick(&mut model, Vec2::ZERO, None, 10.0);
    assert!(boss.drain_effects().is_empty());

    assert!(boss.on_victory_dialog_closed());
    assert!(!boss.on_victory_dialog_closed(), "menu scheduled once");

    boss.tick(&mut model, Vec2::ZERO, None, 2.0);
    assert_eq!(boss.drain_effects(), vec![BossEffect::RequestMenu]);

    boss.tick(&mut model, Vec2::ZERO, None, 10.0);
    assert!(boss.drain_effects().is_empty());
}

#[test]
fn test_death_chain_without_dialog_falls_back_to_menu() {
    let tuning = BossTuning {
        has_victory_dialog: false,
        ..Default::default()
    };
    let mut boss = BossCombatant::new(tuning);
    let mut model = DamageModel::new(DamageTuning::boss());

    boss.die(&mut model, DeathCause::Damage);
    boss.drain_effects();

    boss.tick(&mut model, Vec2::ZERO, None, 1.0);
    boss.tick(&mut model, Vec2::ZERO, None, 0.5);
    boss.tick(&mut model, Vec2::ZERO, None, 5.0);
    let effects = boss.drain_effects();
    assert!(!has_cue(&effects, &PresentationCue::ShowVictory));
    assert!(!effects.contains(&BossEffect::RequestMenu));

    boss.tick(&mut model, Vec2::ZERO, None, 2.0);
    assert!(boss.drain_effects().contains(&BossEffect::RequestMenu));
}

#[test]
fn test_death_is_idempotent() {
    let (mut boss, mut model) = setup();
    boss.receive_damage(&mut model, 1000.0);
    boss.drain_effects();

    assert_eq!(boss.receive_damage(&mut model, 5.0), DamageOutcome::IGNORED);
    assert!(!boss.die(&mut model, DeathCause::Damage));
    assert!(!boss.die(&mut model, DeathCause::Lifetime));
    assert_eq!(model.health, 0.0);
    assert!(boss.drain_effects().is_empty(), "death side effects fire once");
}

#[test]
fn test_damage_does_not_stagger_by_default() {
    let (mut boss, mut model) = setup();
    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(5.0, 0.0)), 0.016);

    let outcome = boss.receive_damage(&mut model, 30.0);
    assert!(outcome.applied);
    assert_eq!(model.health, 970.0);
    assert_eq!(boss.state, BossState::Pursuing);
    assert!(has_cue(&boss.drain_effects(), &PresentationCue::AnimationTrigger("hit")));
}

#[test]
fn test_hit_state_frozen_until_reaction_finished() {
    let tuning = BossTuning {
        stagger_on_hit: true,
        ..Default::default()
    };
    let mut boss = BossCombatant::new(tuning);
    let mut model = DamageModel::new(DamageTuning::boss());

    boss.receive_damage(&mut model, 30.0);
    assert_eq!(boss.state, BossState::Hit);

    for _ in 0..10 {
        boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(1.0, 0.0)), 0.1);
    }
    assert_eq!(boss.state, BossState::Hit);
    assert_eq!(strike_count(&boss.drain_effects()), 0);

    boss.end_hit_reaction();
    assert_eq!(boss.state, BossState::Idle);

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(1.0, 0.0)), 0.1);
    assert_eq!(boss.state, BossState::Attacking);
}

#[test]
fn test_attack_unlock_keeps_hit_state() {
    let tuning = BossTuning {
        stagger_on_hit: true,
        ..Default::default()
    };
    let mut boss = BossCombatant::new(tuning);
    let mut model = DamageModel::new(DamageTuning::boss());
    let target = Some(Vec2::new(1.0, 0.0));

    boss.tick(&mut model, Vec2::ZERO, target, 0.016);
    assert!(boss.attack_locked);

    boss.receive_damage(&mut model, 30.0);
    assert_eq!(boss.state, BossState::Hit);

    // Lock истекает, но без HitReactionFinished босс остаётся в Hit
    boss.tick(&mut model, Vec2::ZERO, target, 0.6);
    boss.tick(&mut model, Vec2::ZERO, target, 0.1);
    assert!(!boss.attack_locked);
    assert_eq!(boss.state, BossState::Hit);

    boss.end_hit_reaction();
    assert_eq!(boss.state, BossState::Idle);
}

#[test]
fn test_external_kill_is_noticed_on_tick() {
    let (mut boss, mut model) = setup();
    model.receive_damage(5000.0, None, Vec2::ZERO, 1.0);

    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(1.0, 0.0)), 0.1);
    assert_eq!(boss.state, BossState::Dead);
    assert!(boss.drain_effects().contains(&BossEffect::Died(DeathCause::Damage)));
}

#[test]
fn test_reset_cancels_everything() {
    let (mut boss, mut model) = setup();
    boss.alive_duration = 100.0;
    boss.tick(&mut model, Vec2::ZERO, Some(Vec2::new(1.0, 0.0)), 0.1);
    assert!(boss.attack_locked);

    boss.receive_damage(&mut model, 1000.0);
    assert!(boss.has_pending(BossAction::SinkFinished));
    boss.drain_effects();

    boss.reset(&mut model);

    assert_eq!(boss.state, BossState::Idle);
    assert_eq!(boss.alive_duration, 0.0);
    assert!(!boss.attack_locked);
    assert!(boss.attack_cooldown.is_ready());
    assert!(model.is_alive());
    assert_eq!(model.health, 1000.0);
    assert!(!boss.has_pending(BossAction::SinkFinished));
    let effects = boss.drain_effects();
    assert!(effects.contains(&BossEffect::Revived));
    assert!(has_cue(&effects, &PresentationCue::Revive));

    // Старая цепочка смерти не доигрывает после reset
    boss.tick(&mut model, Vec2::ZERO, None, 10.0);
    assert!(!has_cue(&boss.drain_effects(), &PresentationCue::StartFade { duration: 0.5 }));
}

#[test]
fn test_range_warnings() {
    assert!(BossTuning::default().range_warnings().is_empty());

    let unreachable = BossTuning {
        attack_range: 1.0,
        min_approach_distance: 1.5,
        ..Default::default()
    };
    assert_eq!(unreachable.range_warnings().len(), 1);
}
