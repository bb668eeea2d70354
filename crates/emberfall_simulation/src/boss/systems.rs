//! Boss systems: FSM tick, применение эффектов, внешние запросы

use bevy::prelude::*;

use super::{BossCombatant, BossEffect};
use crate::combat::hitbox::planar;
use crate::combat::{DamageModel, Dead, DeathCause, EntityDied, HealthChanged};
use crate::components::{Facing, Hurtbox, TrackedTarget, Velocity};
use crate::config::CombatConfig;
use crate::events::{
    BossResetRequested, DamageRequest, HitReactionFinished, PresentationSignal, SceneChangeRequested,
    VictoryDialogClosed,
};
use crate::logger;

/// Система: один шаг FSM каждого босса
///
/// Позиция цели читается через TrackedTarget (read-only). Нет цели или
/// entity цели пропал → `None`, босс стоит.
pub fn tick_bosses(
    time: Res<Time>,
    mut bosses: Query<(&mut BossCombatant, &mut DamageModel, &Transform, &TrackedTarget)>,
    targets: Query<&Transform>,
) {
    let delta = time.delta_secs();

    for (mut boss, mut model, transform, tracked) in bosses.iter_mut() {
        let target_position = tracked
            .0
            .and_then(|target| targets.get(target).ok())
            .map(planar);

        boss.tick(&mut model, planar(transform), target_position, delta);
    }
}

/// Система: outbox BossEffect → мир
///
/// Стоит дважды за шаг: сразу после FSM (удар доходит до DamageRequest в том же
/// шаге) и после применения урона (цепочка смерти, hit реакция).
pub fn apply_boss_effects(
    mut commands: Commands,
    config: Res<CombatConfig>,
    mut bosses: Query<(
        Entity,
        &mut BossCombatant,
        &DamageModel,
        &Transform,
        &TrackedTarget,
        &mut Velocity,
        &mut Facing,
        &mut Hurtbox,
    )>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut died_events: EventWriter<EntityDied>,
    mut health_events: EventWriter<HealthChanged>,
    mut signals: EventWriter<PresentationSignal>,
    mut scene_requests: EventWriter<SceneChangeRequested>,
) {
    for (entity, mut boss, model, transform, tracked, mut velocity, mut facing, mut hurtbox) in bosses.iter_mut() {
        for effect in boss.drain_effects() {
            match effect {
                BossEffect::SetHorizontalVelocity(velocity_x) => {
                    velocity.0.x = velocity_x;
                }
                BossEffect::FaceToward(target_x) => {
                    facing.face_toward(planar(transform).x, target_x);
                }
                BossEffect::Strike { target_in_range, damage } => {
                    let Some(target) = tracked.0 else {
                        continue;
                    };
                    if !target_in_range || damage <= 0.0 {
                        continue;
                    }
                    logger::log(&format!("Boss {:?} strikes {:?} for {}", entity, target, damage));
                    damage_requests.write(DamageRequest {
                        target,
                        attacker: Some(entity),
                        amount: damage,
                        source_position: Some(planar(transform)),
                    });
                }
                BossEffect::Signal(cue) => {
                    signals.write(PresentationSignal::new(entity, cue));
                }
                BossEffect::Died(cause) => {
                    velocity.0 = Vec2::ZERO;
                    hurtbox.enabled = false;
                    commands.entity(entity).insert(Dead);

                    // Смерть от урона уже объявлена в apply_damage_requests
                    if cause == DeathCause::Lifetime {
                        died_events.write(EntityDied {
                            entity,
                            killer: None,
                            cause,
                        });
                    }
                    logger::log_info(&format!("Boss {:?} died ({:?})", entity, cause));
                }
                BossEffect::Revived => {
                    velocity.0 = Vec2::ZERO;
                    hurtbox.enabled = true;
                    commands.entity(entity).remove::<Dead>();
                    health_events.write(HealthChanged {
                        entity,
                        current: model.health,
                        max: model.max_health,
                    });
                    logger::log_info(&format!("Boss {:?} reset", entity));
                }
                BossEffect::RequestMenu => {
                    logger::log_info(&format!("Boss fight over, loading {}", config.menu_scene));
                    scene_requests.write(SceneChangeRequested {
                        scene: config.menu_scene.clone(),
                    });
                }
            }
        }
    }
}

/// Система: внешние запросы к боссу (animation callback, диалог, reset)
pub fn handle_boss_requests(
    mut hit_finished: EventReader<HitReactionFinished>,
    mut dialog_closed: EventReader<VictoryDialogClosed>,
    mut reset_requests: EventReader<BossResetRequested>,
    mut bosses: Query<(&mut BossCombatant, &mut DamageModel)>,
) {
    for event in hit_finished.read() {
        if let Ok((mut boss, _)) = bosses.get_mut(event.entity) {
            boss.end_hit_reaction();
        }
    }

    for event in dialog_closed.read() {
        match bosses.get_mut(event.boss) {
            Ok((mut boss, _)) => {
                if boss.on_victory_dialog_closed() {
                    logger::log(&format!("Victory dialog closed for {:?}", event.boss));
                }
            }
            Err(_) => logger::log_warning(&format!("Victory dialog closed for unknown boss {:?}", event.boss)),
        }
    }

    for event in reset_requests.read() {
        if let Ok((mut boss, mut model)) = bosses.get_mut(event.entity) {
            boss.reset(&mut model);
        }
    }
}
