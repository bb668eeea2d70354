//! Player systems: input, атака, реакция на урон, respawn, выход в меню

use bevy::prelude::*;

use super::{PlayerAction, PlayerCombatant};
use crate::combat::hitbox::{overlapping_hurtboxes, planar, strike_point};
use crate::combat::{DamageDealt, DamageModel, Dead, HealthChanged};
use crate::components::{Facing, Hurtbox, LocomotionCommand, PlayerIntent, SpawnPoint, Velocity};
use crate::config::CombatConfig;
use crate::events::{
    AudioCue, DamageRequest, ExitToMenuRequested, PresentationCue, PresentationSignal,
    RespawnRequested, SceneChangeRequested,
};
use crate::logger;

/// Система: PlayerIntent → атака, facing, LocomotionCommand
///
/// `attack_requested` сбрасывается здесь (edge, не level).
/// Facing следует за input, кроме knockback.
pub fn process_player_intents(
    mut players: Query<(
        Entity,
        &mut PlayerCombatant,
        &DamageModel,
        &mut PlayerIntent,
        &mut LocomotionCommand,
        &mut Facing,
    )>,
    mut signals: EventWriter<PresentationSignal>,
) {
    for (entity, mut player, model, mut intent, mut command, mut facing) in players.iter_mut() {
        if std::mem::take(&mut intent.attack_requested) {
            match player.request_attack(model) {
                Ok(()) => {
                    signals.write(PresentationSignal::new(
                        entity,
                        PresentationCue::AnimationTrigger("Attack"),
                    ));
                    signals.write(PresentationSignal::new(
                        entity,
                        PresentationCue::Audio(AudioCue::PlayerSwing),
                    ));
                }
                Err(reason) => {
                    logger::log(&format!("Player {:?} attack rejected: {:?}", entity, reason));
                }
            }
        }

        let horizontal = player.filter_horizontal(model, &intent);
        command.horizontal = horizontal;

        if !model.in_knockback() {
            facing.follow_input(horizontal);
        }
    }
}

/// Система: таймеры атаки игрока + hit check
///
/// ResolveHit: круг `attack_radius` в `attack_reach` перед игроком,
/// каждый пересечённый hurtbox получает DamageRequest (без knockback источника).
pub fn tick_player_combatants(
    time: Res<Time>,
    mut players: Query<(Entity, &mut PlayerCombatant, &Transform, &Facing)>,
    hurtboxes: Query<(Entity, &Transform, &Hurtbox), With<DamageModel>>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    let delta = time.delta_secs();

    for (entity, mut player, transform, facing) in players.iter_mut() {
        for action in player.tick(delta) {
            match action {
                PlayerAction::ResolveHit => {
                    let center = strike_point(planar(transform), facing.sign(), player.tuning.attack_reach);
                    let candidates = hurtboxes
                        .iter()
                        .map(|(target, target_transform, hurtbox)| (target, planar(target_transform), hurtbox));

                    let hits = overlapping_hurtboxes(center, player.tuning.attack_radius, entity, candidates);
                    for target in hits {
                        logger::log(&format!("Player {:?} hit {:?}", entity, target));
                        damage_requests.write(DamageRequest {
                            target,
                            attacker: Some(entity),
                            amount: player.tuning.attack_damage,
                            source_position: None,
                        });
                    }
                }
                PlayerAction::FinishAttack => {}
            }
        }
    }
}

/// Система: feedback игрока после применения урона
///
/// Hurt звук на каждый принятый удар; поражение показывается ровно раз за смерть.
/// "IsHurt" держится, пока идёт knockback.
pub fn player_damage_feedback(
    mut damage_events: EventReader<DamageDealt>,
    mut players: Query<(Entity, &mut PlayerCombatant, &DamageModel)>,
    mut signals: EventWriter<PresentationSignal>,
) {
    for event in damage_events.read() {
        if players.contains(event.target) && !event.target_died {
            signals.write(PresentationSignal::new(
                event.target,
                PresentationCue::Audio(AudioCue::PlayerHurt),
            ));
        }
    }

    for (entity, mut player, model) in players.iter_mut() {
        if let Some(hurt) = player.sync_hurt_flag(model) {
            signals.write(PresentationSignal::new(
                entity,
                PresentationCue::AnimationFlag("IsHurt", hurt),
            ));
        }

        if player.take_defeat_signal() {
            logger::log_info(&format!("Player {:?} defeated", entity));
            signals.write(PresentationSignal::new(
                entity,
                PresentationCue::Audio(AudioCue::PlayerDeath),
            ));
            signals.write(PresentationSignal::new(entity, PresentationCue::ShowDefeat));
        }
    }
}

/// Система: respawn по кнопке с экрана поражения
///
/// Позиция → SpawnPoint (если есть), velocity обнуляется, invincibility выдаётся.
pub fn handle_respawn_requests(
    mut commands: Commands,
    mut requests: EventReader<RespawnRequested>,
    mut players: Query<(
        &mut PlayerCombatant,
        &mut DamageModel,
        &mut Transform,
        &mut Velocity,
        Option<&SpawnPoint>,
    )>,
    mut health_events: EventWriter<HealthChanged>,
    mut signals: EventWriter<PresentationSignal>,
) {
    for request in requests.read() {
        let Ok((mut player, mut model, mut transform, mut velocity, spawn_point)) =
            players.get_mut(request.entity)
        else {
            logger::log_warning(&format!("Respawn requested for non-player {:?}", request.entity));
            continue;
        };

        player.respawn(&mut model);

        if let Some(spawn_point) = spawn_point {
            transform.translation.x = spawn_point.0.x;
            transform.translation.y = spawn_point.0.y;
        }
        velocity.0 = Vec2::ZERO;

        commands.entity(request.entity).remove::<Dead>();

        health_events.write(HealthChanged {
            entity: request.entity,
            current: model.health,
            max: model.max_health,
        });
        signals.write(PresentationSignal::new(request.entity, PresentationCue::Revive));

        logger::log_info(&format!(
            "Player {:?} respawned at ({:.2}, {:.2})",
            request.entity, transform.translation.x, transform.translation.y
        ));
    }
}

/// Система: "выйти в меню" с экрана поражения
pub fn handle_exit_to_menu(
    mut requests: EventReader<ExitToMenuRequested>,
    config: Res<CombatConfig>,
    mut scene_requests: EventWriter<SceneChangeRequested>,
) {
    // Несколько нажатий за шаг → одна загрузка
    if requests.read().count() > 0 {
        logger::log_info(&format!("Exit to menu: {}", config.menu_scene));
        scene_requests.write(SceneChangeRequested {
            scene: config.menu_scene.clone(),
        });
    }
}
