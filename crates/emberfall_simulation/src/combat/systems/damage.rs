//! Damage pipeline systems.
//!
//! Все DamageRequest за шаг применяются строго по порядку, каждый целиком
//! (роль, DamageModel, velocity, события) до следующего.

use bevy::prelude::*;

use crate::boss::BossCombatant;
use crate::combat::hitbox::planar;
use crate::combat::{DamageDealt, DamageModel, Dead, DeathCause, EntityDied, HealthChanged};
use crate::components::{Facing, Velocity};
use crate::events::{AudioCue, DamageRequest, HealRequest, PresentationCue, PresentationSignal};
use crate::logger;
use crate::player::PlayerCombatant;

/// Система: invincibility и knockback таймеры всех DamageModel
///
/// Единственное место, где тикается DamageModel. Мёртвые тоже тикаются.
pub fn tick_damage_models(time: Res<Time>, mut models: Query<&mut DamageModel>) {
    let delta = time.delta_secs();
    for mut model in models.iter_mut() {
        model.tick(delta);
    }
}

/// Система: DamageRequest → DamageModel (через роль, если она есть)
///
/// - Player: смерть блокирует input и взводит сигнал поражения
/// - Boss: hurt/death эффекты в outbox (применит apply_boss_effects)
/// - Knockback impulse заменяет velocity, смерть её обнуляет
pub fn apply_damage_requests(
    mut commands: Commands,
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<(
        &mut DamageModel,
        &Transform,
        &Facing,
        &mut Velocity,
        Option<&mut PlayerCombatant>,
        Option<&mut BossCombatant>,
    )>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
    mut health_events: EventWriter<HealthChanged>,
) {
    for request in requests.read() {
        let Ok((mut model, transform, facing, mut velocity, player, boss)) = targets.get_mut(request.target) else {
            logger::log(&format!("Damage request for {:?} without DamageModel", request.target));
            continue;
        };

        let health_before = model.health;
        let outcome = if let Some(mut player) = player {
            player.receive_damage(
                &mut model,
                request.amount,
                request.source_position,
                planar(transform),
                facing.0,
            )
        } else if let Some(mut boss) = boss {
            boss.receive_damage(&mut model, request.amount)
        } else {
            model.receive_damage(request.amount, request.source_position, planar(transform), facing.0)
        };

        if !outcome.applied {
            continue;
        }

        if let Some(impulse) = outcome.knockback_impulse {
            velocity.0 = impulse;
        }

        damage_events.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            amount: health_before - model.health,
            health_after: model.health,
            target_died: outcome.died,
        });
        health_events.write(HealthChanged {
            entity: request.target,
            current: model.health,
            max: model.max_health,
        });

        if outcome.died {
            velocity.0 = Vec2::ZERO;
            commands.entity(request.target).insert(Dead);
            death_events.write(EntityDied {
                entity: request.target,
                killer: request.attacker,
                cause: DeathCause::Damage,
            });
            logger::log_info(&format!("{:?} killed by {:?}", request.target, request.attacker));
        } else {
            logger::log(&format!(
                "{:?} took {:.1} damage ({:.1}/{:.1})",
                request.target,
                health_before - model.health,
                model.health,
                model.max_health
            ));
        }
    }
}

/// Система: HealRequest → DamageModel::heal
///
/// Звук лечения только если health реально вырос.
pub fn apply_heal_requests(
    mut requests: EventReader<HealRequest>,
    mut models: Query<&mut DamageModel>,
    mut health_events: EventWriter<HealthChanged>,
    mut signals: EventWriter<PresentationSignal>,
) {
    for request in requests.read() {
        let Ok(mut model) = models.get_mut(request.target) else {
            continue;
        };

        if model.heal(request.amount) {
            health_events.write(HealthChanged {
                entity: request.target,
                current: model.health,
                max: model.max_health,
            });
            signals.write(PresentationSignal::new(
                request.target,
                PresentationCue::Audio(AudioCue::Heal),
            ));
        }
    }
}
