//! Headless locomotion
//!
//! Архитектура:
//! - Velocity пишут боевые системы (knockback, погоня босса) и input игрока
//! - Gravity + плоский пол на `ground_level` вместо физики движка
//! - Интеграция velocity → Transform (только X/Y)
//!
//! Детерминизм: fixed timestep, никаких внешних коллизий.

use bevy::prelude::*;

use crate::combat::DamageModel;
use crate::components::{LocomotionCommand, Velocity};
use crate::config::CombatConfig;
use crate::player::PlayerCombatant;

/// На земле ли entity (обновляется после интеграции)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Grounded(pub bool);

/// Система: LocomotionCommand игрока → горизонтальная скорость
///
/// Во время knockback velocity принадлежит импульсу, мёртвый стоит.
pub fn drive_player_locomotion(
    mut players: Query<(&PlayerCombatant, &DamageModel, &LocomotionCommand, &mut Velocity)>,
) {
    for (player, model, command, mut velocity) in players.iter_mut() {
        if model.in_knockback() {
            continue;
        }
        velocity.0.x = if model.is_dead {
            0.0
        } else {
            command.horizontal * player.tuning.move_speed
        };
    }
}

/// Система: gravity + интеграция velocity → Transform, пол на `ground_level`
pub fn integrate_velocity(
    time: Res<Time>,
    config: Res<CombatConfig>,
    mut bodies: Query<(&mut Transform, &mut Velocity, Option<&mut Grounded>)>,
) {
    let delta = time.delta_secs();
    let world = config.world;

    for (mut transform, mut velocity, grounded) in bodies.iter_mut() {
        let airborne = transform.translation.y > world.ground_level || velocity.0.y > 0.0;
        if airborne {
            velocity.0.y += world.gravity * delta;
        }

        transform.translation.x += velocity.0.x * delta;
        transform.translation.y += velocity.0.y * delta;

        let on_ground = transform.translation.y <= world.ground_level;
        if on_ground {
            transform.translation.y = world.ground_level;
            if velocity.0.y < 0.0 {
                velocity.0.y = 0.0;
            }
        }

        if let Some(mut grounded) = grounded {
            if grounded.0 != on_ground {
                grounded.0 = on_ground;
            }
        }
    }
}
