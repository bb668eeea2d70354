//! Boss module
//!
//! BossCombatant FSM (Idle/Pursuing/Attacking/Hit/Dead), lifetime timeout,
//! цепочка смерти sink → fade → victory → menu на countdown таймерах.

use bevy::prelude::*;

pub mod fsm;
pub mod systems;

#[cfg(test)]
mod fsm_tests;

pub use fsm::{BossAction, BossCombatant, BossEffect, BossState, BossTuning};

use crate::combat::DamageModel;
use crate::components::{Facing, Hostile, Hurtbox, TrackedTarget};
use crate::config::CombatConfig;
use crate::physics::Grounded;
use crate::CombatStep;

/// Boss Plugin
///
/// 1. BossActions: tick_bosses → apply_boss_effects (удар попадает в очередь урона этого шага)
/// 2. Requests: handle_boss_requests
/// 3. React: apply_boss_effects (последствия урона и запросов)
pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BossCombatant>()
            .add_systems(
                FixedUpdate,
                (systems::tick_bosses, systems::apply_boss_effects)
                    .chain()
                    .in_set(CombatStep::BossActions),
            )
            .add_systems(FixedUpdate, systems::handle_boss_requests.in_set(CombatStep::Requests))
            .add_systems(FixedUpdate, systems::apply_boss_effects.in_set(CombatStep::React));
    }
}

/// Спавн босса, отслеживающего `target`
pub fn spawn_boss(commands: &mut Commands, config: &CombatConfig, position: Vec2, target: Option<Entity>) -> Entity {
    commands
        .spawn((
            BossCombatant::new(config.boss),
            DamageModel::new(config.boss_damage),
            Transform::from_xyz(position.x, position.y, 0.0),
            Facing(-1.0),
            Hurtbox::new(0.8),
            TrackedTarget(target),
            Hostile,
            Grounded(true),
        ))
        .id()
}
