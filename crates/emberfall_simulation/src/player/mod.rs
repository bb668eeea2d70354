//! Player module
//!
//! PlayerCombatant: атака мечом, фильтр input, поражение, respawn.
//! Урон и лечение идут через общий DamageModel.

use bevy::prelude::*;

pub mod combatant;
pub mod systems;


pub use combatant::{AttackRejection, Player, PlayerAction, PlayerCombatant, PlayerState, PlayerTuning};

use crate::combat::DamageModel;
use crate::components::{Facing, Hurtbox, SpawnPoint};
use crate::config::CombatConfig;
use crate::physics::Grounded;
use crate::CombatStep;

/// Player Plugin
///
/// Порядок внутри шага (через CombatStep):
/// 1. Input: process_player_intents
/// 2. PlayerActions: tick_player_combatants (hit check → DamageRequest)
/// 3. React: player_damage_feedback (hurt/defeat сигналы)
/// 4. Requests: respawn, выход в меню
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerCombatant>()
            .register_type::<Player>()
            .add_systems(FixedUpdate, systems::process_player_intents.in_set(CombatStep::Input))
            .add_systems(FixedUpdate, systems::tick_player_combatants.in_set(CombatStep::PlayerActions))
            .add_systems(FixedUpdate, systems::player_damage_feedback.in_set(CombatStep::React))
            .add_systems(
                FixedUpdate,
                (systems::handle_respawn_requests, systems::handle_exit_to_menu)
                    .chain()
                    .in_set(CombatStep::Requests),
            );
    }
}

/// Спавн игрока с тюнингом из конфига. Позиция спавна = точка respawn
pub fn spawn_player(commands: &mut Commands, config: &CombatConfig, position: Vec2, has_weapon: bool) -> Entity {
    commands
        .spawn((
            PlayerCombatant::new(config.player, has_weapon),
            DamageModel::new(config.player_damage),
            Transform::from_xyz(position.x, position.y, 0.0),
            Facing(1.0),
            Hurtbox::new(0.5),
            SpawnPoint(position),
            Grounded(true),
        ))
        .id()
}
