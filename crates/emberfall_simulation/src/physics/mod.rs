//! Physics module
//!
//! Headless заглушка locomotion: velocity, gravity, плоский пол.

use bevy::prelude::*;

pub mod movement;

// Re-export основных типов
pub use movement::{drive_player_locomotion, integrate_velocity, Grounded};

use crate::CombatStep;

/// Locomotion Plugin: последний этап шага (после всех решений и урона)
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Grounded>().add_systems(
            FixedUpdate,
            (drive_player_locomotion, integrate_velocity)
                .chain()
                .in_set(CombatStep::Motion),
        );
    }
}
