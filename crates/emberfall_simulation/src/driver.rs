//! Scripted input для headless прогонов
//!
//! Заменяет живой input: идёт к TrackedTarget и машет мечом с заданной
//! вероятностью. Случайность только из DeterministicRng (seed → одинаковый бой).

use bevy::prelude::*;
use rand::Rng;

use crate::combat::hitbox::planar;
use crate::combat::DamageModel;
use crate::components::{PlayerIntent, TrackedTarget};
use crate::DeterministicRng;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ScriptedInput {
    /// Вероятность за шаг нажать атаку, когда цель рядом
    pub attack_chance: f64,
    /// Вероятность за шаг "замешкаться" (стоять)
    pub hesitate_chance: f64,
    /// Ближе этой дистанции не подходим
    pub preferred_distance: f32,
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self {
            attack_chance: 0.2,
            hesitate_chance: 0.1,
            preferred_distance: 1.2,
        }
    }
}

/// gen_bool паникует вне 0..=1
fn probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Система: ScriptedInput → PlayerIntent
pub fn drive_scripted_input(
    mut rng: ResMut<DeterministicRng>,
    mut actors: Query<(&ScriptedInput, &Transform, &TrackedTarget, &mut PlayerIntent), With<DamageModel>>,
    targets: Query<&Transform>,
) {
    for (script, transform, tracked, mut intent) in actors.iter_mut() {
        let Some(target) = tracked.0.and_then(|t| targets.get(t).ok()) else {
            intent.horizontal = 0.0;
            continue;
        };

        let offset = planar(target).x - planar(transform).x;
        let hesitate = rng.rng.gen_bool(probability(script.hesitate_chance));

        intent.horizontal = if hesitate || offset.abs() <= script.preferred_distance {
            0.0
        } else {
            offset.signum()
        };

        if offset.abs() <= script.preferred_distance * 2.0 && rng.rng.gen_bool(probability(script.attack_chance)) {
            intent.attack_requested = true;
        }
    }
}
