//! Movement компоненты: input intent, velocity, команда для locomotion

use bevy::prelude::*;

/// Input intent игрока за шаг (заполняется input-коллаборатором)
///
/// `attack_requested` это edge, симуляция сбрасывает его после обработки.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerIntent {
    /// -1.0..=1.0
    pub horizontal: f32,
    pub attack_requested: bool,
}

impl PlayerIntent {
    pub fn clamped_horizontal(&self) -> f32 {
        if self.horizontal.is_finite() {
            self.horizontal.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Скорость entity (units/sec)
///
/// Пишется knockback'ом, погоней босса и locomotion; интегрируется в Transform.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec2);

/// Команда для locomotion-коллаборатора
///
/// Отфильтрованный horizontal input: 0 во время knockback/атаки/смерти.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionCommand {
    pub horizontal: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_clamp() {
        let intent = PlayerIntent {
            horizontal: 3.0,
            attack_requested: false,
        };
        assert_eq!(intent.clamped_horizontal(), 1.0);

        let intent = PlayerIntent {
            horizontal: f32::NAN,
            attack_requested: false,
        };
        assert_eq!(intent.clamped_horizontal(), 0.0);
    }
}
