//! Базовые компоненты combatant: маркер, facing, hurtbox, spawn point, target

use bevy::prelude::*;
use crate::combat::DamageModel;
use crate::components::Velocity;

/// Combatant: любой entity с health/invincibility/knockback семантикой
///
/// Автоматически добавляет DamageModel, Facing, Velocity, Hurtbox через Required Components.
/// Конкретная роль задаётся `PlayerCombatant` или `BossCombatant`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(DamageModel, Facing, Velocity, Hurtbox, Transform)]
pub struct Combatant;

/// Направление взгляда по X: +1 вправо, -1 влево (никогда 0)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Facing {
    pub fn sign(&self) -> f32 {
        if self.0 < 0.0 {
            -1.0
        } else {
            1.0
        }
    }

    /// Повернуться к точке. При равном x facing не меняется
    pub fn face_toward(&mut self, self_x: f32, target_x: f32) {
        if target_x > self_x {
            self.0 = 1.0;
        } else if target_x < self_x {
            self.0 = -1.0;
        }
    }

    /// Повернуться по горизонтальному input (0: без изменений)
    pub fn follow_input(&mut self, horizontal: f32) {
        if horizontal > 0.0 {
            self.0 = 1.0;
        } else if horizontal < 0.0 {
            self.0 = -1.0;
        }
    }
}

/// Поверхность попадания (круг вокруг позиции entity)
///
/// `enabled = false`: удары по entity не регистрируются (мёртвый босс).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub radius: f32,
    pub enabled: bool,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            radius: 0.5,
            enabled: true,
        }
    }
}

impl Hurtbox {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            enabled: true,
        }
    }
}

/// Враждебный entity: контакт с ним ранит игрока
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Hostile;

/// Урон при касании. Без компонента: дефолтный урон игрока по врагам
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ContactDamage {
    pub amount: f32,
    /// Враг исчезает после удара (снаряды, одноразовые враги)
    pub despawn_on_touch: bool,
}

impl ContactDamage {
    pub fn new(amount: f32) -> Self {
        Self {
            amount,
            despawn_on_touch: false,
        }
    }
}

/// Точка respawn (позицию восстанавливает симуляция, не DamageModel)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint(pub Vec2);

/// Typed handle на отслеживаемую цель (вместо поиска по тегу "Player")
///
/// Только чтение позиции. Health цели не трогается.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct TrackedTarget(pub Option<Entity>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_never_zero() {
        let mut facing = Facing(0.0);
        assert_eq!(facing.sign(), 1.0);

        facing.face_toward(5.0, 5.0);
        assert_eq!(facing.sign(), 1.0);

        facing.face_toward(5.0, 2.0);
        assert_eq!(facing.0, -1.0);

        facing.follow_input(0.0);
        assert_eq!(facing.0, -1.0);

        facing.follow_input(0.3);
        assert_eq!(facing.0, 1.0);
    }

    #[test]
    fn test_hurtbox_default_enabled() {
        let hurtbox = Hurtbox::default();
        assert!(hurtbox.enabled);
        assert_eq!(Hurtbox::new(1.2).radius, 1.2);
    }
}
