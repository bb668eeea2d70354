//! DamageModel: общая модель урона для игрока и босса
//!
//! Одна реализация на обе роли:
//! - Health clamp: 0 ≤ health ≤ max_health после любой мутации
//! - Invincibility window после успешного удара
//! - Knockback (направление от источника урона, фиксированный impulse)
//! - Death: монотонный флаг, сбрасывается только через `reset()`

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тюнинг модели урона (per owner type: игрок и босс настраиваются отдельно)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTuning {
    pub max_health: f32,
    /// Invincibility после удара (секунды). 0 = окна нет
    pub invincibility_duration: f32,
    /// Сколько длится knockback (input игнорируется)
    pub knockback_duration: f32,
    /// Горизонтальный impulse (умножается на direction ±1)
    pub knockback_impulse_x: f32,
    /// Вертикальный impulse (всегда вверх)
    pub knockback_impulse_y: f32,
}

impl Default for DamageTuning {
    fn default() -> Self {
        Self::player()
    }
}

impl DamageTuning {
    pub fn player() -> Self {
        Self {
            max_health: 100.0,
            invincibility_duration: 1.5,
            knockback_duration: 0.3,
            knockback_impulse_x: 8.0,
            knockback_impulse_y: 6.0,
        }
    }

    /// Босс принимает каждый удар: без invincibility, без отброса
    pub fn boss() -> Self {
        Self {
            max_health: 1000.0,
            invincibility_duration: 0.0,
            knockback_duration: 0.0,
            knockback_impulse_x: 0.0,
            knockback_impulse_y: 0.0,
        }
    }
}

/// Активный knockback
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Knockback {
    /// Оставшееся время (секунды)
    pub remaining: f32,
    /// +1 = толкает вправо (рост x), -1 = влево
    pub direction: f32,
}

/// Результат `receive_damage`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    /// Урон принят (не dead, не invincible)
    pub applied: bool,
    /// Этим ударом combatant умер
    pub died: bool,
    /// Impulse для locomotion (velocity сбрасывается и ставится в это значение)
    pub knockback_impulse: Option<Vec2>,
}

impl DamageOutcome {
    pub const IGNORED: Self = Self {
        applied: false,
        died: false,
        knockback_impulse: None,
    };
}

/// Health + invincibility + knockback одного combatant
///
/// Инварианты:
/// - 0 ≤ health ≤ max_health
/// - is_dead не откатывается без `reset()`
/// - пока invincible или dead, `receive_damage`: no-op
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DamageModel {
    pub max_health: f32,
    pub health: f32,
    pub is_dead: bool,
    pub invincibility_remaining: f32,
    pub knockback: Option<Knockback>,
    pub tuning: DamageTuning,
}

impl Default for DamageModel {
    fn default() -> Self {
        Self::new(DamageTuning::default())
    }
}

/// NaN и отрицательные значения → 0. +inf проходит (clamp разберётся)
fn sanitize_amount(amount: f32) -> f32 {
    if amount.is_nan() {
        0.0
    } else {
        amount.max(0.0)
    }
}

/// Знак ±1 для facing. 0 и NaN считаем "вправо"
fn facing_sign(facing: f32) -> f32 {
    if facing < 0.0 {
        -1.0
    } else {
        1.0
    }
}

impl DamageModel {
    pub fn new(tuning: DamageTuning) -> Self {
        let max_health = if tuning.max_health.is_finite() && tuning.max_health > 0.0 {
            tuning.max_health
        } else {
            1.0
        };

        Self {
            max_health,
            health: max_health,
            is_dead: false,
            invincibility_remaining: 0.0,
            knockback: None,
            tuning,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_remaining > 0.0
    }

    pub fn in_knockback(&self) -> bool {
        self.knockback.is_some()
    }

    /// 0.0..=1.0 для health bar
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Принять урон.
    ///
    /// `source_position` → knockback от источника; `owner_position` и `facing`
    /// нужны только для расчёта направления.
    pub fn receive_damage(
        &mut self,
        amount: f32,
        source_position: Option<Vec2>,
        owner_position: Vec2,
        facing: f32,
    ) -> DamageOutcome {
        if self.is_dead || self.is_invincible() {
            return DamageOutcome::IGNORED;
        }

        let amount = sanitize_amount(amount);
        self.health = (self.health - amount).clamp(0.0, self.max_health);

        let mut outcome = DamageOutcome {
            applied: true,
            ..Default::default()
        };

        if let Some(source) = source_position {
            let direction = knockback_direction(owner_position.x, source.x, facing);
            self.knockback = Some(Knockback {
                remaining: self.tuning.knockback_duration.max(0.0),
                direction,
            });
            outcome.knockback_impulse = Some(Vec2::new(
                direction * self.tuning.knockback_impulse_x,
                self.tuning.knockback_impulse_y,
            ));
        }

        self.invincibility_remaining = self.tuning.invincibility_duration.max(0.0);

        if self.health <= 0.0 {
            self.mark_dead();
            outcome.died = true;
            outcome.knockback_impulse = None;
        }

        outcome
    }

    /// Лечение. Возвращает true только если health реально вырос
    /// (по нему caller решает, играть ли heal эффект/звук)
    pub fn heal(&mut self, amount: f32) -> bool {
        if self.is_dead {
            return false;
        }

        let before = self.health;
        self.health = (self.health + sanitize_amount(amount)).clamp(0.0, self.max_health);
        self.health > before
    }

    /// Принудительная смерть без изменения health (lifetime timeout босса).
    /// false если уже мёртв
    pub fn kill(&mut self) -> bool {
        if self.is_dead {
            return false;
        }
        self.mark_dead();
        true
    }

    fn mark_dead(&mut self) {
        self.is_dead = true;
        self.knockback = None;
    }

    /// Один шаг симуляции. Вызывается ровно раз за шаг, в том числе у мёртвых
    pub fn tick(&mut self, delta: f32) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };

        if self.invincibility_remaining > 0.0 {
            self.invincibility_remaining -= delta;
            if self.invincibility_remaining <= 0.0 {
                self.invincibility_remaining = 0.0;
            }
        }

        if let Some(knockback) = self.knockback.as_mut() {
            knockback.remaining -= delta;
            if knockback.remaining <= 0.0 {
                self.knockback = None;
            }
        }
    }

    pub fn grant_invincibility(&mut self, duration: f32) {
        self.invincibility_remaining = self.invincibility_remaining.max(duration.max(0.0));
    }

    /// Полное восстановление: full health, не dead, таймеры сброшены
    pub fn reset(&mut self) {
        self.health = self.max_health;
        self.is_dead = false;
        self.invincibility_remaining = 0.0;
        self.knockback = None;
    }
}

/// Направление knockback: от источника. При равных x: текущий facing (никогда 0)
pub fn knockback_direction(owner_x: f32, source_x: f32, facing: f32) -> f32 {
    if owner_x > source_x {
        1.0
    } else if owner_x < source_x {
        -1.0
    } else {
        facing_sign(facing)
    }
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к DamageModel.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    pub health_after: f32,
    pub target_died: bool,
}

/// Причина смерти
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DeathCause {
    /// Health дошёл до 0
    Damage,
    /// Lifetime timeout (только босс)
    Lifetime,
}

/// Событие: entity умер
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub cause: DeathCause,
}

/// Событие: health изменился (HUD health bar)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: f32,
    pub max: f32,
}

/// Компонент-маркер: entity мертв
///
/// Деспавн не автоматический: тело остаётся, пока owner не решит иначе.
#[derive(Component, Debug, Default)]
pub struct Dead;
