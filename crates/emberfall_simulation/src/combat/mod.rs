//! Combat system module
//!
//! ECS ответственность:
//! - DamageModel: health, invincibility, knockback (общий для игрока и босса)
//! - Damage pipeline: DamageRequest → роль → DamageModel → события
//! - Окружение: ловушки, pickups (лечение, меч), контактный урон
//! - Countdown таймеры вместо корутин
//!
//! Роли (PlayerCombatant, BossCombatant) живут в `player` и `boss`.

use bevy::prelude::*;

pub mod damage;
pub mod hazards;
pub mod hitbox;
pub mod systems;
pub mod timers;

// Re-export основных типов
pub use damage::{
    knockback_direction, DamageDealt, DamageModel, DamageOutcome, DamageTuning, Dead, DeathCause, EntityDied,
    HealthChanged, Knockback,
};
pub use hazards::{HealingPickup, Trap, TrapMode, WeaponPickup};
pub use timers::{Cooldown, ScheduledActions};

use crate::CombatStep;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. Timers: tick_damage_models, tick_traps
/// 2. Environment: resolve_contacts (после атак игрока и босса)
/// 3. Resolve: apply_damage_requests → apply_heal_requests
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<HealthChanged>();

        app.register_type::<DamageModel>()
            .register_type::<Trap>()
            .register_type::<HealingPickup>()
            .register_type::<WeaponPickup>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: таймеры (ровно раз за шаг, мёртвые тоже)
                (systems::tick_damage_models, hazards::tick_traps)
                    .chain()
                    .in_set(CombatStep::Timers),
                // Фаза 2: коллизии окружения → запросы урона/лечения
                hazards::resolve_contacts.in_set(CombatStep::Environment),
                // Фаза 3: применение
                (systems::apply_damage_requests, systems::apply_heal_requests)
                    .chain()
                    .in_set(CombatStep::Resolve),
            ),
        );
    }
}
