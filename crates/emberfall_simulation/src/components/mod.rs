//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: combatant маркер, facing, hurtbox, spawn point, tracked target
//! - movement: input intent, velocity, locomotion command
//!
//! Роли (PlayerCombatant, BossCombatant) живут в своих модулях.

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
