//! PlayerCombatant: роль игрока поверх DamageModel
//!
//! Атака (cooldown + отложенный hit check), фильтр input во время
//! knockback/атаки/смерти, сигнал поражения, respawn.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::timers::{Cooldown, ScheduledActions};
use crate::combat::{DamageModel, DamageOutcome};
use crate::components::{Combatant, LocomotionCommand, PlayerIntent};

/// Marker component для player-controlled entity
///
/// Input systems используют `With<Player>`; босс ищет цель через `TrackedTarget`,
/// а не по этому маркеру.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Тюнинг атаки и передвижения игрока
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub attack_damage: f32,
    pub attack_radius: f32,
    /// Смещение центра удара вперёд по facing
    pub attack_reach: f32,
    /// Задержка hit check от начала атаки
    pub hit_delay: f32,
    /// Когда атака заканчивается (input снова разрешён)
    pub attack_duration: f32,
    pub attack_cooldown: f32,
    /// Урон от касания Hostile без ContactDamage
    pub enemy_contact_damage: f32,
    pub move_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            attack_damage: 30.0,
            attack_radius: 1.5,
            attack_reach: 0.5,
            hit_delay: 0.2,
            attack_duration: 0.4,
            attack_cooldown: 0.5,
            enemy_contact_damage: 10.0,
            move_speed: 7.0,
        }
    }
}

/// Наблюдаемое состояние игрока (выводится из флагов, не хранится)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PlayerState {
    Idle,
    Knockback,
    Attacking,
    Dead,
}

/// Отложенные шаги атаки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Overlap query в точке удара
    ResolveHit,
    /// Атака закончилась
    FinishAttack,
}

/// Почему атака отклонена (для логов и тестов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackRejection {
    Dead,
    InputLocked,
    NoWeapon,
    AlreadyAttacking,
    OnCooldown,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Combatant, Player, PlayerIntent, LocomotionCommand)]
pub struct PlayerCombatant {
    /// Без оружия атака недоступна
    pub has_weapon: bool,
    pub attack_cooldown: Cooldown,
    pub is_attacking: bool,
    /// После смерти весь input игнорируется до respawn
    pub input_locked: bool,
    pub tuning: PlayerTuning,
    defeat_pending: bool,
    /// Последнее отправленное значение "IsHurt"
    hurt_shown: bool,
    #[reflect(ignore)]
    pending: ScheduledActions<PlayerAction>,
}

impl Default for PlayerCombatant {
    fn default() -> Self {
        Self::new(PlayerTuning::default(), true)
    }
}

impl PlayerCombatant {
    pub fn new(tuning: PlayerTuning, has_weapon: bool) -> Self {
        Self {
            has_weapon,
            attack_cooldown: Cooldown::ready(tuning.attack_cooldown),
            is_attacking: false,
            input_locked: false,
            tuning,
            defeat_pending: false,
            hurt_shown: false,
            pending: ScheduledActions::default(),
        }
    }

    pub fn state(&self, model: &DamageModel) -> PlayerState {
        if model.is_dead {
            PlayerState::Dead
        } else if model.in_knockback() {
            PlayerState::Knockback
        } else if self.is_attacking {
            PlayerState::Attacking
        } else {
            PlayerState::Idle
        }
    }

    /// Начать атаку. Hit check через `hit_delay`, конец через `attack_duration`
    pub fn request_attack(&mut self, model: &DamageModel) -> Result<(), AttackRejection> {
        if model.is_dead {
            return Err(AttackRejection::Dead);
        }
        if self.input_locked {
            return Err(AttackRejection::InputLocked);
        }
        if !self.has_weapon {
            return Err(AttackRejection::NoWeapon);
        }
        if self.is_attacking {
            return Err(AttackRejection::AlreadyAttacking);
        }
        if !self.attack_cooldown.is_ready() {
            return Err(AttackRejection::OnCooldown);
        }

        self.is_attacking = true;
        self.attack_cooldown.trigger();
        self.pending.schedule(self.tuning.hit_delay, PlayerAction::ResolveHit);
        self.pending.schedule(self.tuning.attack_duration, PlayerAction::FinishAttack);
        Ok(())
    }

    /// Horizontal input после фильтра: 0 во время knockback, атаки, смерти
    pub fn filter_horizontal(&self, model: &DamageModel, intent: &PlayerIntent) -> f32 {
        if model.is_dead || self.input_locked || model.in_knockback() || self.is_attacking {
            0.0
        } else {
            intent.clamped_horizontal()
        }
    }

    /// Урон через DamageModel + реакция роли на смерть
    pub fn receive_damage(
        &mut self,
        model: &mut DamageModel,
        amount: f32,
        source_position: Option<Vec2>,
        position: Vec2,
        facing: f32,
    ) -> DamageOutcome {
        let outcome = model.receive_damage(amount, source_position, position, facing);
        if outcome.died {
            self.on_death();
        }
        outcome
    }

    /// Смерть: input заблокирован, атака отменена, поражение ждёт показа.
    /// Повторный вызов до respawn ничего не делает
    pub fn on_death(&mut self) {
        if self.input_locked {
            return;
        }
        self.input_locked = true;
        self.is_attacking = false;
        self.pending.cancel_all();
        self.defeat_pending = true;
    }

    /// true ровно один раз за смерть
    pub fn take_defeat_signal(&mut self) -> bool {
        std::mem::take(&mut self.defeat_pending)
    }

    /// "IsHurt" следует за knockback. Some(значение) только при смене
    pub fn sync_hurt_flag(&mut self, model: &DamageModel) -> Option<bool> {
        let hurt = model.in_knockback();
        if hurt == self.hurt_shown {
            return None;
        }
        self.hurt_shown = hurt;
        Some(hurt)
    }

    /// Respawn: full health, invincibility, input разблокирован.
    /// Позицию восстанавливает система (SpawnPoint)
    pub fn respawn(&mut self, model: &mut DamageModel) {
        model.reset();
        model.grant_invincibility(model.tuning.invincibility_duration);

        self.is_attacking = false;
        self.input_locked = false;
        self.defeat_pending = false;
        self.attack_cooldown.reset();
        self.pending.cancel_all();
    }

    /// Один шаг: cooldown + отложенные шаги атаки.
    /// Возвращает истёкшие действия (ResolveHit обрабатывает система)
    pub fn tick(&mut self, delta: f32) -> Vec<PlayerAction> {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.attack_cooldown.tick(delta);

        let due = self.pending.tick(delta);
        if due.contains(&PlayerAction::FinishAttack) {
            self.is_attacking = false;
        }
        due
    }

    pub fn has_pending_attack(&self) -> bool {
        !self.pending.is_empty()
    }
}
