//! Окружение: ловушки, лечебные pickups, меч, контактный урон врагов
//!
//! Все источники превращаются в DamageRequest/HealRequest: применяет их
//! общий pipeline урона, invincibility игрока работает как обычно.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::hitbox::planar;
use super::timers::Cooldown;
use super::DamageModel;
use crate::components::{ContactDamage, Hostile};
use crate::events::{AudioCue, Contact, ContactPhase, DamageRequest, HealRequest, PresentationCue, PresentationSignal};
use crate::logger;
use crate::player::PlayerCombatant;

/// Режим ловушки
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum TrapMode {
    /// Урон один раз при входе в контакт
    Instant,
    /// Урон каждые `interval` секунд, пока контакт длится
    Continuous { interval: f32 },
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Trap {
    pub damage: f32,
    pub mode: TrapMode,
    /// Отбрасывать от позиции ловушки
    pub knockback: bool,
    interval: Cooldown,
}

impl Default for Trap {
    fn default() -> Self {
        Self::new(20.0, TrapMode::Instant, true)
    }
}

impl Trap {
    pub fn new(damage: f32, mode: TrapMode, knockback: bool) -> Self {
        let interval = match mode {
            TrapMode::Instant => 0.0,
            TrapMode::Continuous { interval } => interval,
        };

        Self {
            damage,
            mode,
            knockback,
            interval: Cooldown::ready(interval),
        }
    }

    pub fn continuous(damage: f32, interval: f32) -> Self {
        Self::new(damage, TrapMode::Continuous { interval }, true)
    }

    /// Должна ли ловушка ударить на этой фазе контакта.
    ///
    /// Continuous: вход в контакт только взводит интервал, первый удар
    /// через `interval` непрерывного контакта.
    pub fn on_contact(&mut self, phase: ContactPhase) -> bool {
        match (self.mode, phase) {
            (TrapMode::Instant, ContactPhase::Started) => true,
            (TrapMode::Instant, ContactPhase::Persisting) => false,
            (TrapMode::Continuous { .. }, ContactPhase::Started) => {
                self.interval.trigger();
                false
            }
            (TrapMode::Continuous { .. }, ContactPhase::Persisting) => {
                if self.interval.is_ready() {
                    self.interval.trigger();
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn tick(&mut self, delta: f32) {
        self.interval.tick(delta);
    }
}

/// Лечебный предмет: одноразовый, только если игрок ранен
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct HealingPickup {
    pub amount: f32,
    /// Деспавн после использования (иначе остаётся в мире, но уже пустой)
    pub consume_on_use: bool,
    pub used: bool,
}

impl Default for HealingPickup {
    fn default() -> Self {
        Self::new(25.0)
    }
}

impl HealingPickup {
    pub fn new(amount: f32) -> Self {
        Self {
            amount,
            consume_on_use: true,
            used: false,
        }
    }

    /// Забрать предмет. None: уже использован или лечить нечего (предмет остаётся)
    pub fn try_consume(&mut self, model: &DamageModel) -> Option<f32> {
        if self.used || model.is_dead || model.health >= model.max_health {
            return None;
        }
        self.used = true;
        Some(self.amount)
    }
}

/// Триггер меча: срабатывает один раз, открывает атаку игрока
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct WeaponPickup {
    pub used: bool,
}

impl WeaponPickup {
    /// Выдать меч. false если триггер уже сработал
    pub fn try_grant(&mut self, player: &mut PlayerCombatant) -> bool {
        if self.used {
            return false;
        }
        self.used = true;
        player.has_weapon = true;
        true
    }
}

/// Система: countdown интервалов ловушек
pub fn tick_traps(time: Res<Time>, mut traps: Query<&mut Trap>) {
    let delta = time.delta_secs();
    for mut trap in traps.iter_mut() {
        trap.tick(delta);
    }
}

/// Система: Contact → DamageRequest / HealRequest / меч
///
/// Реагирует только игрок. Враг ранит при входе в контакт (ContactDamage или
/// дефолтный урон из PlayerTuning), мёртвый враг безопасен.
#[allow(clippy::too_many_arguments)]
pub fn resolve_contacts(
    mut commands: Commands,
    mut contacts: EventReader<Contact>,
    mut players: Query<(&mut PlayerCombatant, &DamageModel)>,
    mut traps: Query<(&mut Trap, &Transform)>,
    hostiles: Query<(&Transform, Option<&ContactDamage>, Option<&DamageModel>), With<Hostile>>,
    mut pickups: Query<&mut HealingPickup>,
    mut weapon_pickups: Query<&mut WeaponPickup>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut heal_requests: EventWriter<HealRequest>,
    mut signals: EventWriter<PresentationSignal>,
) {
    for contact in contacts.read() {
        let Ok((mut player, model)) = players.get_mut(contact.entity) else {
            continue;
        };

        if let Ok((mut trap, transform)) = traps.get_mut(contact.other) {
            if trap.on_contact(contact.phase) {
                damage_requests.write(DamageRequest {
                    target: contact.entity,
                    attacker: Some(contact.other),
                    amount: trap.damage,
                    source_position: trap.knockback.then(|| planar(transform)),
                });
            }
            continue;
        }

        if let Ok((transform, contact_damage, hostile_model)) = hostiles.get(contact.other) {
            if contact.phase != ContactPhase::Started || hostile_model.is_some_and(|m| m.is_dead) {
                continue;
            }
            let amount = contact_damage.map_or(player.tuning.enemy_contact_damage, |c| c.amount);
            damage_requests.write(DamageRequest {
                target: contact.entity,
                attacker: Some(contact.other),
                amount,
                source_position: Some(planar(transform)),
            });
            if contact_damage.is_some_and(|c| c.despawn_on_touch) {
                commands.entity(contact.other).despawn();
            }
            continue;
        }

        if let Ok(mut weapon) = weapon_pickups.get_mut(contact.other) {
            if contact.phase == ContactPhase::Started && weapon.try_grant(&mut player) {
                logger::log_info(&format!("Player {:?} obtained the sword", contact.entity));
                for cue in [
                    PresentationCue::AnimationFlag("HasSword", true),
                    PresentationCue::Audio(AudioCue::WeaponObtained),
                    PresentationCue::ShowWeaponObtained,
                ] {
                    signals.write(PresentationSignal::new(contact.entity, cue));
                }
            }
            continue;
        }

        if let Ok(mut pickup) = pickups.get_mut(contact.other) {
            if contact.phase != ContactPhase::Started {
                continue;
            }
            if let Some(amount) = pickup.try_consume(model) {
                logger::log(&format!("Pickup {:?} consumed by {:?}", contact.other, contact.entity));
                heal_requests.write(HealRequest {
                    target: contact.entity,
                    amount,
                });
                if pickup.consume_on_use {
                    commands.entity(contact.other).despawn();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageTuning;

    #[test]
    fn test_instant_trap_hits_on_enter_only() {
        let mut trap = Trap::new(20.0, TrapMode::Instant, true);
        assert!(trap.on_contact(ContactPhase::Started));
        assert!(!trap.on_contact(ContactPhase::Persisting));
        assert!(!trap.on_contact(ContactPhase::Persisting));
    }

    #[test]
    fn test_continuous_trap_waits_one_interval() {
        let mut trap = Trap::continuous(20.0, 0.5);

        assert!(!trap.on_contact(ContactPhase::Started));
        trap.tick(0.25);
        assert!(!trap.on_contact(ContactPhase::Persisting));
        trap.tick(0.25);
        assert!(trap.on_contact(ContactPhase::Persisting));
        assert!(!trap.on_contact(ContactPhase::Persisting));
    }

    #[test]
    fn test_pickup_only_when_hurt() {
        let mut pickup = HealingPickup::default();
        let mut model = DamageModel::new(DamageTuning::player());

        assert_eq!(pickup.try_consume(&model), None);
        assert!(!pickup.used, "full health keeps the pickup");

        model.health = 60.0;
        assert_eq!(pickup.try_consume(&model), Some(25.0));
        assert_eq!(pickup.try_consume(&model), None, "single use");
    }
}
