//! Boss FSM
//!
//! Состояния: Idle → Pursuing → Attacking (lock) → Idle, Hit, Dead (terminal до reset).
//!
//! BossCombatant это чистая логика, никаких Query/Commands. Всё, что должно
//! произойти в мире (скорость, удар, анимация, сцена), складывается в outbox
//! `BossEffect`, который применяет система `apply_boss_effects`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::timers::{Cooldown, ScheduledActions};
use crate::combat::{DamageModel, DamageOutcome, DeathCause};
use crate::components::{Combatant, TrackedTarget};
use crate::events::{AudioCue, PresentationCue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum BossState {
    #[default]
    Idle,
    Pursuing,
    Attacking,
    /// Stagger после удара (только с `stagger_on_hit`), снимается HitReactionFinished
    Hit,
    Dead,
}

/// Тюнинг босса
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Секунды жизни, после которых босс умирает сам
    pub lifetime_limit: f32,
    pub move_speed: f32,
    pub detection_range: f32,
    /// Ближе этого босс не подходит
    pub min_approach_distance: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub attack_damage: f32,
    /// Сколько атака держит FSM (без переоценки состояния)
    pub attack_lock_duration: f32,
    pub sink_duration: f32,
    pub sink_speed: f32,
    pub fade_duration: f32,
    /// Пауза после fade до диалога победы
    pub victory_delay: f32,
    /// Без диалога: пауза после victory_delay до загрузки меню
    pub menu_fallback_delay: f32,
    /// После закрытия диалога до загрузки меню
    pub post_dialog_delay: f32,
    pub has_victory_dialog: bool,
    /// Входить в Hit при каждом принятом ударе
    pub stagger_on_hit: bool,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            lifetime_limit: 180.0,
            move_speed: 3.0,
            detection_range: 10.0,
            min_approach_distance: 1.5,
            attack_range: 2.0,
            attack_cooldown: 2.0,
            attack_damage: 20.0,
            attack_lock_duration: 0.6,
            sink_duration: 1.0,
            sink_speed: 2.0,
            fade_duration: 0.5,
            victory_delay: 5.0,
            menu_fallback_delay: 2.0,
            post_dialog_delay: 2.0,
            has_victory_dialog: true,
            stagger_on_hit: false,
        }
    }
}

impl BossTuning {
    /// Неконсистентные дистанции. Значения не исправляются, только сообщаются
    pub fn range_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.attack_range < self.min_approach_distance {
            warnings.push(format!(
                "attack_range ({}) < min_approach_distance ({}): boss stops before it can reach",
                self.attack_range, self.min_approach_distance
            ));
        }
        if self.detection_range < self.attack_range {
            warnings.push(format!(
                "detection_range ({}) < attack_range ({})",
                self.detection_range, self.attack_range
            ));
        }
        if self.attack_lock_duration > self.attack_cooldown {
            warnings.push(format!(
                "attack_lock_duration ({}) > attack_cooldown ({})",
                self.attack_lock_duration, self.attack_cooldown
            ));
        }

        warnings
    }
}

/// Отложенные шаги босса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossAction {
    /// Конец attack lock → Idle
    UnlockAttack,
    SinkFinished,
    FadeFinished,
    RevealVictory,
    LoadMenu,
}

/// Что должно произойти в мире после шага/урона
#[derive(Debug, Clone, PartialEq)]
pub enum BossEffect {
    /// Горизонтальная скорость (вертикальная остаётся за locomotion)
    SetHorizontalVelocity(f32),
    /// Повернуться к точке с этим x (при равном x facing не меняется)
    FaceToward(f32),
    /// Удар по цели. `target_in_range` посчитан в момент удара
    Strike { target_in_range: bool, damage: f32 },
    Signal(PresentationCue),
    /// Остановить движение, выключить hurtbox, пометить Dead
    Died(DeathCause),
    /// Обратное к Died (reset)
    Revived,
    RequestMenu,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Combatant, TrackedTarget)]
pub struct BossCombatant {
    pub state: BossState,
    pub tuning: BossTuning,
    /// Секунды с момента спавна/reset (только пока жив)
    pub alive_duration: f32,
    pub attack_cooldown: Cooldown,
    pub attack_locked: bool,
    /// Удар текущей атаки уже нанесён
    attack_executed: bool,
    walking: bool,
    victory_shown: bool,
    menu_scheduled: bool,
    #[reflect(ignore)]
    pending: ScheduledActions<BossAction>,
    #[reflect(ignore)]
    effects: Vec<BossEffect>,
}

impl Default for BossCombatant {
    fn default() -> Self {
        Self::new(BossTuning::default())
    }
}

fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() {
        delta.max(0.0)
    } else {
        0.0
    }
}

impl BossCombatant {
    pub fn new(tuning: BossTuning) -> Self {
        Self {
            state: BossState::Idle,
            tuning,
            alive_duration: 0.0,
            attack_cooldown: Cooldown::ready(tuning.attack_cooldown),
            attack_locked: false,
            attack_executed: false,
            walking: false,
            victory_shown: false,
            menu_scheduled: false,
            pending: ScheduledActions::default(),
            effects: Vec::new(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == BossState::Dead
    }

    /// Забрать накопленные эффекты (outbox очищается)
    pub fn drain_effects(&mut self) -> Vec<BossEffect> {
        std::mem::take(&mut self.effects)
    }

    fn emit(&mut self, effect: BossEffect) {
        self.effects.push(effect);
    }

    fn signal(&mut self, cue: PresentationCue) {
        self.effects.push(BossEffect::Signal(cue));
    }

    /// Один шаг FSM.
    ///
    /// Порядок: lifetime → таймеры → оценка состояния (если не locked) → поведение.
    /// `target = None`: цели нет, босс стоит в Idle.
    pub fn tick(&mut self, model: &mut DamageModel, position: Vec2, target: Option<Vec2>, delta: f32) {
        let delta = sanitize_delta(delta);

        if self.state != BossState::Dead && model.is_dead {
            // DamageModel убит в обход BossCombatant
            self.die(model, DeathCause::Damage);
        }

        if self.state == BossState::Dead {
            self.run_scheduled(delta);
            return;
        }

        self.alive_duration += delta;
        if self.alive_duration >= self.tuning.lifetime_limit {
            self.die(model, DeathCause::Lifetime);
            return;
        }

        self.attack_cooldown.tick(delta);
        self.run_scheduled(delta);

        let Some(target) = target else {
            if !self.attack_locked && self.state != BossState::Hit {
                self.state = BossState::Idle;
            }
            self.emit(BossEffect::SetHorizontalVelocity(0.0));
            self.set_walking(false, 0.0);
            return;
        };

        if !self.attack_locked && self.state != BossState::Hit {
            self.evaluate(position, target);
        }

        self.behave(position, target);
    }

    fn evaluate(&mut self, position: Vec2, target: Vec2) {
        let distance = position.distance(target);

        self.state = if distance <= self.tuning.attack_range && self.attack_cooldown.is_ready() {
            BossState::Attacking
        } else if distance > self.tuning.min_approach_distance && distance <= self.tuning.detection_range {
            BossState::Pursuing
        } else {
            BossState::Idle
        };
    }

    fn behave(&mut self, position: Vec2, target: Vec2) {
        let distance = position.distance(target);

        match self.state {
            BossState::Idle => {
                self.emit(BossEffect::SetHorizontalVelocity(0.0));
                self.face(target);
                self.set_walking(false, 0.0);
            }
            BossState::Pursuing => {
                let velocity_x = if distance <= self.tuning.min_approach_distance {
                    0.0
                } else {
                    (target - position).normalize_or_zero().x * self.tuning.move_speed
                };
                self.emit(BossEffect::SetHorizontalVelocity(velocity_x));
                self.face(target);
                self.set_walking(true, velocity_x);
            }
            BossState::Attacking => {
                if self.attack_executed {
                    return;
                }
                self.attack_locked = true;
                self.attack_executed = true;
                self.attack_cooldown.trigger();
                self.pending.schedule(self.tuning.attack_lock_duration, BossAction::UnlockAttack);

                self.emit(BossEffect::SetHorizontalVelocity(0.0));
                self.face(target);
                self.set_walking(false, 0.0);
                self.signal(PresentationCue::AnimationTrigger("attack"));
                self.signal(PresentationCue::Audio(AudioCue::BossSwing));
                self.emit(BossEffect::Strike {
                    target_in_range: distance <= self.tuning.attack_range,
                    damage: self.tuning.attack_damage,
                });
            }
            BossState::Hit | BossState::Dead => {}
        }
    }

    fn face(&mut self, target: Vec2) {
        self.emit(BossEffect::FaceToward(target.x));
    }

    /// "isWalking" пишется только при смене значения
    fn set_walking(&mut self, pursuing: bool, velocity_x: f32) {
        let walking = pursuing && !self.attack_locked && velocity_x.abs() > 0.1;
        if walking != self.walking {
            self.walking = walking;
            self.signal(PresentationCue::AnimationFlag("isWalking", walking));
        }
    }

    fn run_scheduled(&mut self, delta: f32) {
        for action in self.pending.tick(delta) {
            match action {
                BossAction::UnlockAttack => {
                    self.attack_locked = false;
                    self.attack_executed = false;
                    // Hit снимает только HitReactionFinished
                    if !matches!(self.state, BossState::Dead | BossState::Hit) {
                        self.state = BossState::Idle;
                    }
                }
                BossAction::SinkFinished => {
                    let duration = self.tuning.fade_duration;
                    self.signal(PresentationCue::StartFade { duration });
                    self.pending.schedule(duration, BossAction::FadeFinished);
                }
                BossAction::FadeFinished => {
                    self.pending.schedule(self.tuning.victory_delay, BossAction::RevealVictory);
                }
                BossAction::RevealVictory => {
                    if self.tuning.has_victory_dialog {
                        self.victory_shown = true;
                        self.signal(PresentationCue::ShowVictory);
                    } else {
                        self.schedule_menu(self.tuning.menu_fallback_delay);
                    }
                }
                BossAction::LoadMenu => {
                    self.emit(BossEffect::RequestMenu);
                }
            }
        }
    }

    fn schedule_menu(&mut self, delay: f32) {
        if self.menu_scheduled {
            return;
        }
        self.menu_scheduled = true;
        self.pending.schedule(delay, BossAction::LoadMenu);
    }

    /// Урон по боссу. Босс без invincibility: каждый удар живого босса применяется
    pub fn receive_damage(&mut self, model: &mut DamageModel, amount: f32) -> DamageOutcome {
        if self.state == BossState::Dead {
            return DamageOutcome::IGNORED;
        }

        let outcome = model.receive_damage(amount, None, Vec2::ZERO, 1.0);
        if !outcome.applied {
            return outcome;
        }

        self.signal(PresentationCue::Audio(AudioCue::BossHurt));

        if outcome.died {
            self.die(model, DeathCause::Damage);
        } else {
            self.signal(PresentationCue::AnimationTrigger("hit"));
            if self.tuning.stagger_on_hit {
                self.state = BossState::Hit;
                self.emit(BossEffect::SetHorizontalVelocity(0.0));
                self.set_walking(false, 0.0);
            }
        }

        outcome
    }

    /// Смерть (урон или lifetime). Запускает цепочку sink → fade → victory → menu.
    /// false если уже мёртв
    pub fn die(&mut self, model: &mut DamageModel, cause: DeathCause) -> bool {
        if self.state == BossState::Dead {
            return false;
        }

        model.kill();
        self.state = BossState::Dead;
        self.attack_locked = false;
        self.attack_executed = false;
        self.pending.cancel_all();

        self.emit(BossEffect::Died(cause));
        self.set_walking(false, 0.0);
        self.signal(PresentationCue::DeactivateChildren);
        self.signal(PresentationCue::AnimationFlag("isDead", true));
        self.signal(PresentationCue::Audio(AudioCue::BossDeath));
        self.signal(PresentationCue::StartSink {
            duration: self.tuning.sink_duration,
            speed: self.tuning.sink_speed,
        });
        self.pending.schedule(self.tuning.sink_duration, BossAction::SinkFinished);

        true
    }

    /// Hit-анимация доиграла
    pub fn end_hit_reaction(&mut self) {
        if self.state == BossState::Hit {
            self.state = BossState::Idle;
        }
    }

    /// Диалог победы закрыт → меню через `post_dialog_delay`.
    /// true если загрузка меню запланирована этим вызовом
    pub fn on_victory_dialog_closed(&mut self) -> bool {
        if self.state != BossState::Dead || !self.victory_shown || self.menu_scheduled {
            return false;
        }
        self.schedule_menu(self.tuning.post_dialog_delay);
        true
    }

    /// Полный reset: жив, full health, Idle, все таймеры обнулены
    pub fn reset(&mut self, model: &mut DamageModel) {
        model.reset();

        self.state = BossState::Idle;
        self.alive_duration = 0.0;
        self.attack_cooldown.reset();
        self.attack_locked = false;
        self.attack_executed = false;
        self.victory_shown = false;
        self.menu_scheduled = false;
        self.pending.cancel_all();

        self.emit(BossEffect::Revived);
        self.signal(PresentationCue::AnimationFlag("isDead", false));
        if self.walking {
            self.walking = false;
            self.signal(PresentationCue::AnimationFlag("isWalking", false));
        }
        self.signal(PresentationCue::Revive);
    }

    pub fn has_pending(&self, action: BossAction) -> bool {
        self.pending.contains(|a| *a == action)
    }
}
