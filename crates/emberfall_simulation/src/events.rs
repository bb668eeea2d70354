//! Events на границе симуляции
//!
//! Inbound: коллизии, UI-кнопки, animation callbacks, внешний урон.
//! Outbound: `PresentationSignal` (fire-and-forget для анимаций, звука, UI, сцен).
//!
//! Симуляция никогда не лезет во внутренности UI/диалогов: только пишет
//! типизированные сигналы, а внешний координатор решает, что с ними делать.

use bevy::prelude::*;

// ============================================================================
// Inbound
// ============================================================================

/// Фаза контакта от физики (trigger/collision callbacks)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// Первый кадр контакта
    Started,
    /// Контакт продолжается
    Persisting,
}

/// Контакт двух entity (физика движка → симуляция)
///
/// `entity`: тот, кто "чувствует" контакт (обычно игрок),
/// `other`: ловушка, враг, pickup.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct Contact {
    pub entity: Entity,
    pub other: Entity,
    pub phase: ContactPhase,
}

/// Запрос урона. Все источники урона идут через эту очередь,
/// `apply_damage_requests` обрабатывает их строго по порядку.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub attacker: Option<Entity>,
    pub amount: f32,
    /// Позиция источника для knockback (None = без отброса)
    pub source_position: Option<Vec2>,
}

/// Запрос лечения (pickups, скрипты)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Кнопка "Respawn" на экране поражения
#[derive(Event, Debug, Clone, PartialEq)]
pub struct RespawnRequested {
    pub entity: Entity,
}

/// Кнопка "Выйти в меню" на экране поражения
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ExitToMenuRequested;

/// Hit-анимация босса доиграла (снимает состояние Hit)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct HitReactionFinished {
    pub entity: Entity,
}

/// Диалог победы закрыт игроком
#[derive(Event, Debug, Clone, PartialEq)]
pub struct VictoryDialogClosed {
    pub boss: Entity,
}

/// Сброс босса (повтор боя без respawn сцены)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct BossResetRequested {
    pub entity: Entity,
}

// ============================================================================
// Outbound
// ============================================================================

/// Звуковые cue (микширование: забота движка)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AudioCue {
    PlayerHurt,
    PlayerDeath,
    PlayerSwing,
    /// Успешное лечение (pickup)
    Heal,
    /// Меч подобран
    WeaponObtained,
    BossSwing,
    BossHurt,
    BossDeath,
}

/// Что именно должен показать/проиграть presentation слой
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCue {
    /// One-shot animation trigger ("attack", "hit")
    AnimationTrigger(&'static str),
    /// Animation bool параметр ("isWalking", "isDead", "IsHurt", "HasSword")
    AnimationFlag(&'static str, bool),
    Audio(AudioCue),
    /// Экран поражения (Game Over)
    ShowDefeat,
    /// Диалог победы
    ShowVictory,
    /// Панель "получен меч"
    ShowWeaponObtained,
    /// Визуальное "проседание" тела босса
    StartSink { duration: f32, speed: f32 },
    /// Fade-out спрайта
    StartFade { duration: f32 },
    /// Отключить дочерние entity (health bar, эффекты)
    DeactivateChildren,
    /// Спрайт снова видим (respawn / reset)
    Revive,
}

/// Сигнал presentation слою. Fire-and-forget.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PresentationSignal {
    pub entity: Entity,
    pub cue: PresentationCue,
}

impl PresentationSignal {
    pub fn new(entity: Entity, cue: PresentationCue) -> Self {
        Self { entity, cue }
    }
}

/// Переход на другую сцену (меню после боя или из Game Over)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SceneChangeRequested {
    pub scene: String,
}

/// Регистрирует все boundary events
pub(crate) fn register_boundary_events(app: &mut App) {
    app.add_event::<Contact>()
        .add_event::<DamageRequest>()
        .add_event::<HealRequest>()
        .add_event::<RespawnRequested>()
        .add_event::<ExitToMenuRequested>()
        .add_event::<HitReactionFinished>()
        .add_event::<VictoryDialogClosed>()
        .add_event::<BossResetRequested>()
        .add_event::<PresentationSignal>()
        .add_event::<SceneChangeRequested>();
}
