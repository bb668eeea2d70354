//! Emberfall Simulation Core
//!
//! ECS-симуляция боя 2D платформера на Bevy 0.16 (headless)
//!
//! - DamageModel: health, invincibility, knockback (общий для обеих ролей)
//! - PlayerCombatant: атака мечом, фильтр input, поражение, respawn
//! - BossCombatant: FSM преследования/атаки, lifetime timeout, цепочка смерти
//!
//! Рендер, анимации, звук, UI, загрузка сцен: внешние коллабораторы.
//! Симуляция читает boundary events (Contact, кнопки, animation callbacks)
//! и пишет `PresentationSignal` / `SceneChangeRequested`.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod boss;
pub mod combat;
pub mod components;
pub mod config;
pub mod driver;
pub mod events;
pub mod logger;
pub mod physics;
pub mod player;

// Re-export базовых типов для удобства
pub use boss::{spawn_boss, BossCombatant, BossEffect, BossPlugin, BossState, BossTuning};
pub use combat::{
    CombatPlugin, DamageDealt, DamageModel, DamageOutcome, DamageTuning, Dead, DeathCause, EntityDied,
    HealingPickup, HealthChanged, Trap, TrapMode, WeaponPickup,
};
pub use components::*;
pub use config::{CombatConfig, ConfigError};
pub use driver::ScriptedInput;
pub use events::*;
pub use logger::init_logger;
pub use physics::{Grounded, LocomotionPlugin};
pub use player::{spawn_player, Player, PlayerCombatant, PlayerPlugin, PlayerState, PlayerTuning};

/// Этапы одного fixed step (строго по порядку)
///
/// Внутри этапа каждая роль пишет только свои компоненты, так что порядок
/// между ролями на результат не влияет.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatStep {
    /// DamageModel и интервалы ловушек
    Timers,
    /// Intent игрока → атака, facing, LocomotionCommand
    Input,
    /// Hit check атаки игрока
    PlayerActions,
    /// FSM босса + его удар
    BossActions,
    /// Контакты с окружением
    Environment,
    /// Применение урона и лечения
    Resolve,
    /// Respawn, меню, boss callbacks
    Requests,
    /// Последствия урона: сигналы, цепочка смерти
    React,
    /// Locomotion
    Motion,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<CombatConfig>() {
            app.insert_resource(CombatConfig::default());
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        let tick = app.world().resource::<CombatConfig>().tick_duration();

        app
            // Fixed timestep из конфига (60Hz по умолчанию)
            .insert_resource(Time::<Fixed>::from_duration(tick))
            .configure_sets(
                FixedUpdate,
                (
                    CombatStep::Timers,
                    CombatStep::Input,
                    CombatStep::PlayerActions,
                    CombatStep::BossActions,
                    CombatStep::Environment,
                    CombatStep::Resolve,
                    CombatStep::Requests,
                    CombatStep::React,
                    CombatStep::Motion,
                )
                    .chain(),
            );

        events::register_boundary_events(app);

        app.register_type::<ScriptedInput>()
            .add_plugins((CombatPlugin, PlayerPlugin, BossPlugin, LocomotionPlugin))
            .add_systems(
                FixedUpdate,
                driver::drive_scripted_input
                    .in_set(CombatStep::Input)
                    .before(player::systems::process_player_intents),
            );
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (конфиг по умолчанию)
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(seed, CombatConfig::default())
}

/// Headless App с ручным временем: после возврата каждый `app.update()`
/// продвигает симуляцию ровно на один fixed step.
pub fn create_headless_app_with_config(seed: u64, config: CombatConfig) -> App {
    init_logger();

    let step = config.tick_duration();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(config)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app.finish();
    app.cleanup();

    // Первый update только запоминает стартовое время (delta = 0)
    app.update();

    app
}

/// Прогнать `steps` fixed step'ов
pub fn run_steps(app: &mut App, steps: usize) {
    for _ in 0..steps {
        app.update();
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

/// Snapshot боевого состояния: health/таймеры, позиции, состояние ролей
pub fn combat_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = world_snapshot::<DamageModel>(world);
    snapshot.extend(world_snapshot::<Transform>(world));
    snapshot.extend(world_snapshot::<Velocity>(world));
    snapshot.extend(world_snapshot::<PlayerCombatant>(world));
    snapshot.extend(world_snapshot::<BossCombatant>(world));
    snapshot
}
