//! Headless дуэль игрок vs босс
//!
//! Игрок управляется ScriptedInput (seeded RNG), босс: своей FSM.
//! Бой идёт до смерти одного из них или до лимита тиков.
//!
//! Usage: emberfall_simulation [seed] [config.ron]

use bevy::prelude::*;
use emberfall_simulation::config::DEFAULT_CONFIG_PATH;
use emberfall_simulation::{
    create_headless_app_with_config, logger, spawn_boss, spawn_player, BossCombatant, CombatConfig, DamageModel,
    ScriptedInput, TrackedTarget,
};

const MAX_TICKS: usize = 60 * 240;

fn main() {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    logger::init_logger();
    logger::set_log_level(logger::LogLevel::Info);

    let config = CombatConfig::load_or_default(&config_path);
    logger::log_info(&format!("Starting Emberfall headless duel (seed: {})", seed));

    let mut app = create_headless_app_with_config(seed, config.clone());

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, &config, Vec2::new(-6.0, 0.0), true);
        let boss = spawn_boss(&mut commands, &config, Vec2::new(4.0, 0.0), Some(player));
        commands
            .entity(player)
            .insert((TrackedTarget(Some(boss)), ScriptedInput::default()));
        (player, boss)
    };
    app.world_mut().flush();

    for tick in 0..MAX_TICKS {
        app.update();

        let player_model = app.world().get::<DamageModel>(player).cloned();
        let boss_state = app.world().get::<BossCombatant>(boss).map(|b| b.state);
        let boss_model = app.world().get::<DamageModel>(boss).cloned();

        if tick % 600 == 0 {
            if let (Some(p), Some(state), Some(b)) = (&player_model, boss_state, &boss_model) {
                logger::log_info(&format!(
                    "Tick {}: player {:.0}%, boss {:.0}% ({:?})",
                    tick,
                    p.health_fraction() * 100.0,
                    b.health_fraction() * 100.0,
                    state
                ));
            }
        }

        let player_dead = player_model.is_some_and(|m| m.is_dead);
        let boss_dead = boss_model.is_some_and(|m| m.is_dead);
        if player_dead || boss_dead {
            let winner = if boss_dead { "player" } else { "boss" };
            logger::log_info(&format!("Duel over at tick {}: {} wins", tick, winner));
            return;
        }
    }

    logger::log_info(&format!("Duel reached tick limit ({})", MAX_TICKS));
}
