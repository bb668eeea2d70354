//! Combat конфигурация (RON)
//!
//! Defaults в коде и `assets/config/combat.ron` должны совпадать (проверяется тестом).
//! Файл не обязателен: при ошибке чтения/парсинга: defaults + warning.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::boss::BossTuning;
use crate::combat::DamageTuning;
use crate::logger;
use crate::player::PlayerTuning;

/// Путь по умолчанию (относительно crate root / рабочей директории)
pub const DEFAULT_CONFIG_PATH: &str = "assets/config/combat.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Headless locomotion (заглушка физики движка)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// units/sec²
    pub gravity: f32,
    /// Y пола (ниже не проваливаемся)
    pub ground_level: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            gravity: -20.0,
            ground_level: 0.0,
        }
    }
}

/// Вся combat конфигурация одной сцены
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Частота fixed step (Hz)
    pub tick_rate_hz: f64,
    pub player_damage: DamageTuning,
    pub player: PlayerTuning,
    pub boss_damage: DamageTuning,
    pub boss: BossTuning,
    pub world: WorldTuning,
    /// Сцена главного меню (выход из Game Over, конец боя)
    pub menu_scene: String,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            player_damage: DamageTuning::player(),
            player: PlayerTuning::default(),
            boss_damage: DamageTuning::boss(),
            boss: BossTuning::default(),
            world: WorldTuning::default(),
            menu_scene: "MainMenu".to_string(),
        }
    }
}

impl CombatConfig {
    pub fn from_ron_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_ron_str(&contents, path)?;
        logger::log_info(&format!("Loaded combat config from {:?}", path));
        Ok(config)
    }

    /// Загрузка с fallback на defaults (ошибка логируется, не пробрасывается)
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => {
                config.log_range_warnings();
                config
            }
            Err(e) => {
                logger::log_warning(&format!("{}; using default combat config", e));
                Self::default()
            }
        }
    }

    /// Подозрительные соотношения дистанций босса: только warning, значения не трогаем
    pub fn log_range_warnings(&self) {
        for warning in self.boss.range_warnings() {
            logger::log_warning(&format!("Boss config: {}", warning));
        }
    }

    /// Длительность одного fixed step
    pub fn tick_duration(&self) -> std::time::Duration {
        let hz = if self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0 {
            self.tick_rate_hz
        } else {
            60.0
        };
        std::time::Duration::from_secs_f64(1.0 / hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bundled_tuning() {
        let config = CombatConfig::default();
        assert_eq!(config.player_damage.max_health, 100.0);
        assert_eq!(config.player_damage.invincibility_duration, 1.5);
        assert_eq!(config.player.attack_damage, 30.0);
        assert_eq!(config.boss_damage.max_health, 1000.0);
        assert_eq!(config.boss.lifetime_limit, 180.0);
        assert_eq!(config.boss.attack_range, 2.0);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = CombatConfig::from_ron_str(
            "(menu_scene: \"Title\", boss: (attack_range: 3.0))",
            Path::new("inline.ron"),
        )
        .expect("partial config should parse");

        assert_eq!(config.menu_scene, "Title");
        assert_eq!(config.boss.attack_range, 3.0);
        assert_eq!(config.boss.detection_range, 10.0);
        assert_eq!(config.player.attack_cooldown, 0.5);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = CombatConfig::from_ron_str("(tick_rate_hz: \"fast\")", Path::new("bad.ron"))
            .expect_err("string is not a number");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.ron"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = CombatConfig::load_or_default("definitely/not/here.ron");
        assert_eq!(config, CombatConfig::default());
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = CombatConfig::load_from_file(&path).expect("bundled config is valid");
        assert_eq!(config, CombatConfig::default());
        assert!(config.boss.range_warnings().is_empty());
    }
}
