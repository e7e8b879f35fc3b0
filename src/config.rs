use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;

use crate::compute::arena_fits;
use crate::entities::ArenaBounds;
use crate::error::GameError;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "SPACE_FIGHTER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "space_fighter.toml";

/// Game configuration, loaded from `space_fighter.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Arena size in pixels. The terminal view scales it to fit.
    pub arena_width: f64,
    pub arena_height: f64,
    pub records_path: PathBuf,
    pub log_file: PathBuf,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub target_fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            records_path: PathBuf::from("data/records.txt"),
            log_file: PathBuf::from("space_fighter.log"),
            log_level: "info".to_string(),
            target_fps: 60,
        }
    }
}

impl GameConfig {
    pub fn from_toml(text: &str) -> Result<Self, GameError> {
        let config: GameConfig = toml::from_str(text)?;
        if config.target_fps == 0 {
            return Err(GameError::Config("target_fps must be at least 1".to_string()));
        }
        config.level_filter()?;
        if !arena_fits(&config.arena()) {
            return Err(GameError::Arena {
                width: config.arena_width,
                height: config.arena_height,
            });
        }
        Ok(config)
    }

    /// Read `path`; a missing file means all defaults.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// The file named by `SPACE_FIGHTER_CONFIG`, else `space_fighter.toml`.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn arena(&self) -> ArenaBounds {
        ArenaBounds::new(self.arena_width, self.arena_height)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, GameError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| GameError::Config(format!("unknown log level '{}'", self.log_level)))
    }
}
