//! TOML configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use stocksim::SimulationConfig;

use crate::error::{Error, Result};

/// Top-level configuration. Every section and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub initial_cash: i64,
    pub price_floor: i64,
    pub max_daily_move: f64,
    /// Fixed seed for reproducible price paths
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Simulation rules described by this section.
    pub fn rules(&self) -> SimulationConfig {
        SimulationConfig {
            initial_cash: self.initial_cash,
            price_floor: self.price_floor,
            max_daily_move: self.max_daily_move,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let rules = SimulationConfig::default();
        Self {
            initial_cash: rules.initial_cash,
            price_floor: rules.price_floor,
            max_daily_move: rules.max_daily_move,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: ".stocksim".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub journal_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            journal_file: "trades.jsonl".into(),
        }
    }
}

const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl Config {
    /// Load config from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        Self::parse(&contents)
    }

    /// Parse and validate TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.game.rules().validate()?;
        if self.storage.dir.is_empty() {
            return Err(Error::Config("storage dir must not be empty".into()));
        }
        if self.logging.journal_file.is_empty() {
            return Err(Error::Config("journal_file must not be empty".into()));
        }
        if !LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "unknown log level '{}' (expected one of {})",
                self.logging.level,
                LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Full path to the trade journal.
    pub fn journal_path(&self) -> PathBuf {
        Path::new(&self.storage.dir).join(&self.logging.journal_file)
    }
}
