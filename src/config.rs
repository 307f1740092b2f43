use std::path::Path;

use log::info;

use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::modes::TrainConfig;
use crate::rl::AgentConfig;

/// Top-level application configuration, loadable from TOML.
///
/// Every section and field is optional; missing values take their defaults.
///
/// ```toml
/// [game]
/// width = 320
/// height = 240
///
/// [agent]
/// batch_size = 500
///
/// [train]
/// max_episodes = 200
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub agent: AgentConfig,
    pub train: TrainConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game
            .validate()
            .map_err(|e| ConfigError::Validation(format!("game: {}", e)))?;

        self.agent
            .validate()
            .map_err(|e| ConfigError::Validation(format!("agent.{}", e)))?;

        if self.train.max_episodes == Some(0) {
            return Err(ConfigError::Validation(
                "train.max_episodes must be > 0".into(),
            ));
        }
        if self.train.stats_window == 0 {
            return Err(ConfigError::Validation(
                "train.stats_window must be > 0".into(),
            ));
        }

        Ok(())
    }
}
