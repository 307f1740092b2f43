use std::path::PathBuf;

/// Errors raised by the game environment.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid action {0:?} (expected a one-hot vector of length 3)")]
    InvalidAction(Vec<f32>),

    #[error("invalid action index {0} (expected 0, 1 or 2)")]
    InvalidActionIndex(usize),

    #[error("grid {width}x{height} with block {block_size} cannot hold a snake of length {snake_length} plus food")]
    GridTooSmall {
        width: i32,
        height: i32,
        block_size: i32,
        snake_length: usize,
    },

    #[error("invalid game config: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
