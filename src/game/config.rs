use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Configuration for the game
///
/// Coordinates are in pixels and quantized to `block_size`, so a 640x480 grid
/// with a block of 20 has 32x24 cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playing field
    pub width: i32,
    /// Height of the playing field
    pub height: i32,
    /// Size of one movement unit
    pub block_size: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Reward for eating food
    pub food_reward: i32,
    /// Penalty for dying or starving
    pub death_penalty: i32,
    /// An episode is cut off once the frame counter exceeds
    /// `starvation_factor * snake length`
    pub starvation_factor: u32,

    /// Seed for food placement; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block_size: 20,
            initial_snake_length: 3,
            food_reward: 10,
            death_penalty: -10,
            starvation_factor: 100,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom field size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a small field for testing (10x10 cells)
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cells along the x axis
    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    /// Number of cells along the y axis
    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Check the field can hold the initial snake (laid out horizontally from
    /// the centre) plus one food cell, and that episodes can last past the
    /// first move.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.starvation_factor == 0 {
            return Err(GameError::InvalidConfig(
                "starvation_factor must be > 0".into(),
            ));
        }

        let too_small = || GameError::GridTooSmall {
            width: self.width,
            height: self.height,
            block_size: self.block_size,
            snake_length: self.initial_snake_length,
        };

        if self.block_size <= 0 || self.initial_snake_length == 0 {
            return Err(too_small());
        }
        let (columns, rows) = (self.columns(), self.rows());
        if columns <= 0 || rows <= 0 {
            return Err(too_small());
        }
        let cells = (columns as usize) * (rows as usize);
        // The tail trails left from the centre column
        let fits_horizontally = (columns / 2) as usize + 1 >= self.initial_snake_length;
        if !fits_horizontally || cells <= self.initial_snake_length {
            return Err(too_small());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.block_size, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.columns(), 32);
        assert_eq!(config.rows(), 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(300, 200);
        assert_eq!(config.columns(), 15);
        assert_eq!(config.rows(), 10);
    }

    #[test]
    fn test_tiny_grid_rejected() {
        assert!(GameConfig::new(40, 20).validate().is_err());
        assert!(GameConfig::new(0, 480).validate().is_err());

        let mut config = GameConfig::default();
        config.block_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_starvation_factor_rejected() {
        let config = GameConfig {
            starvation_factor: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }
}
