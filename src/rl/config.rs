//! Q-learning agent hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Q-learning agent
///
/// # Example
///
/// ```rust
/// use snake_q::rl::AgentConfig;
///
/// let config = AgentConfig {
///     batch_size: 256,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Capacity of the replay memory
    ///
    /// Default: 100_000
    pub max_memory: usize,

    /// Upper bound on the long-memory batch sampled at episode end
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Learning rate for the Adam optimizer
    ///
    /// Default: 0.001
    pub learning_rate: f64,

    /// Discount factor for future rewards
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Width of the hidden layer
    ///
    /// Default: 256
    pub hidden_size: usize,

    /// Epsilon is `exploration_episodes - episodes_played`; exploration stops
    /// once that reaches zero
    ///
    /// Default: 80
    pub exploration_episodes: i64,

    /// A random draw from `0..exploration_range` below epsilon triggers a
    /// random move
    ///
    /// Default: 200
    pub exploration_range: i64,

    /// Seed for exploration and replay sampling; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_memory: 100_000,
            batch_size: 1000,
            learning_rate: 0.001,
            gamma: 0.9,
            hidden_size: 256,
            exploration_episodes: 80,
            exploration_range: 200,
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Checks that all hyperparameters are in valid ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_memory == 0 {
            return Err("max_memory must be at least 1".to_string());
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if self.hidden_size == 0 {
            return Err("hidden_size must be at least 1".to_string());
        }

        if self.exploration_range <= 0 {
            return Err(format!(
                "exploration_range must be positive, got {}",
                self.exploration_range
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.max_memory, 100_000);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.hidden_size, 256);
        assert_eq!(config.exploration_episodes, 80);
        assert_eq!(config.exploration_range, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let invalid = [
            AgentConfig { max_memory: 0, ..Default::default() },
            AgentConfig { batch_size: 0, ..Default::default() },
            AgentConfig { learning_rate: 0.0, ..Default::default() },
            AgentConfig { gamma: 1.5, ..Default::default() },
            AgentConfig { hidden_size: 0, ..Default::default() },
            AgentConfig { exploration_range: 0, ..Default::default() },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: AgentConfig = serde_json::from_str(r#"{ "gamma": 0.5 }"#).unwrap();
        assert_eq!(config.gamma, 0.5);
        assert_eq!(config.batch_size, 1000);
    }
}
