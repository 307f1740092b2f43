//! Training mode for the Q-learning agent
//!
//! Each tick plays one move: featurize, pick an epsilon-greedy action, step
//! the environment, train on that single transition and store it. When an
//! episode ends the environment is reset, the agent trains on a replay batch,
//! and a new record score saves the network.
//!
//! # Example
//!
//! ```rust,ignore
//! use snake_q::game::GameConfig;
//! use snake_q::modes::{TrainConfig, TrainMode};
//! use snake_q::rl::{AgentConfig, TrainingBackend, default_device};
//!
//! let train_config = TrainConfig {
//!     max_episodes: Some(500),
//!     ..Default::default()
//! };
//!
//! let mut train_mode = TrainMode::<TrainingBackend>::new(
//!     GameConfig::default(),
//!     AgentConfig::default(),
//!     train_config,
//!     default_device(),
//! )?;
//! train_mode.run();
//! ```

use anyhow::{Context, Result};
use burn::module::AutodiffModule;
use burn::tensor::backend::AutodiffBackend;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::render::Renderer;
use crate::rl::{
    AgentConfig, ModelMetadata, QAgent, QNetworkConfig, SnakeEnvironment, Transition, save_model,
};

/// Configuration for training mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Stop after this many episodes; train forever when absent
    pub max_episodes: Option<usize>,

    /// Where the network is saved on every new record
    pub save_path: PathBuf,

    /// Log a statistics summary every N episodes
    pub log_frequency: usize,

    /// Episodes covered by the rolling averages
    pub stats_window: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_episodes: None,
            save_path: PathBuf::from("model/model.mpk"),
            log_frequency: 100,
            stats_window: 100,
        }
    }
}

/// What happened in a finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    /// Episode number, starting at 1
    pub episode: usize,
    pub score: u32,
    pub steps: usize,
    /// Loss of the long-memory update run after the episode
    pub loss: f32,
    /// Whether the score beat the previous record
    pub is_record: bool,
}

/// Training loop for the Q-learning agent
pub struct TrainMode<B: AutodiffBackend> {
    agent: QAgent<B>,
    env: SnakeEnvironment,
    stats: TrainingStats,
    config: TrainConfig,

    /// Moves made in the current episode
    episode_steps: usize,
}

impl<B: AutodiffBackend> TrainMode<B> {
    pub fn new(
        game_config: GameConfig,
        agent_config: AgentConfig,
        config: TrainConfig,
        device: B::Device,
    ) -> Result<Self> {
        agent_config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid agent configuration")?;
        let env = SnakeEnvironment::new(game_config).context("Invalid game configuration")?;
        let agent = QAgent::new(agent_config, device);
        let stats = TrainingStats::new(config.stats_window);

        Ok(Self {
            agent,
            env,
            stats,
            config,
            episode_steps: 0,
        })
    }

    /// Show every frame of training through `renderer`
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.env = self.env.with_renderer(renderer);
        self
    }

    /// Train until `max_episodes` is reached, or forever when it is unset
    pub fn run(&mut self) {
        info!(
            "Training on {}x{} board (block {}), saving records to {:?}",
            self.env.config().width,
            self.env.config().height,
            self.env.config().block_size,
            self.config.save_path
        );

        while !self.is_finished() {
            self.run_episode();
        }

        info!("Training complete. {}", self.stats.format_summary());
    }

    /// Play ticks until the current episode ends
    pub fn run_episode(&mut self) -> EpisodeOutcome {
        loop {
            if let Some(outcome) = self.tick() {
                return outcome;
            }
        }
    }

    /// Play one move and learn from it
    ///
    /// Returns the episode outcome when the move ended the episode.
    pub fn tick(&mut self) -> Option<EpisodeOutcome> {
        let state_old = self.agent.get_state(self.env.state());
        let action = self.agent.get_action(&state_old);

        let result = self.env.step(action);
        let state_new = self.agent.get_state(self.env.state());

        let transition = Transition {
            state: state_old,
            action: action.one_hot(),
            reward: result.reward as f32,
            next_state: state_new,
            done: result.terminated,
        };
        self.agent.train_short_memory(&transition);
        self.agent.remember(transition);
        self.episode_steps += 1;

        if !result.terminated {
            return None;
        }

        self.env.reset();
        self.agent.increment_episode();
        let loss = self.agent.train_long_memory();
        self.stats.record_loss(loss);

        let steps = std::mem::take(&mut self.episode_steps);
        let is_record = self.stats.record_episode(result.score, steps);
        if is_record {
            self.save_best(result.score);
        }

        let episode = self.agent.n_games();
        info!(
            "Game {} Score {} Record {}",
            episode,
            result.score,
            self.stats.record()
        );
        if self.config.log_frequency > 0 && episode % self.config.log_frequency == 0 {
            info!("{}", self.stats.format_summary());
        }

        Some(EpisodeOutcome {
            episode,
            score: result.score,
            steps,
            loss,
            is_record,
        })
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn agent(&self) -> &QAgent<B> {
        &self.agent
    }

    fn is_finished(&self) -> bool {
        self.config
            .max_episodes
            .is_some_and(|max| self.agent.n_games() >= max)
    }

    /// Save the network after a record; failures are logged and training goes on
    fn save_best(&self, score: u32) {
        let metadata = ModelMetadata::new(
            QNetworkConfig::new(self.agent.config().hidden_size),
            score,
            self.agent.n_games(),
        );
        let network = self.agent.network().valid();

        if let Err(e) = save_model(&network, &metadata, &self.config.save_path) {
            warn!(
                "Failed to save model to {:?}: {:#}",
                self.config.save_path, e
            );
        }
    }
}
