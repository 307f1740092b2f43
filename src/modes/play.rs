//! Playback mode for watching a trained network
//!
//! Loads a saved model and lets it play greedily, with no exploration and no
//! learning. Frames go to whatever [`Renderer`] is attached; moves are paced
//! by a tokio interval and Ctrl-C stops playback cleanly.

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use log::{debug, info};
use std::path::Path;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Action, GameConfig};
use crate::render::Renderer;
use crate::rl::{ModelMetadata, QNetwork, SnakeEnvironment, load_network, network::argmax};

/// Shortest pause between moves
const MIN_FRAME_DELAY: Duration = Duration::from_millis(1);

/// Greedy playback of a saved network
pub struct PlayMode<B: Backend> {
    network: QNetwork<B>,
    env: SnakeEnvironment,
    metadata: ModelMetadata,

    /// Cap on moves per episode
    max_steps: Option<usize>,

    /// Pause after each move
    frame_delay: Duration,

    /// Moves made in the current episode
    steps: usize,
}

impl<B: Backend> PlayMode<B> {
    /// Load the model at `model_path` and set up a fresh game
    pub fn new(model_path: &Path, game_config: GameConfig, device: &B::Device) -> Result<Self> {
        let (network, metadata) = load_network::<B>(model_path, device)
            .with_context(|| format!("Failed to load model from {:?}", model_path))?;
        info!(
            "Loaded model (record {}, {} episodes, v{})",
            metadata.record_score, metadata.episodes_trained, metadata.version
        );

        let env = SnakeEnvironment::new(game_config).context("Invalid game configuration")?;

        Ok(Self {
            network,
            env,
            metadata,
            max_steps: None,
            frame_delay: MIN_FRAME_DELAY,
            steps: 0,
        })
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.env = self.env.with_renderer(renderer);
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay.max(MIN_FRAME_DELAY);
        self
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Play `episodes` games, one move per tick, and return their scores
    ///
    /// Stops early on Ctrl-C; the scores of finished games are still returned.
    pub async fn run(&mut self, episodes: usize) -> Vec<u32> {
        let mut ticker = interval(self.frame_delay);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut scores = Vec::with_capacity(episodes);

        'episodes: for episode in 1..=episodes {
            self.start_episode();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Some(score) = self.advance() {
                            info!("Game {} Score {}", episode, score);
                            scores.push(score);
                            continue 'episodes;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Interrupted");
                        break 'episodes;
                    }
                }
            }
        }

        if !scores.is_empty() {
            let mean = scores.iter().sum::<u32>() as f32 / scores.len() as f32;
            let best = scores.iter().copied().max().unwrap_or(0);
            info!("Played {} games: mean {:.2}, best {}", scores.len(), mean, best);
        }
        scores
    }

    /// Play one game to the end (or to the step cap) without pacing
    pub fn run_episode(&mut self) -> u32 {
        self.start_episode();
        loop {
            if let Some(score) = self.advance() {
                return score;
            }
        }
    }

    fn start_episode(&mut self) {
        self.env.reset();
        self.steps = 0;
    }

    /// Make one greedy move; the final score once the episode is over
    fn advance(&mut self) -> Option<u32> {
        let q_values = self.network.predict(&self.env.features());
        let action = Action::ALL[argmax(&q_values)];
        let result = self.env.step(action);
        self.steps += 1;

        if result.terminated {
            debug!("episode ended after {} moves: {:?}", self.steps, result.info);
            return Some(result.score);
        }
        if self.max_steps.is_some_and(|max| self.steps >= max) {
            debug!("step cap {} reached", self.steps);
            return Some(result.score);
        }
        None
    }
}
