//! Q-learning agent
//!
//! Combines the Q-network, its trainer and the replay memory, and implements
//! epsilon-greedy action selection with a linearly decaying exploration
//! schedule.

use burn::module::AutodiffModule;
use burn::tensor::backend::AutodiffBackend;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::AgentConfig;
use super::features::{FeatureVector, extract_features};
use super::memory::{ReplayMemory, Transition};
use super::network::{QNetwork, QNetworkConfig, argmax};
use super::trainer::QTrainer;
use crate::game::{Action, GameState};

/// Deep Q-learning agent
///
/// # Type Parameters
///
/// * `B` - Autodiff backend for gradient computation
///
/// # Example
///
/// ```rust,ignore
/// use snake_q::rl::{AgentConfig, QAgent, TrainingBackend, default_device};
///
/// let agent = QAgent::<TrainingBackend>::new(AgentConfig::default(), default_device());
/// assert_eq!(agent.epsilon(), 80);
/// ```
pub struct QAgent<B: AutodiffBackend> {
    /// Q-value network
    network: QNetwork<B>,

    /// Optimizer and update rule
    trainer: QTrainer<B>,

    /// Experience replay memory
    memory: ReplayMemory,

    /// Hyperparameters
    config: AgentConfig,

    /// Episodes finished so far
    n_games: usize,

    /// Source of exploration randomness
    rng: StdRng,
}

impl<B: AutodiffBackend> QAgent<B> {
    /// Create a new agent with a freshly initialized network
    pub fn new(config: AgentConfig, device: B::Device) -> Self {
        config.validate().expect("Invalid agent configuration");

        let network = QNetworkConfig::new(config.hidden_size).init::<B>(&device);
        let trainer = QTrainer::new(config.learning_rate, config.gamma, device);
        let (memory, rng) = match config.seed {
            Some(seed) => (
                ReplayMemory::with_seed(config.max_memory, seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (ReplayMemory::new(config.max_memory), StdRng::from_entropy()),
        };

        Self {
            network,
            trainer,
            memory,
            config,
            n_games: 0,
            rng,
        }
    }

    /// Features describing `state`
    pub fn get_state(&self, state: &GameState) -> FeatureVector {
        extract_features(state)
    }

    /// Current exploration parameter: `exploration_episodes - n_games`.
    ///
    /// Not clamped; zero or negative values mean no exploration.
    pub fn epsilon(&self) -> i64 {
        self.config.exploration_episodes - self.n_games as i64
    }

    /// Epsilon-greedy action selection
    ///
    /// A uniform draw from `0..exploration_range` below epsilon picks a random
    /// action; otherwise the action with the highest predicted Q-value.
    pub fn get_action(&mut self, state: &FeatureVector) -> Action {
        let epsilon = self.epsilon();
        if self.rng.gen_range(0..self.config.exploration_range) < epsilon {
            return Action::ALL[self.rng.gen_range(0..Action::COUNT)];
        }
        self.greedy_action(state)
    }

    /// Action with the highest predicted Q-value
    pub fn greedy_action(&self, state: &FeatureVector) -> Action {
        let q_values = self.predict(state);
        Action::ALL[argmax(&q_values)]
    }

    /// Q-values for `state`, computed without gradient tracking
    pub fn predict(&self, state: &FeatureVector) -> [f32; 3] {
        self.network.valid().predict(state)
    }

    /// Store a transition in replay memory
    pub fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// Train on the single transition just observed
    pub fn train_short_memory(&mut self, transition: &Transition) -> f32 {
        self.trainer
            .train_batch(&mut self.network, std::slice::from_ref(transition))
    }

    /// Train on a random batch of at most `batch_size` stored transitions
    ///
    /// A no-op returning zero loss when the memory is empty.
    pub fn train_long_memory(&mut self) -> f32 {
        let batch = self.memory.sample(self.config.batch_size);
        if batch.is_empty() {
            return 0.0;
        }
        let loss = self.trainer.train_batch(&mut self.network, &batch);
        debug!(
            "long memory update: batch={} memory={} loss={:.4}",
            batch.len(),
            self.memory.len(),
            loss
        );
        loss
    }

    /// Mark the end of an episode
    pub fn increment_episode(&mut self) {
        self.n_games += 1;
    }

    pub fn n_games(&self) -> usize {
        self.n_games
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn network(&self) -> &QNetwork<B> {
        &self.network
    }

    /// Replace the network, e.g. with one loaded from disk
    pub fn set_network(&mut self, network: QNetwork<B>) {
        self.network = network;
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}
