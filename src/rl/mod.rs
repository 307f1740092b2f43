//! Q-learning for the Snake game
//!
//! Provides:
//! - 11-feature state encoding of the game state
//! - Snake environment over 3 relative actions
//! - Bounded FIFO experience replay
//! - Q-network (11 → 256 → 3) and its Q-learning trainer
//! - Epsilon-greedy agent
//! - Model persistence

pub mod agent;
pub mod backend;
pub mod config;
pub mod environment;
pub mod features;
pub mod memory;
pub mod network;
pub mod persistence;
pub mod trainer;

pub use agent::QAgent;
pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use config::AgentConfig;
pub use environment::SnakeEnvironment;
pub use features::{FEATURE_DIM, FeatureVector, extract_features};
pub use memory::{ReplayMemory, Transition};
pub use network::{QNetwork, QNetworkConfig};
pub use persistence::{ModelMetadata, load_network, save_model};
pub use trainer::QTrainer;
