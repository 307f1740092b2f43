//! Snake Q - a Snake game with a Q-learning agent
//!
//! This library provides:
//! - Core game logic on a block-quantized pixel grid (game module)
//! - Feature extraction, replay memory, Q-network and trainer (rl module)
//! - Text rendering observers (render module)
//! - Training and playback loops (modes module)

pub mod config;
pub mod error;
pub mod game;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
