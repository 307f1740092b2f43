pub mod play;
pub mod train;

pub use play::PlayMode;
pub use train::{EpisodeOutcome, TrainConfig, TrainMode};
