use log::{trace, warn};

use super::features::{FeatureVector, extract_features};
use crate::error::GameError;
use crate::game::{Action, GameConfig, GameEngine, GameState, Position, StepResult};
use crate::render::Renderer;

/// Snake environment for reinforcement learning
///
/// Wraps the game engine with the current episode state and provides the
/// standard RL interface (reset, step) over the 3 relative actions. A
/// [`Renderer`] may be attached; it sees every state after reset and step.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
    renderer: Option<Box<dyn Renderer>>,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut engine = GameEngine::new(config)?;
        let state = engine.reset();
        Ok(Self {
            engine,
            state,
            renderer: None,
        })
    }

    /// Attach a renderer that observes every subsequent transition
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Start a new episode and return its features
    pub fn reset(&mut self) -> FeatureVector {
        self.state = self.engine.reset();
        self.notify_renderer();
        self.features()
    }

    /// Advance one frame
    ///
    /// Once the episode has terminated the state no longer changes and every
    /// further step reports `terminated` with zero reward until [`reset`](Self::reset).
    pub fn step(&mut self, action: Action) -> StepResult {
        let result = self.engine.step(&mut self.state, action);
        trace!(
            "frame {}: {:?} -> reward {} score {}",
            self.state.frame_iteration, action, result.reward, result.score
        );
        self.notify_renderer();
        result
    }

    /// Features of the current state
    pub fn features(&self) -> FeatureVector {
        extract_features(&self.state)
    }

    /// Lookahead probe: would the snake die at `point`?
    pub fn is_collision(&self, point: Position) -> bool {
        self.state.is_collision(point)
    }

    /// Get reference to the current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    fn notify_renderer(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(e) = renderer.render(&self.state) {
                warn!("renderer failed: {}", e);
            }
        }
    }
}
