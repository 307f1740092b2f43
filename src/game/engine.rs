use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use crate::error::GameError;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the episode ended, if it did
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step: death penalty, zero, or food reward
    pub reward: i32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Score after this step
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// The engine owns no episode state; it transitions a `GameState` it is
/// handed, so the same engine can drive an environment or a test fixture.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let block = self.config.block_size;
        let head = Position::new(
            (self.config.columns() / 2) * block,
            (self.config.rows() / 2) * block,
        );

        let snake = Snake::new(
            head,
            Direction::Right,
            self.config.initial_snake_length,
            block,
        );

        let mut state = GameState::new(
            snake,
            head,
            self.config.width,
            self.config.height,
            block,
        );
        match self.spawn_food(&state) {
            Some(food) => state.food = food,
            // Unreachable for a validated config
            None => state.is_alive = false,
        }
        state
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                reward: 0,
                terminated: true,
                score: state.score,
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                },
            };
        }

        state.frame_iteration += 1;

        state.snake.direction = state.snake.direction.rotate(action);
        let new_head = state
            .snake
            .head()
            .moved_in_direction(state.snake.direction, state.block_size);
        state.snake.push_head(new_head);

        // The old tail is still in place here, so moving onto it is fatal
        let starved =
            state.frame_iteration > self.config.starvation_factor * state.snake.len() as u32;
        let collision = state
            .collision_at(new_head)
            .or(starved.then_some(CollisionType::Starvation));

        if let Some(collision_type) = collision {
            state.is_alive = false;
            return StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                score: state.score,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        let ate_food = new_head == state.food;
        let mut reward = 0;

        if ate_food {
            state.score += 1;
            reward = self.config.food_reward;
            match self.spawn_food(state) {
                Some(food) => state.food = food,
                None => {
                    // Board is full: the game is won and the episode ends
                    state.is_alive = false;
                }
            }
        } else {
            state.snake.drop_tail();
        }

        StepResult {
            reward,
            terminated: !state.is_alive,
            score: state.score,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Pick food uniformly among the free cells, or `None` if the snake
    /// covers the whole field
    fn spawn_food(&mut self, state: &GameState) -> Option<Position> {
        state.free_cells().choose(&mut self.rng).copied()
    }
}
