//! State featurization for the Q-network
//!
//! The network never sees the grid. It sees 11 binary features describing the
//! immediate surroundings of the head:
//!
//! ```text
//! [0..3)  danger straight, danger right, danger left
//! [3..7)  direction one-hot: left, right, up, down
//! [7..11) food is left, right, above, below the head
//! ```

use burn::tensor::{backend::Backend, Tensor, TensorData};

use crate::game::{Direction, GameState};

/// Number of features produced by [`extract_features`]
pub const FEATURE_DIM: usize = 11;

/// Binary feature vector derived from a game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureVector(pub [u8; FEATURE_DIM]);

impl FeatureVector {
    pub fn as_array(&self) -> &[u8; FEATURE_DIM] {
        &self.0
    }

    pub fn to_f32(&self) -> [f32; FEATURE_DIM] {
        self.0.map(f32::from)
    }
}

/// Compute the feature vector for `state`
///
/// Danger probes go through [`GameState::is_collision`] at the cell one block
/// ahead after the same rotation the engine would apply, so "danger right"
/// means exactly "TurnRight would kill the snake now".
pub fn extract_features(state: &GameState) -> FeatureVector {
    let head = state.head();
    let direction = state.direction();
    let block = state.block_size;
    let danger = |d: Direction| state.is_collision(head.moved_in_direction(d, block));

    let food = state.food;
    let flags = [
        danger(direction),
        danger(direction.turn_right()),
        danger(direction.turn_left()),
        direction == Direction::Left,
        direction == Direction::Right,
        direction == Direction::Up,
        direction == Direction::Down,
        food.x < head.x,
        food.x > head.x,
        food.y < head.y,
        food.y > head.y,
    ];

    FeatureVector(flags.map(u8::from))
}

/// Stack feature vectors into a `[batch, FEATURE_DIM]` tensor
pub fn features_to_tensor<B: Backend>(
    features: &[FeatureVector],
    device: &B::Device,
) -> Tensor<B, 2> {
    let data: Vec<f32> = features.iter().flat_map(|f| f.to_f32()).collect();
    Tensor::from_data(TensorData::new(data, [features.len(), FEATURE_DIM]), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Snake};
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;

    type TestBackend = NdArray<f32>;

    fn state(head: Position, direction: Direction, food: Position) -> GameState {
        let snake = Snake::new(head, direction, 3, 20);
        GameState::new(snake, food, 640, 480, 20)
    }

    #[test]
    fn test_open_field_moving_right() {
        let s = state(Position::new(320, 240), Direction::Right, Position::new(400, 100));
        let f = extract_features(&s);

        assert_eq!(
            f.0,
            [
                0, 0, 0, // no danger
                0, 1, 0, 0, // moving right
                0, 1, 1, 0, // food right and above
            ]
        );
    }

    #[test]
    fn test_danger_straight_at_wall() {
        let s = state(Position::new(620, 240), Direction::Right, Position::new(0, 0));
        let f = extract_features(&s);
        assert_eq!(&f.0[0..3], &[1, 0, 0]);
    }

    #[test]
    fn test_danger_matches_engine_rotation() {
        // Moving up along the left wall: turning left would exit the field
        let s = state(Position::new(0, 240), Direction::Up, Position::new(0, 0));
        let f = extract_features(&s);
        assert_eq!(&f.0[0..3], &[0, 0, 1]);
        assert_eq!(&f.0[3..7], &[0, 0, 1, 0]);

        // Moving down along the left wall: turning right would exit the field
        let s = state(Position::new(0, 240), Direction::Down, Position::new(0, 0));
        let f = extract_features(&s);
        assert_eq!(&f.0[0..3], &[0, 1, 0]);
    }

    #[test]
    fn test_danger_from_own_body() {
        // Body curls below the head; turning right (down) from Right hits it
        let mut s = state(Position::new(320, 240), Direction::Right, Position::new(0, 0));
        s.snake.body = vec![
            Position::new(320, 240),
            Position::new(300, 240),
            Position::new(300, 260),
            Position::new(320, 260),
            Position::new(340, 260),
        ];
        let f = extract_features(&s);
        assert_eq!(&f.0[0..3], &[0, 1, 0]);
    }

    #[test]
    fn test_corner_danger_all_sides() {
        // Top-left corner heading up: straight and left are walls
        let s = state(Position::new(0, 0), Direction::Up, Position::new(100, 100));
        let f = extract_features(&s);
        assert_eq!(&f.0[0..3], &[1, 0, 1]);
        assert_eq!(&f.0[7..11], &[0, 1, 0, 1]);
    }

    #[test]
    fn test_direction_one_hot_is_exclusive() {
        for dir in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            let s = state(Position::new(320, 240), dir, Position::new(0, 0));
            let f = extract_features(&s);
            let sum: u8 = f.0[3..7].iter().sum();
            assert_eq!(sum, 1);
        }
    }

    #[test]
    fn test_features_are_binary() {
        let s = state(Position::new(320, 240), Direction::Right, Position::new(320, 240));
        let f = extract_features(&s);
        assert!(f.0.iter().all(|&v| v <= 1));
        // Food on the head gives no direction flags
        assert_eq!(&f.0[7..11], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_features_to_tensor_shape() {
        let device = NdArrayDevice::default();
        let s = state(Position::new(320, 240), Direction::Right, Position::new(400, 100));
        let f = extract_features(&s);

        let tensor = features_to_tensor::<TestBackend>(&[f, f, f], &device);
        assert_eq!(tensor.dims(), [3, FEATURE_DIM]);

        let data = tensor.into_data();
        let values = data.as_slice::<f32>().unwrap();
        assert_eq!(&values[..FEATURE_DIM], &f.to_f32());
    }
}
