use crate::error::GameError;

/// Clockwise order used for relative turning.
const CLOCKWISE: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::Left,
    Direction::Up,
];

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Next direction in clockwise order (Right -> Down -> Left -> Up)
    pub fn turn_right(&self) -> Direction {
        CLOCKWISE[(self.clockwise_index() + 1) % 4]
    }

    /// Next direction in counter-clockwise order (Right -> Up -> Left -> Down)
    pub fn turn_left(&self) -> Direction {
        CLOCKWISE[(self.clockwise_index() + 3) % 4]
    }

    /// Direction after applying a relative action
    pub fn rotate(&self, action: Action) -> Direction {
        match action {
            Action::Straight => *self,
            Action::TurnRight => self.turn_right(),
            Action::TurnLeft => self.turn_left(),
        }
    }

    /// Returns the unit delta (dx, dy) for moving in this direction.
    /// Screen coordinates: y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Relative move chosen by the agent. There is no reverse move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Straight,
    TurnRight,
    TurnLeft,
}

impl Action {
    /// Number of distinct actions
    pub const COUNT: usize = 3;

    pub const ALL: [Action; 3] = [Action::Straight, Action::TurnRight, Action::TurnLeft];

    /// Index of this action in the network output
    pub fn index(&self) -> usize {
        match self {
            Action::Straight => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }

    pub fn from_index(idx: usize) -> Result<Self, GameError> {
        Action::ALL
            .get(idx)
            .copied()
            .ok_or(GameError::InvalidActionIndex(idx))
    }

    /// One-hot encoding: `[1,0,0]` straight, `[0,1,0]` right, `[0,0,1]` left
    pub fn one_hot(&self) -> [f32; 3] {
        let mut v = [0.0; 3];
        v[self.index()] = 1.0;
        v
    }
}

impl TryFrom<&[f32]> for Action {
    type Error = GameError;

    /// Decode a one-hot action vector. Anything other than exactly one `1.0`
    /// among three zeros is rejected.
    fn try_from(v: &[f32]) -> Result<Self, Self::Error> {
        let invalid = || GameError::InvalidAction(v.to_vec());
        if v.len() != Action::COUNT {
            return Err(invalid());
        }
        let hot: Vec<usize> = v
            .iter()
            .enumerate()
            .filter(|&(_, &x)| x == 1.0)
            .map(|(i, _)| i)
            .collect();
        let zeros = v.iter().filter(|&&x| x == 0.0).count();
        match hot.as_slice() {
            [idx] if zeros == Action::COUNT - 1 => Action::from_index(*idx),
            _ => Err(invalid()),
        }
    }
}
