use super::action::Direction;

/// A position on the playing field, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one block in a direction
    pub fn moved_in_direction(&self, direction: Direction, block_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * block_size, dy * block_size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with the head at `head` and the body trailing
    /// behind it, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize, block_size: i32) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx * block_size, -dy * block_size);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Prepend a new head. The tail stays until `drop_tail` is called.
    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    pub fn drop_tail(&mut self) {
        self.body.pop();
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Frame budget exhausted without dying
    Starvation,
}

/// Complete state of one episode
///
/// Exposes read-only accessors so observers (renderers, featurizers) never
/// need to touch simulation internals.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
    pub score: u32,
    pub frame_iteration: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, width: i32, height: i32, block_size: i32) -> Self {
        Self {
            snake,
            food,
            width,
            height,
            block_size,
            score: 0,
            frame_iteration: 0,
            is_alive: true,
        }
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn body(&self) -> &[Position] {
        &self.snake.body
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Check if a position is within the field: `[0, width - block] x [0, height - block]`
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x <= self.width - self.block_size
            && pos.y >= 0
            && pos.y <= self.height - self.block_size
    }

    /// Check if a position is occupied by any snake segment, head included
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    /// True if `point` is out of bounds or overlaps a body segment other than
    /// the head. Pure; used both by the engine and for lookahead probes.
    pub fn is_collision(&self, point: Position) -> bool {
        self.collision_at(point).is_some()
    }

    pub(crate) fn collision_at(&self, point: Position) -> Option<CollisionType> {
        if !self.is_in_bounds(point) {
            return Some(CollisionType::Wall);
        }
        if self.snake.collides_with_body(point) {
            return Some(CollisionType::SelfCollision);
        }
        None
    }

    /// All block-aligned cells not covered by the snake
    pub fn free_cells(&self) -> Vec<Position> {
        let columns = self.width / self.block_size;
        let rows = self.height / self.block_size;
        let mut cells = Vec::with_capacity((columns * rows).max(0) as usize);
        for row in 0..rows {
            for col in 0..columns {
                let pos = Position::new(col * self.block_size, row * self.block_size);
                if !self.is_occupied_by_snake(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }
}
