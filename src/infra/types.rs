/// Simulation round, counted from the current turn (round 0 is "now").
pub type Round = u32;

/// Player / bomb owner id as sent by the game.
pub type PlayerId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Axis neighbours, indexed by `Direction::index`.
    pub fn neighbors(&self) -> [Position; 4] {
        [
            Position::new(self.x - 1, self.y), // Left
            Position::new(self.x, self.y + 1), // Down
            Position::new(self.x + 1, self.y), // Right
            Position::new(self.x, self.y - 1), // Up
        ]
    }

    pub fn step(&self, direction: Direction) -> Position {
        self.neighbors()[direction.index()]
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.distance(other) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// Blast / movement direction. The discriminant order matches `Position::neighbors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Down,
    Right,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}
