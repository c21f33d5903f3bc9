use serde::{Deserialize, Serialize};

use crate::position::Position;
use Direction::*;

/// One of the four cardinal directions the snake can travel in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    /// Unit displacement for one step in this direction. `y` grows downwards.
    pub const fn vector(self) -> Position {
        match self {
            Up => Position::new(0, -1),
            Down => Position::new(0, 1),
            Left => Position::new(-1, 0),
            Right => Position::new(1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// True when turning from `self` to `other` would be a 180 degree reversal.
    pub fn is_opposite(self, other: Direction) -> bool {
        let (a, b) = (self.vector(), other.vector());
        a.x == -b.x && a.y == -b.y
    }
}
