//! Stateless collision predicates shared by the simulation and food spawning.

use crate::position::Position;

/// What ended the game.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CollisionKind {
    /// The head left the board
    Wall,
    /// The head ran into the body
    SelfCollision,
}

pub fn is_out_of_bounds(pos: Position, width: i32, height: i32) -> bool {
    pos.x < 0 || pos.x >= width || pos.y < 0 || pos.y >= height
}

/// `body` must not contain the head itself, or this is always true.
pub fn is_colliding_with_self(head: Position, body: &[Position]) -> bool {
    body.contains(&head)
}

pub fn is_colliding_with_food(pos: Position, food_pos: Position) -> bool {
    pos == food_pos
}

pub fn is_position_occupied(pos: Position, occupied: &[Position]) -> bool {
    occupied.contains(&pos)
}
