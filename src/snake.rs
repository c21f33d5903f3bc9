use crate::direction::Direction::{self, *};
use crate::position::Position;

/// The player's snake. `body[0]` is the head, the last element is the tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
    direction: Direction,
}

impl Snake {
    /// Builds a snake facing right whose body extends to the left of `head`.
    /// A `length` of zero is treated as one.
    pub fn new(head: Position, length: usize) -> Self {
        let back = Right.opposite().vector();
        let mut body = Vec::with_capacity(length.max(1));
        let mut pos = head;

        for _ in 0..length.max(1) {
            body.push(pos);
            pos = pos + back;
        }

        Snake { body, direction: Right }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn body_without_head(&self) -> &[Position] {
        &self.body[1..]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false, the body is never empty.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Turns the snake. Reversals are dropped silently; otherwise the last call
    /// before the next move wins.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if !self.direction.is_opposite(new_direction) {
            self.direction = new_direction;
        }
    }

    /// Advances one cell in the current direction. The tail is kept when
    /// `grow` is set, otherwise it is dropped and the length is unchanged.
    pub fn move_step(&mut self, grow: bool) {
        let new_head = self.head() + self.direction.vector();
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Appends `amount` copies of the current tail cell. The copies unfold as
    /// the snake keeps moving.
    pub fn grow(&mut self, amount: usize) {
        let tail = self.tail();
        self.body.extend(std::iter::repeat(tail).take(amount));
    }

    /// Character used by the terminal host to draw the head.
    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
