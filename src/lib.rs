//! A grid snake game.
//!
//! The simulation lives in [`GameState`] and its building blocks ([`Snake`],
//! [`Food`], [`collision`]) and does no I/O. [`game::TerminalGame`] is a
//! crossterm front end that drives it.

pub mod collision;
pub mod config;
pub mod direction;
pub mod food;
pub mod game;
pub mod input;
pub mod position;
pub mod snake;
pub mod state;
pub mod term;

pub use collision::CollisionKind;
pub use config::{ConfigError, GameConfig};
pub use direction::Direction;
pub use food::{Food, FoodKind};
pub use position::Position;
pub use snake::Snake;
pub use state::{GameState, GameStatus, TickOutcome, MAX_SPAWN_ATTEMPTS};

pub type TermInt = u16;
pub type Coords = (u16, u16);
