use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Rules and dimensions of a game. Fixed once a [`crate::GameState`] is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells
    pub board_width: i32,
    /// Board height in cells
    pub board_height: i32,

    /// Milliseconds between ticks at the start of a game
    pub initial_speed: u32,
    /// Fraction the tick interval shrinks by after each big food
    pub speed_increase: f64,
    /// Tick interval multiplier while the boost is held
    pub speed_boost_multiplier: f64,

    /// Small foods eaten before a big one spawns
    pub small_food_count: u32,
    pub small_food_growth: usize,
    pub big_food_growth: usize,
    pub small_food_score: u32,
    pub big_food_score: u32,

    pub initial_snake_length: usize,
    pub initial_snake_x: i32,
    pub initial_snake_y: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_width: 25,
            board_height: 20,
            initial_speed: 150,
            speed_increase: 0.15,
            speed_boost_multiplier: 0.5,
            small_food_count: 4,
            small_food_growth: 1,
            big_food_growth: 3,
            small_food_score: 10,
            big_food_score: 50,
            initial_snake_length: 3,
            initial_snake_x: 10,
            initial_snake_y: 10,
        }
    }
}

impl GameConfig {
    /// Default rules on a board of the given size, with the snake starting
    /// near the middle.
    pub fn with_board(width: i32, height: i32) -> Self {
        GameConfig {
            board_width: width,
            board_height: height,
            initial_snake_x: width / 2,
            initial_snake_y: height / 2,
            ..Default::default()
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml_str(&content),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(GameConfig::default()),
            Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if self.board_width <= 0 || self.board_height <= 0 {
            return invalid(format!(
                "board must be at least 1x1, got {}x{}",
                self.board_width, self.board_height
            ));
        }
        if self.initial_speed == 0 {
            return invalid("initial_speed must be positive".to_string());
        }
        if !(self.speed_increase > 0.0 && self.speed_increase < 1.0) {
            return invalid(format!("speed_increase must be in (0, 1), got {}", self.speed_increase));
        }
        if !(self.speed_boost_multiplier > 0.0 && self.speed_boost_multiplier <= 1.0) {
            return invalid(format!(
                "speed_boost_multiplier must be in (0, 1], got {}",
                self.speed_boost_multiplier
            ));
        }
        if self.small_food_count == 0 {
            return invalid("small_food_count must be positive".to_string());
        }
        if self.small_food_growth == 0 || self.big_food_growth == 0 {
            return invalid("food growth amounts must be positive".to_string());
        }
        if self.small_food_score == 0 || self.big_food_score == 0 {
            return invalid("food scores must be positive".to_string());
        }
        if self.initial_snake_length == 0 {
            return invalid("initial_snake_length must be positive".to_string());
        }

        let length = self.initial_snake_length as i64;
        if i64::from(self.board_width) <= length || i64::from(self.board_height) <= length {
            return invalid(format!(
                "board {}x{} must exceed the initial snake length {}",
                self.board_width, self.board_height, length
            ));
        }

        // The body extends to the left of the head
        let tail_x = i64::from(self.initial_snake_x) - (length - 1);
        if tail_x < 0
            || self.initial_snake_x >= self.board_width
            || self.initial_snake_y < 0
            || self.initial_snake_y >= self.board_height
        {
            return invalid(format!(
                "initial snake at ({}, {}) with length {} does not fit the board",
                self.initial_snake_x, self.initial_snake_y, length
            ));
        }

        Ok(())
    }
}
