use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::position::Position;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Small,
    Big,
}

/// A piece of food on the board. Score and growth are derived from the kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Food {
    position: Position,
    kind: FoodKind,
}

impl Food {
    pub fn new(position: Position, kind: FoodKind) -> Self {
        Food { position, kind }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> FoodKind {
        self.kind
    }

    pub fn is_big(&self) -> bool {
        self.kind == FoodKind::Big
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn set_kind(&mut self, kind: FoodKind) {
        self.kind = kind;
    }

    /// Points awarded for eating this food.
    pub fn value(&self, config: &GameConfig) -> u32 {
        match self.kind {
            FoodKind::Small => config.small_food_score,
            FoodKind::Big => config.big_food_score,
        }
    }

    /// Segments the snake gains from eating this food.
    pub fn growth_amount(&self, config: &GameConfig) -> usize {
        match self.kind {
            FoodKind::Small => config.small_food_growth,
            FoodKind::Big => config.big_food_growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_food_properties() {
        let config = GameConfig::default();
        let food = Food::new(Position::new(3, 4), FoodKind::Small);
        assert!(!food.is_big());
        assert_eq!(food.position(), Position::new(3, 4));
        assert_eq!(food.value(&config), 10);
        assert_eq!(food.growth_amount(&config), 1);
    }

    #[test]
    fn test_big_food_properties() {
        let config = GameConfig::default();
        let food = Food::new(Position::new(0, 0), FoodKind::Big);
        assert!(food.is_big());
        assert_eq!(food.value(&config), 50);
        assert_eq!(food.growth_amount(&config), 3);
    }

    #[test]
    fn test_values_follow_config() {
        let config = GameConfig {
            small_food_score: 7,
            big_food_growth: 5,
            ..GameConfig::default()
        };
        assert_eq!(Food::new(Position::new(0, 0), FoodKind::Small).value(&config), 7);
        assert_eq!(Food::new(Position::new(0, 0), FoodKind::Big).growth_amount(&config), 5);
    }

    #[test]
    fn test_mutators() {
        let mut food = Food::new(Position::new(1, 1), FoodKind::Small);
        food.set_position(Position::new(7, 2));
        food.set_kind(FoodKind::Big);
        assert_eq!(food.position(), Position::new(7, 2));
        assert_eq!(food.kind(), FoodKind::Big);
    }
}
