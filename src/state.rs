use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{self, CollisionKind};
use crate::config::GameConfig;
use crate::direction::Direction;
use crate::food::{Food, FoodKind};
use crate::position::Position;
use crate::snake::Snake;

/// Upper bound on random draws when looking for a free cell for food.
pub const MAX_SPAWN_ATTEMPTS: u32 = 1000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    /// Reset, waiting for `start`
    Idle,
    Running,
    Paused,
    Over,
}

/// What a call to [`GameState::update`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed
    Skipped,
    Moved,
    Ate(FoodKind),
    Crashed(CollisionKind),
}

/// A single game: the snake, the food on the board, and the score and speed
/// progression. Driven one tick at a time by a host calling [`update`].
///
/// [`update`]: GameState::update
#[derive(Debug, Clone)]
pub struct GameState<R = StdRng> {
    config: GameConfig,
    rng: R,
    snake: Snake,
    food: Food,
    score: u32,
    speed: u32,
    speed_boost_active: bool,
    small_food_count: u32,
    status: GameStatus,
}

impl GameState<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        GameState::with_rng(config, StdRng::from_entropy())
    }

    /// Same seed and same inputs give the same game.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        GameState::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// # Panics
    ///
    /// If the board has no cells. Use [`GameConfig::validate`] on untrusted configs.
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let snake = initial_snake(&config);
        let placeholder = Food::new(snake.head(), FoodKind::Small);
        let mut state = GameState {
            speed: config.initial_speed,
            config,
            rng,
            snake,
            food: placeholder,
            score: 0,
            speed_boost_active: false,
            small_food_count: 0,
            status: GameStatus::Idle,
        };
        state.reset();
        state
    }

    /// Back to a fresh idle game: new snake, new small food, score and speed
    /// progression cleared. Allowed from any state.
    pub fn reset(&mut self) {
        self.snake = initial_snake(&self.config);
        self.food = self.spawn_food(FoodKind::Small);
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.speed_boost_active = false;
        self.small_food_count = 0;
        self.set_status(GameStatus::Idle);
    }

    pub fn start(&mut self) {
        if self.status == GameStatus::Idle {
            self.set_status(GameStatus::Running);
        }
    }

    pub fn pause(&mut self) {
        if self.status == GameStatus::Running {
            self.set_status(GameStatus::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.status == GameStatus::Paused {
            self.set_status(GameStatus::Running);
        }
    }

    /// Ends a running or paused game without a collision.
    pub fn end_game(&mut self) {
        if matches!(self.status, GameStatus::Running | GameStatus::Paused) {
            info!("Game ended early, score {}", self.score);
            self.set_status(GameStatus::Over);
        }
    }

    /// Forwards a turn to the snake. Ignored unless the game is running.
    pub fn change_direction(&mut self, direction: Direction) {
        if self.status == GameStatus::Running {
            self.snake.set_direction(direction);
        }
    }

    pub fn enable_speed_boost(&mut self) {
        self.speed_boost_active = true;
    }

    pub fn disable_speed_boost(&mut self) {
        self.speed_boost_active = false;
    }

    /// Advances the simulation by one tick.
    pub fn update(&mut self) -> TickOutcome {
        if self.status != GameStatus::Running {
            return TickOutcome::Skipped;
        }

        self.snake.move_step(false);
        let head = self.snake.head();

        if collision::is_out_of_bounds(head, self.config.board_width, self.config.board_height) {
            return self.crash(CollisionKind::Wall);
        }

        if collision::is_colliding_with_self(head, self.snake.body_without_head()) {
            return self.crash(CollisionKind::SelfCollision);
        }

        if collision::is_colliding_with_food(head, self.food.position()) {
            let kind = self.food.kind();
            self.consume_food();
            return TickOutcome::Ate(kind);
        }

        TickOutcome::Moved
    }

    /// Applies the effects of eating the current food and replaces it. Called
    /// by `update` when the head lands on the food.
    pub fn consume_food(&mut self) {
        self.score = self.score.saturating_add(self.food.value(&self.config));
        self.snake.grow(self.food.growth_amount(&self.config));

        let next = if self.food.is_big() {
            let faster = (f64::from(self.speed) * (1.0 - self.config.speed_increase)).floor();
            self.speed = (faster as u32).max(1);
            self.small_food_count = 0;
            debug!("Big food eaten, speed now {}ms", self.speed);
            FoodKind::Small
        } else {
            self.small_food_count += 1;
            if self.small_food_count >= self.config.small_food_count {
                self.small_food_count = 0;
                FoodKind::Big
            } else {
                FoodKind::Small
            }
        };

        self.food = self.spawn_food(next);
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Base tick interval in milliseconds, ignoring the boost.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Tick interval in milliseconds with the boost applied.
    pub fn effective_speed(&self) -> f64 {
        if self.speed_boost_active {
            f64::from(self.speed) * self.config.speed_boost_multiplier
        } else {
            f64::from(self.speed)
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros((self.effective_speed() * 1000.0).round() as u64)
    }

    pub fn is_speed_boost_active(&self) -> bool {
        self.speed_boost_active
    }

    pub fn small_food_count(&self) -> u32 {
        self.small_food_count
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_idle(&self) -> bool {
        self.status == GameStatus::Idle
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn is_paused(&self) -> bool {
        self.status == GameStatus::Paused
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    pub fn board_width(&self) -> i32 {
        self.config.board_width
    }

    pub fn board_height(&self) -> i32 {
        self.config.board_height
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    ///////////////////////////////////////////////////////////////////////////

    fn crash(&mut self, kind: CollisionKind) -> TickOutcome {
        info!(
            "Game over ({:?}) at {}, score {}, length {}",
            kind,
            self.snake.head(),
            self.score,
            self.snake.len()
        );
        self.set_status(GameStatus::Over);
        TickOutcome::Crashed(kind)
    }

    fn set_status(&mut self, status: GameStatus) {
        if self.status != status {
            debug!("Game state {:?} -> {:?}", self.status, status);
        }
        self.status = status;
    }

    /// Rejection-samples a cell not covered by the snake. After
    /// `MAX_SPAWN_ATTEMPTS` misses the last drawn cell is used even if the
    /// snake covers it.
    fn spawn_food(&mut self, kind: FoodKind) -> Food {
        let occupied = self.snake.body();
        let mut pos = random_cell(&mut self.rng, &self.config);
        let mut attempts = 1;

        while collision::is_position_occupied(pos, occupied) && attempts < MAX_SPAWN_ATTEMPTS {
            pos = random_cell(&mut self.rng, &self.config);
            attempts += 1;
        }

        if collision::is_position_occupied(pos, occupied) {
            warn!(
                "No free cell found for food after {} attempts, placing it on the snake at {}",
                attempts, pos
            );
        } else {
            debug!("Spawned {:?} food at {}", kind, pos);
        }

        Food::new(pos, kind)
    }
}

fn random_cell<R: Rng>(rng: &mut R, config: &GameConfig) -> Position {
    Position::new(
        rng.gen_range(0..config.board_width),
        rng.gen_range(0..config.board_height),
    )
}

fn initial_snake(config: &GameConfig) -> Snake {
    Snake::new(
        Position::new(config.initial_snake_x, config.initial_snake_y),
        config.initial_snake_length,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction::*;

    fn new_game() -> GameState {
        GameState::with_seed(GameConfig::default(), 42)
    }

    fn running_game() -> GameState {
        let mut game = new_game();
        game.start();
        game
    }

    #[test]
    fn test_initial_state() {
        let game = new_game();
        assert!(game.is_idle());
        assert!(!game.is_running());
        assert!(!game.is_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.small_food_count(), 0);
        assert_eq!(game.speed(), 150);
        assert_eq!(game.head(), Position::new(10, 10));
        assert_eq!(game.direction(), Right);
        assert_eq!(game.snake().len(), 3);
        assert!(!game.food().is_big());
        assert!(!game.snake().body().contains(&game.food().position()));
    }

    #[test]
    fn test_state_transitions() {
        let mut game = new_game();

        game.pause();
        assert!(game.is_idle());
        game.resume();
        assert!(game.is_idle());

        game.start();
        assert!(game.is_running());
        game.pause();
        assert!(game.is_paused());
        game.start();
        assert!(game.is_paused());
        game.resume();
        assert!(game.is_running());

        game.end_game();
        assert!(game.is_over());
        game.pause();
        game.resume();
        game.start();
        assert!(game.is_over());

        game.reset();
        assert!(game.is_idle());
    }

    #[test]
    fn test_update_is_noop_unless_running() {
        let mut idle = new_game();
        let mut paused = running_game();
        paused.pause();
        let mut over = running_game();
        over.end_game();

        for game in [&mut idle, &mut paused, &mut over] {
            let head = game.head();
            let food = *game.food();
            let status = game.status();

            assert_eq!(game.update(), TickOutcome::Skipped);

            assert_eq!(game.head(), head);
            assert_eq!(*game.food(), food);
            assert_eq!(game.score(), 0);
            assert_eq!(game.status(), status);
        }
    }

    #[test]
    fn test_change_direction_only_while_running() {
        let mut game = new_game();
        game.change_direction(Up);
        assert_eq!(game.direction(), Right);

        game.start();
        game.pause();
        game.change_direction(Up);
        assert_eq!(game.direction(), Right);

        game.resume();
        game.change_direction(Up);
        assert_eq!(game.direction(), Up);

        game.end_game();
        game.change_direction(Left);
        assert_eq!(game.direction(), Up);
    }

    #[test]
    fn test_update_moves_head() {
        let mut game = running_game();
        game.food.set_position(Position::new(0, 0));

        assert_eq!(game.update(), TickOutcome::Moved);
        assert_eq!(game.head(), Position::new(11, 10));
        assert_eq!(game.snake().len(), 3);
    }

    #[test]
    fn test_eating_food_in_front() {
        let mut game = running_game();
        game.food = Food::new(Position::new(11, 10), FoodKind::Small);

        assert_eq!(game.update(), TickOutcome::Ate(FoodKind::Small));
        assert_eq!(game.score(), 10);
        assert_eq!(game.small_food_count(), 1);
        assert_eq!(game.snake().len(), 4);
        assert_ne!(game.food().position(), Position::new(11, 10));
    }

    #[test]
    fn test_eating_big_food_in_front() {
        let mut game = running_game();
        game.food = Food::new(Position::new(11, 10), FoodKind::Big);

        assert_eq!(game.update(), TickOutcome::Ate(FoodKind::Big));
        assert_eq!(game.speed(), 127);
        assert_eq!(game.score(), 50);
        assert_eq!(game.snake().len(), 6);
        assert!(!game.food().is_big());
    }

    #[test]
    fn test_score_saturates() {
        let config = GameConfig {
            small_food_score: u32::MAX,
            ..GameConfig::default()
        };
        config.validate().unwrap();
        let mut game = GameState::with_seed(config, 5);
        game.start();

        game.consume_food();
        game.consume_food();
        assert_eq!(game.score(), u32::MAX);
    }

    #[test]
    fn test_small_food_cycle() {
        let mut game = running_game();

        for eaten in 1..=3 {
            assert!(!game.food().is_big());
            game.consume_food();
            assert_eq!(game.small_food_count(), eaten);
        }

        game.consume_food();
        assert_eq!(game.small_food_count(), 0);
        assert!(game.food().is_big());
        assert_eq!(game.score(), 40);
        assert_eq!(game.snake().len(), 7);
    }

    #[test]
    fn test_big_food_speeds_up() {
        let mut game = running_game();
        game.food.set_kind(FoodKind::Big);

        game.consume_food();

        assert_eq!(game.speed(), 127);
        assert_eq!(game.score(), 50);
        assert_eq!(game.snake().len(), 6);
        assert_eq!(game.small_food_count(), 0);
        assert!(!game.food().is_big());
    }

    #[test]
    fn test_speed_never_reaches_zero() {
        let config = GameConfig {
            initial_speed: 1,
            ..GameConfig::default()
        };
        let mut game = GameState::with_seed(config, 1);
        game.food.set_kind(FoodKind::Big);
        game.consume_food();
        assert_eq!(game.speed(), 1);
    }

    #[test]
    fn test_speed_boost_is_read_time_only() {
        let mut game = running_game();
        let before = game.effective_speed();

        game.enable_speed_boost();
        assert_eq!(game.effective_speed(), 75.0);
        assert_eq!(game.speed(), 150);
        assert_eq!(game.tick_interval(), Duration::from_millis(75));

        game.disable_speed_boost();
        assert_eq!(game.effective_speed(), before);
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut game = running_game();
        game.change_direction(Up);

        for _ in 0..10 {
            assert_ne!(game.update(), TickOutcome::Crashed(CollisionKind::Wall));
        }
        assert_eq!(game.head().y, 0);

        assert_eq!(game.update(), TickOutcome::Crashed(CollisionKind::Wall));
        assert!(game.is_over());
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut game = running_game();
        game.snake.grow(2);
        game.food.set_position(Position::new(0, 0));

        game.change_direction(Down);
        assert_eq!(game.update(), TickOutcome::Moved);
        game.change_direction(Left);
        assert_eq!(game.update(), TickOutcome::Moved);
        game.change_direction(Up);
        assert_eq!(game.update(), TickOutcome::Crashed(CollisionKind::SelfCollision));
        assert!(game.is_over());
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut game = running_game();
        game.food.set_kind(FoodKind::Big);
        game.consume_food();
        game.consume_food();
        game.enable_speed_boost();
        game.change_direction(Down);
        game.update();

        game.reset();

        assert!(game.is_idle());
        assert_eq!(game.score(), 0);
        assert_eq!(game.speed(), 150);
        assert_eq!(game.small_food_count(), 0);
        assert!(!game.is_speed_boost_active());
        assert_eq!(game.head(), Position::new(10, 10));
        assert_eq!(game.direction(), Right);
        assert_eq!(game.snake().len(), 3);
        assert!(!game.food().is_big());
    }

    #[test]
    fn test_full_board_falls_back_to_occupied_cell() {
        // The snake covers every cell of a 3x1 board
        let config = GameConfig {
            board_width: 3,
            board_height: 1,
            initial_snake_length: 3,
            initial_snake_x: 2,
            initial_snake_y: 0,
            ..GameConfig::default()
        };
        let mut game = GameState::with_seed(config, 7);
        assert!(game.snake().body().contains(&game.food().position()));

        let food = game.spawn_food(FoodKind::Small);
        assert!(game.snake().body().contains(&food.position()));
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameState::with_seed(GameConfig::default(), 9);
        let b = GameState::with_seed(GameConfig::default(), 9);
        assert_eq!(a.food(), b.food());
    }
}
