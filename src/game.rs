use std::{thread::sleep, time::{Duration, Instant}};

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyEvent, KeyEventKind};
use crossterm::style::Color;
use log::{debug, info};

use crate::collision;
use crate::input::{HeldKeys, KeyAction, HOLD_TIMEOUT};
use crate::state::{GameState, TickOutcome};
use crate::{Coords, Position, TermInt};
use crate::term::TermManager;

const POLL_INTERVAL_MS: u64 = 5;

const SNAKE_BODY_CHAR: char = '█';
const SMALL_FOOD_CHAR: char = 'o';
const BIG_FOOD_CHAR: char = '@';
const DEAD_SNAKE_CHAR: char = 'X';

/// Board cells are two columns wide so the board looks square.
const CELL_WIDTH: TermInt = 2;

enum Flow {
    Restart,
    Quit,
}

/// Terminal front end: feeds keys into a [`GameState`], calls `update` at the
/// game's tick interval and draws the result.
pub struct TerminalGame {
    state: GameState,
    term: TermManager,
    held: HeldKeys,
    origin: Coords,
}

impl TerminalGame {
    pub fn new(state: GameState) -> Result<Self> {
        let term = TermManager::new().context("Failed to query terminal size")?;
        let (width, height) = term.get_terminal_size();

        let needed_w = state.board_width() as u32 * CELL_WIDTH as u32 + 2;
        let needed_h = state.board_height() as u32 + 3;
        if u32::from(width) < needed_w || u32::from(height) < needed_h {
            bail!(
                "terminal is {}x{}, a {}x{} board needs at least {}x{}",
                width, height, state.board_width(), state.board_height(), needed_w, needed_h
            );
        }

        // Centre the board, leaving the first row of the frame for the HUD
        let origin = (
            (width - needed_w as TermInt) / 2 + 1,
            (height - needed_h as TermInt) / 2 + 2,
        );

        Ok(TerminalGame { state, term, held: HeldKeys::new(false, HOLD_TIMEOUT), origin })
    }

    /// Takes over the terminal until the player quits. The terminal is
    /// restored even when the game loop fails.
    pub fn run(&mut self) -> Result<()> {
        if let Err(err) = self.term.setup() {
            // Undo whatever part of the setup went through
            let _ = self.term.restore();
            return Err(err).context("Failed to set up terminal");
        }
        self.held = HeldKeys::new(self.term.reports_key_release(), HOLD_TIMEOUT);

        let result = self.run_loop();
        let restored = self.term.restore().context("Failed to restore terminal");

        result?;
        restored
    }

    fn run_loop(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        loop {
            match self.play()? {
                Flow::Restart => info!("Restarting"),
                Flow::Quit => return Ok(()),
            }
        }
    }

    /// False when the player quit from the intro screen.
    fn show_intro(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Hold a direction to speed up",
            "Space or P to pause",
            "Esc, Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;
        Ok(KeyAction::from_key(&key) != KeyAction::Quit)
    }

    fn play(&mut self) -> Result<Flow> {
        self.state.reset();
        self.held.clear();
        self.state.start();

        self.term.clear()?;
        self.draw_frame()?;
        self.draw_board()?;

        let mut last_tick = Instant::now();

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));
            let now = Instant::now();

            for key_ev in self.term.read_key_events_queue()? {
                if let Some(flow) = self.handle_key(key_ev, now)? {
                    return Ok(flow);
                }
            }

            self.held.expire(now);
            if !self.held.is_boosting() {
                self.state.disable_speed_boost();
            }

            if !self.state.is_running() {
                // Don't let the time spent paused count towards the next tick
                last_tick = now;
                continue;
            }

            if now.duration_since(last_tick) < self.state.tick_interval() {
                continue;
            }
            last_tick = now;

            match self.state.update() {
                TickOutcome::Crashed(kind) => {
                    debug!("Crashed: {:?}", kind);
                    self.draw_board()?;
                    return self.game_over();
                }
                TickOutcome::Ate(kind) => {
                    debug!("Ate {:?} food, score {}", kind, self.state.score());
                    self.draw_board()?;
                }
                TickOutcome::Moved | TickOutcome::Skipped => self.draw_board()?,
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Result<Option<Flow>> {
        if key.kind == KeyEventKind::Release {
            self.held.release(key.code);
            return Ok(None);
        }

        match KeyAction::from_key(&key) {
            KeyAction::Turn(direction) => {
                self.held.press(key.code, now);
                if self.state.is_running() && self.held.is_boosting() {
                    self.state.enable_speed_boost();
                }
                self.state.change_direction(direction);
            }
            KeyAction::TogglePause => self.toggle_pause()?,
            KeyAction::Quit => {
                self.state.end_game();
                return Ok(Some(Flow::Quit));
            }
            KeyAction::Restart | KeyAction::None => {}
        }

        Ok(None)
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if self.state.is_paused() {
            self.state.resume();
            self.term.hide_message()?;
        } else if self.state.is_running() {
            self.state.pause();
            self.term.show_message(&["Paused", "Press Space to resume", "or Esc to quit"])?;
        }
        Ok(())
    }

    fn game_over(&mut self) -> Result<Flow> {
        let body = self.state.snake().body().to_vec();
        for pos in body {
            self.print_cell(pos, DEAD_SNAKE_CHAR, Color::Red)?;
        }

        let score = format!("Final score: {}", self.state.score());
        let length = format!("Length: {}", self.state.snake().len());
        self.term.show_message(&[
            "Game over!",
            &score,
            &length,
            "",
            "Press R or Enter to play again,",
            "or Esc to quit.",
        ])?;

        loop {
            match KeyAction::from_key(&self.term.read_key_blocking()?) {
                KeyAction::Restart => return Ok(Flow::Restart),
                KeyAction::Quit => return Ok(Flow::Quit),
                _ => {}
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_frame(&mut self) -> Result<()> {
        let width = self.state.board_width() as TermInt * CELL_WIDTH + 2;
        let height = self.state.board_height() as TermInt + 2;
        self.term.draw_box((self.origin.0 - 1, self.origin.1 - 1), width, height)?;
        Ok(())
    }

    fn draw_board(&mut self) -> Result<()> {
        for y in 0..self.state.board_height() {
            for x in 0..self.state.board_width() {
                self.print_cell(Position::new(x, y), ' ', Color::Reset)?;
            }
        }

        let food = *self.state.food();
        if food.is_big() {
            self.print_cell(food.position(), BIG_FOOD_CHAR, Color::Red)?;
        } else {
            self.print_cell(food.position(), SMALL_FOOD_CHAR, Color::Yellow)?;
        }

        // Tail first so the head ends up on top of grown segments
        let head_char = self.state.snake().head_char();
        let body: Vec<Position> = self.state.snake().body().to_vec();
        for (i, &pos) in body.iter().enumerate().rev() {
            let ch = if i == 0 { head_char } else { SNAKE_BODY_CHAR };
            self.print_cell(pos, ch, Color::Green)?;
        }

        self.draw_hud()?;
        self.term.flush()?;
        Ok(())
    }

    fn draw_hud(&mut self) -> Result<()> {
        let boost = if self.state.is_speed_boost_active() { " >>" } else { "" };
        let hud = format!(
            "Score: {:<5} Big food: {}/{}  Len: {:<4} {}ms{}   ",
            self.state.score(),
            self.state.small_food_count(),
            self.state.config().small_food_count,
            self.state.snake().len(),
            self.state.effective_speed().round(),
            boost,
        );
        self.term.print_str_at((self.origin.0 - 1, self.origin.1 - 2), &hud)?;
        Ok(())
    }

    /// Draws a board cell. Cells outside the board are skipped.
    fn print_cell(&mut self, pos: Position, ch: char, color: Color) -> Result<()> {
        if collision::is_out_of_bounds(pos, self.state.board_width(), self.state.board_height()) {
            return Ok(());
        }

        let x = self.origin.0 + pos.x as TermInt * CELL_WIDTH;
        let y = self.origin.1 + pos.y as TermInt;
        let fill = if ch == SNAKE_BODY_CHAR { SNAKE_BODY_CHAR } else { ' ' };

        self.term.print_colored_at((x, y), ch, color)?;
        self.term.print_colored_at((x + 1, y), fill, color)?;
        Ok(())
    }
}
