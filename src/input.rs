use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::direction::Direction;

/// Longest gap between two presses of a direction key that still counts as
/// auto-repeat, on terminals that never report releases.
pub const HOLD_TIMEOUT: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    TogglePause,
    Restart,
    Quit,
    None,
}

impl KeyAction {
    pub fn from_key(key: &KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = direction_for(key.code) {
            return KeyAction::Turn(direction);
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::TogglePause,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => KeyAction::Restart,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            _ => KeyAction::None,
        }
    }
}

/// Arrow keys and WASD, either case.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match normalize(code) {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    last_press: Instant,
    repeated: bool,
}

/// Direction keys currently held down. The speed boost is on while
/// [`HeldKeys::is_boosting`] holds.
#[derive(Debug)]
pub struct HeldKeys {
    keys: HashMap<KeyCode, Hold>,
    release_events: bool,
    hold_timeout: Duration,
}

impl HeldKeys {
    /// With `release_events` unset, a key only counts as held once it repeats
    /// within `hold_timeout`, and [`HeldKeys::expire`] drops it when the
    /// repeats stop.
    pub fn new(release_events: bool, hold_timeout: Duration) -> Self {
        HeldKeys { keys: HashMap::new(), release_events, hold_timeout }
    }

    pub fn press(&mut self, code: KeyCode, now: Instant) {
        if direction_for(code).is_none() {
            return;
        }

        let code = normalize(code);
        match self.keys.get_mut(&code) {
            Some(hold) => {
                hold.repeated = now.duration_since(hold.last_press) < self.hold_timeout;
                hold.last_press = now;
            }
            None => {
                self.keys.insert(code, Hold { last_press: now, repeated: false });
            }
        }
    }

    pub fn release(&mut self, code: KeyCode) {
        self.keys.remove(&normalize(code));
    }

    pub fn expire(&mut self, now: Instant) {
        if self.release_events {
            return;
        }
        let timeout = self.hold_timeout;
        self.keys.retain(|_, hold| now.duration_since(hold.last_press) < timeout);
    }

    /// True while a direction key is held down. Without release events a
    /// single tap never boosts.
    pub fn is_boosting(&self) -> bool {
        if self.release_events {
            !self.keys.is_empty()
        } else {
            self.keys.values().any(|hold| hold.repeated)
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
