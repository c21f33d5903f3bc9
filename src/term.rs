use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::event::{
    poll, read, Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};

use crate::{Coords, TermInt};

/// Owns the terminal while a game is on screen. Everything printed through
/// `print_at` is remembered so a message box can be drawn over it and later
/// removed again.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
    key_release_events: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen,
            current_msg: None,
            key_release_events: false,
        })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;

        // Key release events are only reported by terminals speaking the
        // kitty keyboard protocol
        self.key_release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.key_release_events {
            execute!(
                self.stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        Ok(())
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if self.key_release_events {
            execute!(self.stdout, PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(self.stdout, ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    /// Whether the terminal tells us when a key is let go.
    pub fn reports_key_release(&self) -> bool {
        self.key_release_events
    }

    /// Blocks until a key is pressed. Releases are skipped.
    pub fn read_key_blocking(&self) -> io::Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                if ev.kind != KeyEventKind::Release {
                    return Ok(ev);
                }
            }
        }
    }

    /// Drains every key event that is already waiting.
    pub fn read_key_events_queue(&self) -> io::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Draws a frame whose outer corners are `top_left` and
    /// `top_left + (width - 1, height - 1)`.
    pub fn draw_box(&mut self, top_left: Coords, width: TermInt, height: TermInt) -> io::Result<()> {
        let (x0, y0) = top_left;
        let end_x = x0 + width - 1;
        let end_y = y0 + height - 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x { '+' } else { '-' };
            self.print_at((x, y0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Top and bottom padding rows
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> io::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back what the box covered
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(idx) = self.index(x, y) {
                    let ch = self.screen[idx];
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    /// Cells outside the terminal are dropped silently.
    pub fn print_at(&mut self, pos: Coords, ch: char) -> io::Result<()> {
        if let Some(idx) = self.index(pos.0, pos.1) {
            self.screen[idx] = ch;
            self.print_at_no_save(pos, ch)?;
        }
        Ok(())
    }

    pub fn print_colored_at(&mut self, pos: Coords, ch: char, color: Color) -> io::Result<()> {
        queue!(self.stdout, SetForegroundColor(color))?;
        self.print_at(pos, ch)?;
        queue!(self.stdout, ResetColor)
    }

    pub fn print_str_at(&mut self, pos: Coords, text: &str) -> io::Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as TermInt, pos.1), ch)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, x: TermInt, y: TermInt) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(self.width as usize * y as usize + x as usize)
        } else {
            None
        }
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> io::Result<()> {
        // Used for message boxes, which must not overwrite the screen buffer
        // they are restored from
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), Print(ch))
    }
}
