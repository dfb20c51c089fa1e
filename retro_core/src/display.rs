//! Terminal surface: scoped full-screen session and input events.
//!
//! [`Screen`] is the seam between the game loop and the terminal. The
//! production [`TerminalScreen`] drives a ratatui terminal over crossterm;
//! [`HeadlessScreen`] keeps frames in memory and replays scripted input.

use crate::error::GameResult;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, buffer::Buffer, layout::Rect, Terminal};
use std::collections::BTreeMap;
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, error};

// =============================================================================
// INPUT EVENTS
// =============================================================================

/// A key press handed to agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Keystroke {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Symbolic key name, e.g. `KEY_LEFT`, or the typed character.
    pub fn name(&self) -> String {
        match self.code {
            KeyCode::Left => "KEY_LEFT".to_string(),
            KeyCode::Right => "KEY_RIGHT".to_string(),
            KeyCode::Up => "KEY_UP".to_string(),
            KeyCode::Down => "KEY_DOWN".to_string(),
            KeyCode::Enter => "KEY_ENTER".to_string(),
            KeyCode::Esc => "KEY_ESCAPE".to_string(),
            KeyCode::Backspace => "KEY_BACKSPACE".to_string(),
            KeyCode::Tab => "KEY_TAB".to_string(),
            KeyCode::Char(c) => c.to_string(),
            other => format!("{other:?}"),
        }
    }
}

impl From<KeyEvent> for Keystroke {
    fn from(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Input the game loop reacts to between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(Keystroke),
    /// Terminal was resized to (width, height)
    Resize(u16, u16),
    /// Ctrl-C while in raw mode
    Interrupt,
}

// =============================================================================
// SCREEN
// =============================================================================

pub trait Screen {
    /// Hands a cleared frame buffer to `render` and shows the result.
    fn present<F>(&mut self, render: F) -> GameResult<()>
    where
        F: FnOnce(&mut Buffer) -> GameResult<()>;

    /// Drains pending input without blocking.
    fn poll_events(&mut self) -> GameResult<Vec<InputEvent>>;

    /// Current drawable area.
    fn size(&self) -> GameResult<Rect>;
}

/// Raw mode, alternate screen and hidden cursor for as long as it lives.
struct TerminalMode;

impl TerminalMode {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        let mode = TerminalMode;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(mode)
    }
}

impl Drop for TerminalMode {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
            error!("Failed to leave alternate screen: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        }
        debug!("terminal restored");
    }
}

/// The real terminal. Restores normal mode when dropped, whatever the exit
/// path.
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    // Dropped after the terminal
    _mode: TerminalMode,
}

impl TerminalScreen {
    pub fn open() -> GameResult<Self> {
        let mode = TerminalMode::acquire()?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        debug!("terminal session opened");
        Ok(Self {
            terminal,
            _mode: mode,
        })
    }
}

impl Screen for TerminalScreen {
    fn present<F>(&mut self, render: F) -> GameResult<()>
    where
        F: FnOnce(&mut Buffer) -> GameResult<()>,
    {
        let mut outcome = Ok(());
        self.terminal.draw(|frame| outcome = render(frame.buffer_mut()))?;
        outcome
    }

    fn poll_events(&mut self) -> GameResult<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        events.push(InputEvent::Interrupt);
                    } else {
                        events.push(InputEvent::Key(key.into()));
                    }
                }
                Event::Resize(width, height) => events.push(InputEvent::Resize(width, height)),
                _ => {}
            }
        }
        Ok(events)
    }

    fn size(&self) -> GameResult<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }
}

// =============================================================================
// HEADLESS SCREEN
// =============================================================================

/// In-memory screen with scripted input, for tests and headless runs.
pub struct HeadlessScreen {
    buffer: Buffer,
    /// Events keyed by the poll on which they are delivered
    scheduled: BTreeMap<usize, Vec<InputEvent>>,
    /// Size changes keyed by the poll on which they take effect
    resizes: BTreeMap<usize, (u16, u16)>,
    polls: usize,
    frames: usize,
}

impl HeadlessScreen {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            scheduled: BTreeMap::new(),
            resizes: BTreeMap::new(),
            polls: 0,
            frames: 0,
        }
    }

    /// Delivers `event` on the next poll.
    pub fn queue_event(&mut self, event: InputEvent) {
        self.schedule_event(self.polls, event);
    }

    /// Delivers `event` on the given poll (0 is the first poll).
    pub fn schedule_event(&mut self, poll: usize, event: InputEvent) {
        self.scheduled.entry(poll).or_default().push(event);
    }

    /// Changes the screen size and queues the matching resize event.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.buffer.resize(Rect::new(0, 0, width, height));
        self.queue_event(InputEvent::Resize(width, height));
    }

    /// Changes the screen size on the given poll, as a user dragging the
    /// window between two ticks would.
    pub fn schedule_resize(&mut self, poll: usize, width: u16, height: u16) {
        self.resizes.insert(poll, (width, height));
    }

    /// Number of frames presented successfully.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Text of one screen row.
    pub fn row(&self, y: u16) -> String {
        let area = self.buffer.area;
        (area.left()..area.right())
            .filter_map(|x| self.buffer.cell((x, y)).map(|cell| cell.symbol().to_string()))
            .collect()
    }

    /// Text of every screen row.
    pub fn rows(&self) -> Vec<String> {
        let area = self.buffer.area;
        (area.top()..area.bottom()).map(|y| self.row(y)).collect()
    }
}

impl Screen for HeadlessScreen {
    fn present<F>(&mut self, render: F) -> GameResult<()>
    where
        F: FnOnce(&mut Buffer) -> GameResult<()>,
    {
        self.buffer.reset();
        render(&mut self.buffer)?;
        self.frames += 1;
        Ok(())
    }

    fn poll_events(&mut self) -> GameResult<Vec<InputEvent>> {
        let mut events = Vec::new();
        if let Some((width, height)) = self.resizes.remove(&self.polls) {
            self.buffer.resize(Rect::new(0, 0, width, height));
            events.push(InputEvent::Resize(width, height));
        }
        let later = self.scheduled.split_off(&(self.polls + 1));
        let due = std::mem::replace(&mut self.scheduled, later);
        self.polls += 1;
        events.extend(due.into_values().flatten());
        Ok(events)
    }

    fn size(&self) -> GameResult<Rect> {
        Ok(self.buffer.area)
    }
}
