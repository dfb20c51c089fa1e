//! Agents: named entities on the board with optional per-tick behaviour.

use crate::board::Position;
use crate::display::Keystroke;
use crate::error::GameResult;
use crate::game::Game;
use std::fmt;

/// Optional capabilities an agent can expose to the engine.
///
/// Both methods default to doing nothing, so a behaviour only implements
/// what it cares about. `name` is the agent's own registry key; look the
/// agent up through `game` to read or change it.
pub trait Behavior {
    /// Called once per tick, in ascending agent-name order.
    fn play_turn(&mut self, _name: &str, _game: &mut Game) -> GameResult<()> {
        Ok(())
    }

    /// Called for every keystroke read since the previous tick.
    fn handle_keystroke(&mut self, _key: &Keystroke, _name: &str, _game: &mut Game) -> GameResult<()> {
        Ok(())
    }
}

/// An entity registered with the game.
///
/// `name` and `position` are owned by the engine once the agent is added:
/// the name is the registry key and positions only change through
/// [`Game::move_agent`]. The cosmetic fields can be changed freely.
pub struct Agent {
    name: String,
    position: Position,
    /// Glyph drawn on the board; required when `display` is set
    pub character: Option<char>,
    /// Whether the agent is drawn at all
    pub display: bool,
    /// Paint order, higher is drawn on top
    pub z: i32,
    /// Colour name understood by the terminal styling layer
    pub color: Option<String>,
    behavior: Option<Box<dyn Behavior>>,
}

impl Agent {
    /// A displayed agent. It still needs a character before it can be added.
    pub fn new(name: impl Into<String>, position: impl Into<Position>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            character: None,
            display: true,
            z: 0,
            color: None,
            behavior: None,
        }
    }

    /// An agent that is never drawn, parked at the origin.
    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            display: false,
            ..Self::new(name, Position::default())
        }
    }

    pub fn with_character(mut self, character: char) -> Self {
        self.character = Some(character);
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the starting position. Has no effect once the agent is registered.
    pub fn with_position(mut self, position: impl Into<Position>) -> Self {
        self.position = position.into();
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Lends the behaviour out for the duration of a callback.
    pub(crate) fn take_behavior(&mut self) -> Option<Box<dyn Behavior>> {
        self.behavior.take()
    }

    pub(crate) fn restore_behavior(&mut self, behavior: Box<dyn Behavior>) {
        if self.behavior.is_none() {
            self.behavior = Some(behavior);
        }
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("character", &self.character)
            .field("display", &self.display)
            .field("z", &self.z)
            .field("color", &self.color)
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;
    impl Behavior for Idle {}

    #[test]
    fn test_agent_defaults() {
        let agent = Agent::new("ship", (3, 4));
        assert_eq!(agent.name(), "ship");
        assert_eq!(agent.position(), Position::new(3, 4));
        assert!(agent.display);
        assert_eq!(agent.z, 0);
        assert!(agent.color.is_none());
        assert!(agent.character.is_none());
        assert!(!agent.has_behavior());
    }

    #[test]
    fn test_hidden_agent() {
        let agent = Agent::hidden("spawner").with_behavior(Idle);
        assert!(!agent.display);
        assert_eq!(agent.position(), Position::new(0, 0));
        assert!(agent.has_behavior());
    }

    #[test]
    fn test_behavior_is_lent_and_restored() {
        let mut agent = Agent::new("a", (0, 0)).with_behavior(Idle);
        let behavior = agent.take_behavior().unwrap();
        assert!(!agent.has_behavior());
        agent.restore_behavior(behavior);
        assert!(agent.has_behavior());
    }
}
