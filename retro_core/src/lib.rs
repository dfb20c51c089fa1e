//! Retro - a turn-based game engine for the terminal
//!
//! Agents live on a fixed-size grid. Each tick, every agent with a
//! [`Behavior`] takes its turn in ascending name order, then the board is
//! drawn inside a box-drawing frame together with the world state (and,
//! in debug mode, the game log).
//!
//! The engine owns every structural invariant:
//! 1. **Registry**: agents are indexed by name and by cell, and the two
//!    indices never disagree
//! 2. **Board**: every agent sits on the board
//! 3. **State**: world state only ever holds immutable values
//!
//! # Usage
//!
//! ```ignore
//! use retro_core::{Agent, Game, GameConfig, State};
//!
//! let ship = Agent::new("ship", (12, 24)).with_character('^');
//! let config = GameConfig::default().with_board_size((25, 25));
//! let mut game = Game::new(vec![ship], State::new(), config)?;
//! game.play_in_terminal().await?;
//! ```

pub mod agent;
pub mod board;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod game;
pub mod graph;
pub mod registry;
pub mod state;
pub mod validation;
pub mod view;

// Re-export key types for convenience
pub use agent::{Agent, Behavior};
pub use board::{BoardSize, Position};
pub use clock::Clock;
pub use config::GameConfig;
pub use display::{HeadlessScreen, InputEvent, Keystroke, Screen, TerminalScreen};
pub use error::{GameError, GameResult};
pub use game::{Game, LogEntry};
pub use graph::{Graph, GraphError};
pub use state::{State, Value};
pub use view::View;

pub use crossterm::event::{KeyCode, KeyModifiers};
pub use retro_env::{GameContext, GameRng, SimContext, TokioContext};
