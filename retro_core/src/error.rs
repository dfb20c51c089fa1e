//! Error types for the Retro engine.

use crate::board::Position;
use crate::graph::GraphError;
use thiserror::Error;

/// Errors raised by the engine.
///
/// Every variant reports a mistake in the calling game logic or an
/// unusable terminal; none is recovered internally.
#[derive(Debug, Error)]
pub enum GameError {
    /// An agent with this name is already registered
    #[error("agent already exists: {0}")]
    AgentAlreadyExists(String),

    /// No agent is registered under this name
    #[error("agent not found: {0}")]
    AgentNotFound(String),

    /// Target position is off the board
    #[error("illegal move: {name} cannot be placed at {position}")]
    IllegalMove { name: String, position: Position },

    /// Agent does not satisfy the agent contract
    #[error("invalid agent: {0}")]
    InvalidAgent(String),

    /// Agent name is unusable as a registry key
    #[error("invalid agent name: {0:?}")]
    InvalidAgentName(String),

    /// Value is not a pair of integer coordinates
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// World state holds a mutable value or was restructured
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Game configuration is unusable
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Terminal cannot fit the board and its panels
    #[error("terminal too small: need {width_needed}x{height_needed}, have {width}x{height}")]
    TerminalTooSmall {
        width: u16,
        width_needed: u16,
        height: u16,
        height_needed: u16,
    },

    /// Layout geometry was malformed
    #[error("layout error: {0}")]
    Layout(#[from] GraphError),

    /// Terminal I/O failed
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// Creates an invalid-agent error.
    pub fn invalid_agent(msg: impl Into<String>) -> Self {
        Self::InvalidAgent(msg.into())
    }

    /// Creates an invalid-state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Creates an invalid-config error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates an illegal-move error.
    pub fn illegal_move(name: impl Into<String>, position: Position) -> Self {
        Self::IllegalMove {
            name: name.into(),
            position,
        }
    }
}

/// Result alias used across the engine.
pub type GameResult<T> = Result<T, GameError>;
