//! Game configuration.

use crate::board::BoardSize;
use crate::error::GameResult;
use crate::validation::{validate_board_size, validate_framerate};
use serde::{Deserialize, Serialize};

/// Construction-time settings for a [`crate::Game`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board size in cells (default: 64x32)
    pub board_size: BoardSize,

    /// Show the debug log panel (default: false)
    pub debug: bool,

    /// Ticks per second (default: 24)
    pub framerate: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BoardSize::default(),
            debug: false,
            framerate: 24.0,
        }
    }
}

impl GameConfig {
    pub fn with_board_size(mut self, board_size: impl Into<BoardSize>) -> Self {
        self.board_size = board_size.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_framerate(mut self, framerate: f64) -> Self {
        self.framerate = framerate;
        self
    }

    pub fn validate(self) -> GameResult<Self> {
        validate_board_size(self.board_size)?;
        validate_framerate(self.framerate)?;
        Ok(self)
    }
}
