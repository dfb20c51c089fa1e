//! Board geometry: integer positions and the board rectangle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the board. Coordinates may be negative; such positions are
/// simply off-board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Position> for (i32, i32) {
    fn from(position: Position) -> Self {
        (position.x, position.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of the board, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: u16,
    pub height: u16,
}

impl BoardSize {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// True iff `0 <= x < width` and `0 <= y < height`.
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.x < i32::from(self.width)
            && position.y >= 0
            && position.y < i32::from(self.height)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::new(64, 32)
    }
}

impl From<(u16, u16)> for BoardSize {
    fn from((width, height): (u16, u16)) -> Self {
        Self::new(width, height)
    }
}
