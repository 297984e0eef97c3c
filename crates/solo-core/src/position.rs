//! Board coordinate representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when a coordinate cannot be rendered.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid coordinate {position} for a board of size {board_size}")]
    InvalidCoordinate { position: Position, board_size: usize },
}

/// The row and column extent of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    pub rows: usize,
    pub cols: usize,
}

impl Extent {
    /// Creates an extent.
    #[inline]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Extent { rows, cols }
    }

    /// A square extent.
    #[inline]
    pub const fn square(size: usize) -> Self {
        Extent {
            rows: size,
            cols: size,
        }
    }

    /// Number of cells.
    #[inline]
    pub const fn area(self) -> usize {
        self.rows * self.cols
    }

    /// Iterates all positions in row-major order.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.area()).map(move |i| Position::new((i / cols) as i32, (i % cols) as i32))
    }
}

/// A `(row, col)` coordinate.
///
/// Coordinates are signed so that offsets may step off the board; whether a
/// position is valid is decided by the consumer against an [`Extent`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Creates a position.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// Returns the position shifted by the given row and column deltas.
    #[inline]
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Position {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Returns true if the position lies in `[0, rows) x [0, cols)`.
    #[inline]
    pub const fn is_within_bounds(self, extent: Extent) -> bool {
        self.row >= 0
            && self.col >= 0
            && (self.row as usize) < extent.rows
            && (self.col as usize) < extent.cols
    }

    /// Returns the row-major index within the extent, if in bounds.
    #[inline]
    pub const fn index_in(self, extent: Extent) -> Option<usize> {
        if self.is_within_bounds(extent) {
            Some(self.row as usize * extent.cols + self.col as usize)
        } else {
            None
        }
    }

    /// Returns the file name: `'a' + col` up to `z`, then `aa`, `ab`, ... for
    /// wider boards. Negative columns render as file `a`.
    pub fn file_name(self) -> String {
        let mut n = self.col.max(0) as u32 + 1;
        let mut letters = Vec::new();
        while n > 0 {
            n -= 1;
            letters.push((b'a' + (n % 26) as u8) as char);
            n /= 26;
        }
        letters.iter().rev().collect()
    }

    /// Returns the algebraic name of the square on a square board, where the
    /// file is `'a' + col` and the rank is `board_size - row`.
    pub fn to_notation(self, board_size: usize) -> Result<String, PositionError> {
        if !self.is_within_bounds(Extent::square(board_size)) {
            return Err(PositionError::InvalidCoordinate {
                position: self,
                board_size,
            });
        }
        Ok(format!(
            "{}{}",
            self.file_name(),
            board_size - self.row as usize
        ))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Position::new(row, col)
    }
}
