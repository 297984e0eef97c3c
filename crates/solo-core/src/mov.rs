//! Move and move-history representation.

use crate::{Color, PieceKind, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ply.
///
/// Moves are plain values: once recorded in a [`MoveHistory`] they are never
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub kind: PieceKind,
    pub color: Color,
    pub start: Position,
    pub end: Position,
    pub is_capture: bool,
    pub is_en_passant: bool,
    /// Piece a pawn turns into on reaching the far rank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a quiet move.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, start: Position, end: Position) -> Self {
        Move {
            kind,
            color,
            start,
            end,
            is_capture: false,
            is_en_passant: false,
            promotion: None,
        }
    }

    /// Marks the move as a capture.
    #[inline]
    pub const fn with_capture(mut self, capture: bool) -> Self {
        self.is_capture = capture;
        self
    }

    /// Marks the move as an en-passant capture (which is always a capture).
    #[inline]
    pub const fn with_en_passant(mut self) -> Self {
        self.is_en_passant = true;
        self.is_capture = true;
        self
    }

    /// Sets the promotion piece.
    #[inline]
    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    /// Returns true if this is a pawn advancing two rows.
    #[inline]
    pub const fn is_double_advance(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn)
            && self.start.col == self.end.col
            && (self.end.row - self.start.row).abs() == 2
    }

    /// Returns true if this is a king moving two columns along its row.
    #[inline]
    pub const fn is_castle(&self) -> bool {
        matches!(self.kind, PieceKind::King)
            && self.start.row == self.end.row
            && (self.end.col - self.start.col).abs() == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_capture { 'x' } else { '-' };
        write!(
            f,
            "{} {} {}{}{}",
            self.color, self.kind, self.start, sep, self.end
        )?;
        if let Some(p) = self.promotion {
            write!(f, "={}", p)?;
        }
        Ok(())
    }
}

/// Append-only ordered record of played moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    /// Creates an empty history.
    pub const fn new() -> Self {
        MoveHistory { moves: Vec::new() }
    }

    /// Appends a move.
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// The most recently played move.
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves in play order.
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    /// Drops every recorded move (used when a new round starts).
    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

impl<'a> IntoIterator for &'a MoveHistory {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
