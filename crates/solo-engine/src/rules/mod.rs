//! Check detection and match rules.
//!
//! The free functions here answer questions about a single board: is a king
//! in check, which moves keep it safe, is it mated. The [`RuleSet`] trait
//! decides when a match is over; the controller delegates to whichever rule
//! set the match mode selects.

mod solo;
mod versus;

pub use solo::SoloRules;
pub use versus::VersusRules;

use crate::movegen::{self, generate_moves};
use crate::{Board, Piece};
use solo_core::{Color, Move, PieceKind};

/// Result of a finished match, from White's (the player's) side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Won,
    Lost,
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// The side to move has no legal move but is not in check.
    Stalemate,
    /// Only kings are left on the board.
    InsufficientMaterial,
}

/// Decides when a match is over.
pub trait RuleSet {
    /// Returns the result if the match is over with `side_to_move` to play,
    /// otherwise `None`.
    fn game_result(&self, board: &Board, side_to_move: Color) -> Option<GameResult>;

    /// Returns true if the match is over.
    fn is_game_over(&self, board: &Board, side_to_move: Color) -> bool {
        self.game_result(board, side_to_move).is_some()
    }
}

/// Returns true if any enemy piece can move onto the king's square.
pub fn is_in_check(king: &Piece, board: &Board) -> bool {
    board
        .pieces_of(king.color.opposite())
        .any(|p| movegen::possible_moves(p, board).contains(&king.position))
}

/// Returns true if `color` has a king and it is in check.
pub fn is_color_in_check(board: &Board, color: Color) -> bool {
    board
        .find_king(color)
        .map_or(false, |king| is_in_check(king, board))
}

/// Returns true if playing `m` does not leave the mover's king in check.
///
/// The move is tried on a copy; the board itself is never touched.
pub fn leaves_king_safe(board: &Board, m: &Move) -> bool {
    let mut after = board.copy();
    if after.apply_move(m).is_err() {
        return false;
    }
    !is_color_in_check(&after, m.color)
}

/// Moves for `color` that keep its king out of check, in generation order.
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    generate_moves(board, color)
        .into_iter()
        .filter(|m| leaves_king_safe(board, m))
        .collect()
}

/// Returns true if `color` has at least one king-safe move.
pub fn has_any_move(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .flat_map(|p| movegen::moves_for(p, board))
        .any(|m| leaves_king_safe(board, &m))
}

/// Returns true if the king is in check and no move of its side lifts it.
pub fn is_checkmate(king: &Piece, board: &Board) -> bool {
    is_in_check(king, board) && !has_any_move(board, king.color)
}

/// Returns true if nothing but kings remain.
pub fn is_insufficient_material(board: &Board) -> bool {
    board.pieces().all(|p| p.kind == PieceKind::King)
}
