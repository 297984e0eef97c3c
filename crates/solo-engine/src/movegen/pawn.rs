//! Pawn moves: pushes, diagonal captures, en passant, and promotion.

use crate::{Board, Piece};
use solo_core::{PieceKind, Position};

/// Row a pawn advancing in `direction` promotes on.
#[inline]
pub fn promotion_row(board: &Board, direction: i32) -> i32 {
    if direction > 0 {
        board.rows() as i32 - 1
    } else {
        0
    }
}

/// Returns true if the pawn stands on its far rank.
pub fn can_promote(pawn: &Piece, board: &Board) -> bool {
    pawn.kind == PieceKind::Pawn && pawn.position.row == promotion_row(board, pawn.direction)
}

/// Forward pushes, then left and right captures, then en passant.
pub fn destinations(pawn: &Piece, board: &Board, out: &mut Vec<Position>) {
    let d = pawn.direction;
    let one = pawn.position.offset(d, 0);
    if board.is_empty_at(one) {
        out.push(one);
        let two = pawn.position.offset(2 * d, 0);
        if pawn.first_move && board.is_empty_at(two) {
            out.push(two);
        }
    }

    for d_col in [-1, 1] {
        let target = pawn.position.offset(d, d_col);
        if let Some(other) = board.piece_at(target) {
            if other.is_enemy_of(pawn) {
                out.push(target);
            }
        }
    }

    if let Some(target) = en_passant_target(pawn, board) {
        out.push(target);
    }
}

/// The en-passant destination, if the board's last move was an enemy pawn's
/// two-row advance ending beside this pawn.
pub fn en_passant_target(pawn: &Piece, board: &Board) -> Option<Position> {
    let last = board.last_move()?;
    if !last.is_double_advance() || last.color == pawn.color {
        return None;
    }
    if last.end.row != pawn.position.row || (last.end.col - pawn.position.col).abs() != 1 {
        return None;
    }
    // The passed pawn must still be there.
    let victim = board.piece_at(last.end)?;
    if victim.kind != PieceKind::Pawn || !victim.is_enemy_of(pawn) {
        return None;
    }
    let target = Position::new(pawn.position.row + pawn.direction, last.end.col);
    board.is_empty_at(target).then_some(target)
}

/// The two forward diagonals, regardless of occupancy.
pub fn defended(pawn: &Piece, board: &Board, out: &mut Vec<Position>) {
    for d_col in [-1, 1] {
        let target = pawn.position.offset(pawn.direction, d_col);
        if board.is_within_bounds(target) {
            out.push(target);
        }
    }
}
