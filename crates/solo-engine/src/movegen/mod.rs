//! Move generation.
//!
//! Destinations are pseudo-legal: they follow each piece's movement pattern
//! and blocking rules, but do not check whether the mover's own king is left
//! in check (see [`crate::rules`] for that).
//!
//! Generation order is fixed so that search results are reproducible: pieces
//! are visited row-major, and each piece yields its destinations in the order
//! its pattern defines (ray by ray, offset by offset, pushes before captures).

mod attacks;
mod pawn;
pub mod perft;

use crate::{Board, Piece};
use solo_core::{Color, Move, PieceKind, Position};

pub use attacks::{
    BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};
pub use pawn::{can_promote, en_passant_target, promotion_row};

/// Pseudo-legal destinations of a piece, castling excluded.
pub fn possible_moves(piece: &Piece, board: &Board) -> Vec<Position> {
    let mut out = Vec::new();
    match piece.kind {
        PieceKind::Pawn => pawn::destinations(piece, board, &mut out),
        PieceKind::Knight => attacks::step(piece, board, &KNIGHT_OFFSETS, &mut out),
        PieceKind::Bishop => attacks::slide(piece, board, &BISHOP_DIRECTIONS, &mut out),
        PieceKind::Rook => attacks::slide(piece, board, &ROOK_DIRECTIONS, &mut out),
        PieceKind::Queen => attacks::slide(piece, board, &QUEEN_DIRECTIONS, &mut out),
        PieceKind::King => attacks::step(piece, board, &KING_OFFSETS, &mut out),
    }
    out
}

/// Squares the piece attacks or guards.
///
/// Pawns guard both forward diagonals whether or not anything stands there;
/// every other piece guards its possible moves.
pub fn defended_tiles(piece: &Piece, board: &Board) -> Vec<Position> {
    match piece.kind {
        PieceKind::Pawn => {
            let mut out = Vec::with_capacity(2);
            pawn::defended(piece, board, &mut out);
            out
        }
        _ => possible_moves(piece, board),
    }
}

/// Returns true if any piece of color `by` attacks `pos`.
pub fn is_square_attacked(board: &Board, pos: Position, by: Color) -> bool {
    board.pieces_of(by).any(|p| {
        let attacked = match p.kind {
            PieceKind::Pawn => defended_tiles(p, board),
            _ => possible_moves(p, board),
        };
        attacked.contains(&pos)
    })
}

/// Returns true if `king` may castle with the rook on `rook_pos`.
///
/// Both pieces must be unmoved and share a row at least three columns apart,
/// every square between them must be empty, and the king may not be in check
/// nor cross or land on an attacked square.
pub fn can_castle(king: &Piece, board: &Board, rook_pos: Position) -> bool {
    if king.kind != PieceKind::King || king.has_moved() {
        return false;
    }
    let rook = match board.piece_at(rook_pos) {
        Some(r) => r,
        None => return false,
    };
    if rook.kind != PieceKind::Rook || rook.color != king.color || rook.has_moved() {
        return false;
    }
    if rook_pos.row != king.position.row || (rook_pos.col - king.position.col).abs() < 3 {
        return false;
    }

    let step = (rook_pos.col - king.position.col).signum();
    let mut pos = king.position.offset(0, step);
    while pos != rook_pos {
        if !board.is_empty_at(pos) {
            return false;
        }
        pos = pos.offset(0, step);
    }

    let enemy = king.color.opposite();
    [0, 1, 2]
        .iter()
        .all(|&i| !is_square_attacked(board, king.position.offset(0, i * step), enemy))
}

/// King destinations reached by castling, lowest column first.
pub fn castling_destinations(king: &Piece, board: &Board) -> Vec<Position> {
    if king.kind != PieceKind::King || king.has_moved() {
        return Vec::new();
    }
    let row = king.position.row;
    (0..board.cols() as i32)
        .map(|col| Position::new(row, col))
        .filter(|&pos| can_castle(king, board, pos))
        .map(|pos| king.position.offset(0, 2 * (pos.col - king.position.col).signum()))
        .collect()
}

/// All destinations a piece may move to: its possible moves, then any
/// castling destinations.
pub fn destinations(piece: &Piece, board: &Board) -> Vec<Position> {
    let mut out = possible_moves(piece, board);
    if piece.kind == PieceKind::King {
        out.extend(castling_destinations(piece, board));
    }
    out
}

/// Moves for one piece, with capture, en-passant, and promotion flags set.
pub fn moves_for(piece: &Piece, board: &Board) -> Vec<Move> {
    destinations(piece, board)
        .into_iter()
        .map(|end| {
            let mut m = Move::new(piece.kind, piece.color, piece.position, end)
                .with_capture(board.piece_at(end).is_some());
            if piece.kind == PieceKind::Pawn {
                if end.col != piece.position.col && board.is_empty_at(end) {
                    m = m.with_en_passant();
                }
                if end.row == promotion_row(board, piece.direction) {
                    m = m.with_promotion(PieceKind::Queen);
                }
            }
            m
        })
        .collect()
}

/// Every move for `color`, pieces in row-major order.
pub fn generate_moves(board: &Board, color: Color) -> Vec<Move> {
    board
        .pieces_of(color)
        .flat_map(|p| moves_for(p, board))
        .collect()
}

/// Returns true if `color` has at least one pseudo-legal move.
pub fn has_moves(board: &Board, color: Color) -> bool {
    board
        .pieces_of(color)
        .any(|p| !destinations(p, board).is_empty())
}
