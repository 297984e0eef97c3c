//! Ray casting and fixed-offset destination generation.

use crate::{Board, Piece};
use solo_core::Position;

/// Diagonal ray directions, in generation order.
pub const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Orthogonal ray directions, in generation order.
pub const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Queen rays: the rook's, then the bishop's.
pub const QUEEN_DIRECTIONS: [(i32, i32); 8] = [
    ROOK_DIRECTIONS[0],
    ROOK_DIRECTIONS[1],
    ROOK_DIRECTIONS[2],
    ROOK_DIRECTIONS[3],
    BISHOP_DIRECTIONS[0],
    BISHOP_DIRECTIONS[1],
    BISHOP_DIRECTIONS[2],
    BISHOP_DIRECTIONS[3],
];

/// Knight jumps: every `(±1, ±2)` / `(±2, ±1)` offset.
pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// King steps, row delta outer, column delta inner.
pub const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Walks each ray from the piece until it leaves the board or meets a piece.
///
/// Empty squares are added and the walk continues. An enemy-occupied square
/// is added as a capture and ends the ray; an ally-occupied square ends the
/// ray without being added.
pub fn slide(piece: &Piece, board: &Board, directions: &[(i32, i32)], out: &mut Vec<Position>) {
    for &(d_row, d_col) in directions {
        let mut pos = piece.position.offset(d_row, d_col);
        while let Some(tile) = board.tile_at(pos) {
            match tile.piece() {
                None => out.push(pos),
                Some(other) => {
                    if other.is_enemy_of(piece) {
                        out.push(pos);
                    }
                    break;
                }
            }
            pos = pos.offset(d_row, d_col);
        }
    }
}

/// Adds each in-bounds offset square that is empty or holds an enemy.
pub fn step(piece: &Piece, board: &Board, offsets: &[(i32, i32)], out: &mut Vec<Position>) {
    for &(d_row, d_col) in offsets {
        let pos = piece.position.offset(d_row, d_col);
        if let Some(tile) = board.tile_at(pos) {
            match tile.piece() {
                Some(other) if !other.is_enemy_of(piece) => {}
                _ => out.push(pos),
            }
        }
    }
}
