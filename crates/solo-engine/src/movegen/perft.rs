//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the move tree at a given depth. Colors
//! alternate each ply. Moves are pseudo-legal, so counts match the published
//! legal figures only while no side can be left in check.

use super::generate_moves;
use crate::Board;
use solo_core::Color;

/// Counts leaf nodes, branching with make/unmake on a single board.
pub fn perft(board: &mut Board, color: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(board, color);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        if let Ok(undo) = board.make_move(m) {
            nodes += perft(board, color.opposite(), depth - 1);
            board.unmake_move(undo);
        }
    }
    nodes
}

/// Counts leaf nodes, branching on an independent copy per move.
pub fn perft_copy(board: &Board, color: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(board, color);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        let mut child = board.copy();
        if child.apply_move(m).is_ok() {
            nodes += perft_copy(&child, color.opposite(), depth - 1);
        }
    }
    nodes
}

/// Perft with divide: node count below each root move.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &Board, color: Color, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(board, color);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let mut child = board.copy();
        if child.apply_move(m).is_err() {
            continue;
        }
        let nodes = if depth > 1 {
            perft(&mut child, color.opposite(), depth - 1)
        } else {
            1
        };
        results.push((m.to_string(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
