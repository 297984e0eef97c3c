//! Static position evaluation.
//!
//! Scores are integers from one color's point of view: each term is computed
//! for that color and for its opponent, and the opponent's share is
//! subtracted. The heuristics are not symmetric between colors (rook activity
//! depends on which side's far rank is near), so `evaluate(b, White)` is not
//! in general `-evaluate(b, Black)`; the material term alone is.

use crate::movegen::{defended_tiles, generate_moves};
use crate::{Board, Piece};
use serde::Serialize;
use solo_core::{Color, PieceKind, Position};

pub const KING_VALUE: i32 = 1000;
pub const QUEEN_VALUE: i32 = 9;
pub const ROOK_VALUE: i32 = 5;
pub const MINOR_VALUE: i32 = 3;
pub const PAWN_VALUE: i32 = 1;

const KING_SHELTER: i32 = 5;
const PAWN_CHAIN_BONUS: i32 = 5;
const PASSED_PAWN_BONUS: i32 = 20;
const DOUBLED_PAWN_PENALTY: i32 = 10;
const CENTER_MOVE_BONUS: i32 = 2;
const CENTRAL_KNIGHT_BONUS: i32 = 10;
const ROOK_ON_SEVENTH_BONUS: i32 = 10;

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => KING_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Bishop | PieceKind::Knight => MINOR_VALUE,
        PieceKind::Pawn => PAWN_VALUE,
    }
}

/// Per-term scores for one color, each already net of the opponent's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub material: i32,
    pub king_safety: i32,
    pub pawn_structure: i32,
    pub mobility: i32,
    pub activity: i32,
}

impl Breakdown {
    pub fn total(&self) -> i32 {
        self.material + self.king_safety + self.pawn_structure + self.mobility + self.activity
    }
}

/// Scores the board for `color`. Higher is better for `color`.
pub fn evaluate(board: &Board, color: Color) -> i32 {
    breakdown(board, color).total()
}

/// Scores every term separately.
pub fn breakdown(board: &Board, color: Color) -> Breakdown {
    let net = |term: fn(&Board, Color) -> i32| term(board, color) - term(board, color.opposite());
    Breakdown {
        material: net(material),
        king_safety: net(king_safety),
        pawn_structure: net(pawn_structure),
        mobility: net(mobility),
        activity: net(activity),
    }
}

/// Sum of piece values for `color`.
pub fn material(board: &Board, color: Color) -> i32 {
    board.pieces_of(color).map(|p| piece_value(p.kind)).sum()
}

/// +5 for each square next to a king that another piece of its side guards,
/// -5 for each one that nothing guards.
pub fn king_safety(board: &Board, color: Color) -> i32 {
    let guarded: Vec<Position> = board
        .pieces_of(color)
        .filter(|p| p.kind != PieceKind::King)
        .flat_map(|p| defended_tiles(p, board))
        .collect();

    let mut score = 0;
    for king in board.pieces_of(color).filter(|p| p.kind == PieceKind::King) {
        for pos in neighbors(board, king.position) {
            score += if guarded.contains(&pos) {
                KING_SHELTER
            } else {
                -KING_SHELTER
            };
        }
    }
    score
}

fn neighbors(board: &Board, center: Position) -> impl Iterator<Item = Position> + '_ {
    (-1..=1)
        .flat_map(move |dr| (-1..=1).map(move |dc| (dr, dc)))
        .filter(|&d| d != (0, 0))
        .map(move |(dr, dc)| center.offset(dr, dc))
        .filter(move |&pos| board.is_within_bounds(pos))
}

/// Pawn chains, passed pawns, and doubled files.
pub fn pawn_structure(board: &Board, color: Color) -> i32 {
    let pawns: Vec<&Piece> = board
        .pieces_of(color)
        .filter(|p| p.kind == PieceKind::Pawn)
        .collect();
    let enemy_pawns: Vec<&Piece> = board
        .pieces_of(color.opposite())
        .filter(|p| p.kind == PieceKind::Pawn)
        .collect();

    let mut score = 0;

    // Each pair counts once, whichever pawn does the guarding.
    for (i, a) in pawns.iter().enumerate() {
        for b in &pawns[i + 1..] {
            if defended_tiles(a, board).contains(&b.position)
                || defended_tiles(b, board).contains(&a.position)
            {
                score += PAWN_CHAIN_BONUS;
            }
        }
    }

    for pawn in &pawns {
        if is_passed(pawn, &enemy_pawns) {
            score += PASSED_PAWN_BONUS;
        }
    }

    let mut files: Vec<i32> = pawns.iter().map(|p| p.position.col).collect();
    files.sort_unstable();
    let mut doubled = 0;
    for run in files.chunk_by(|a, b| a == b) {
        if run.len() > 1 {
            doubled += 1;
        }
    }
    score - doubled * DOUBLED_PAWN_PENALTY
}

/// No enemy pawn stands ahead of `pawn` on its own or an adjacent file.
fn is_passed(pawn: &Piece, enemy_pawns: &[&Piece]) -> bool {
    !enemy_pawns.iter().any(|e| {
        let ahead = (e.position.row - pawn.position.row) * pawn.direction > 0;
        ahead && (e.position.col - pawn.position.col).abs() <= 1
    })
}

/// +1 per move, +2 more when the move lands in the center.
pub fn mobility(board: &Board, color: Color) -> i32 {
    generate_moves(board, color)
        .iter()
        .map(|m| {
            if is_central(board, m.end) {
                1 + CENTER_MOVE_BONUS
            } else {
                1
            }
        })
        .sum()
}

/// Knights in the center and rooks one rank short of the far side.
pub fn activity(board: &Board, color: Color) -> i32 {
    let seventh = match color {
        Color::White => board.rows() as i32 - 2,
        Color::Black => 1,
    };
    board
        .pieces_of(color)
        .map(|p| match p.kind {
            PieceKind::Knight if is_central(board, p.position) => CENTRAL_KNIGHT_BONUS,
            PieceKind::Rook if p.position.row == seventh => ROOK_ON_SEVENTH_BONUS,
            _ => 0,
        })
        .sum()
}

/// The 4x4 block around the middle of the board (all of it on smaller boards).
pub fn is_central(board: &Board, pos: Position) -> bool {
    let band = |len: usize, v: i32| {
        let mid = len as i32 / 2;
        v >= (mid - 2).max(0) && v < (mid + 2).min(len as i32)
    };
    band(board.rows(), pos.row) && band(board.cols(), pos.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solo_core::Placement;

    fn board(placement: &str) -> Board {
        Board::from_placement(&Placement::parse(placement).unwrap()).unwrap()
    }

    #[test]
    fn material_counts_values() {
        let b = board("rnbqkbnr/pppppppp/8/8/8/8/8/4K3");
        assert_eq!(material(&b, Color::Black), 1000 + 9 + 2 * 5 + 4 * 3 + 8);
        assert_eq!(material(&b, Color::White), 1000);
        assert_eq!(breakdown(&b, Color::White).material, -39);
        assert_eq!(breakdown(&b, Color::Black).material, 39);
    }

    #[test]
    fn central_region_is_four_by_four() {
        let b = Board::square(8).unwrap();
        let count = b.extent().positions().filter(|&p| is_central(&b, p)).count();
        assert_eq!(count, 16);
        assert!(is_central(&b, Position::new(2, 2)));
        assert!(is_central(&b, Position::new(5, 5)));
        assert!(!is_central(&b, Position::new(6, 3)));

        let small = Board::new(3, 2).unwrap();
        assert_eq!(small.extent().positions().filter(|&p| is_central(&small, p)).count(), 6);
    }

    #[test]
    fn lone_king_safety() {
        // Corner king with three unguarded neighbours.
        let b = board("K7/8/8/8/8/8/8/8");
        assert_eq!(king_safety(&b, Color::White), -15);
        // The rook guards (1, 1) but not its own square or (1, 0).
        let b = board("KR6/8/8/8/8/8/8/8");
        assert_eq!(king_safety(&b, Color::White), -5);
    }

    #[test]
    fn pawn_chain_and_passed_pawns() {
        // White pawns on (1,0) and (2,1): one chain pair, both passed.
        let b = board("8/P7/1P6/8/8/8/8/8");
        assert_eq!(pawn_structure(&b, Color::White), 5 + 2 * 20);
    }

    #[test]
    fn blocked_and_doubled_pawns() {
        // Two white pawns on file a, black pawn ahead on file b.
        let b = board("8/P7/P7/8/1p6/8/8/8");
        assert_eq!(pawn_structure(&b, Color::White), -10);
        // The black pawn advances toward row 0, into the white pawns.
        assert_eq!(pawn_structure(&b, Color::Black), 0);
    }

    #[test]
    fn mobility_counts_center_bonus() {
        let b = board("8/8/8/8/8/8/8/R7");
        // Rook on (7,0): 7 up the file, 7 along the row; none central.
        assert_eq!(mobility(&b, Color::White), 14);

        let b = board("8/8/8/3N4/8/8/8/8");
        // Knight on (3,3): 8 moves, four of them into the center.
        assert_eq!(mobility(&b, Color::White), 8 + 4 * 2);
    }

    #[test]
    fn activity_bonuses() {
        let b = board("8/r7/8/3N4/8/8/R7/8");
        assert_eq!(activity(&b, Color::White), 10 + 10);
        assert_eq!(activity(&b, Color::Black), 10);
    }

    #[test]
    fn evaluate_is_sum_of_terms() {
        let b = board("4k3/pppp4/8/8/8/8/4PPPP/R3K3");
        let parts = breakdown(&b, Color::White);
        assert_eq!(evaluate(&b, Color::White), parts.total());
        assert_eq!(
            material(&b, Color::White) - material(&b, Color::Black),
            -(material(&b, Color::Black) - material(&b, Color::White))
        );
    }
}
