//! Property tests for move generation, evaluation, and search.

use proptest::prelude::*;
use solo_core::{Color, PieceKind, Position};
use solo_engine::eval::material;
use solo_engine::movegen::{
    generate_moves, possible_moves, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS,
    QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};
use solo_engine::{BranchMode, Board, Piece, Searcher};

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn color_strategy() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::ALL.to_vec())
}

prop_compose! {
    /// A board of 3 to 8 rows and columns with a handful of pieces.
    fn arb_board(max_pieces: usize)(
        rows in 3usize..=8,
        cols in 3usize..=8,
        pieces in prop::collection::vec(
            (kind_strategy(), color_strategy(), 0i32..8, 0i32..8, any::<bool>()),
            1..=max_pieces,
        ),
    ) -> Board {
        let mut board = Board::new(rows, cols).unwrap();
        for (kind, color, row, col, moved) in pieces {
            let pos = Position::new(row % rows as i32, col % cols as i32);
            let mut piece = Piece::new(kind, color, pos);
            if moved {
                piece.move_count = 1;
                piece.first_move = false;
            }
            board.place(piece, pos).unwrap();
        }
        board
    }
}

fn directions(kind: PieceKind) -> &'static [(i32, i32)] {
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        _ => &[],
    }
}

proptest! {
    #[test]
    fn destinations_stay_on_board(board in arb_board(10)) {
        for piece in board.pieces() {
            for pos in possible_moves(piece, &board) {
                prop_assert!(board.is_within_bounds(pos), "{} -> {}", piece, pos);
            }
        }
    }

    #[test]
    fn rays_stop_at_first_piece(board in arb_board(10)) {
        for piece in board.pieces().filter(|p| p.kind.is_slider()) {
            let moves = possible_moves(piece, &board);
            for &(dr, dc) in directions(piece.kind) {
                let mut blocked = false;
                let mut pos = piece.position.offset(dr, dc);
                while board.is_within_bounds(pos) {
                    match board.piece_at(pos) {
                        _ if blocked => {
                            prop_assert!(!moves.contains(&pos));
                        }
                        None => {
                            prop_assert!(moves.contains(&pos));
                        }
                        Some(other) => {
                            prop_assert_eq!(moves.contains(&pos), other.color != piece.color);
                            blocked = true;
                        }
                    }
                    pos = pos.offset(dr, dc);
                }
            }
        }
    }

    #[test]
    fn steppers_skip_only_allies(board in arb_board(10)) {
        for piece in board.pieces() {
            let offsets: &[(i32, i32)] = match piece.kind {
                PieceKind::Knight => &KNIGHT_OFFSETS,
                PieceKind::King => &KING_OFFSETS,
                _ => continue,
            };
            let moves = possible_moves(piece, &board);
            prop_assert!(moves.len() <= 8);
            for &(dr, dc) in offsets {
                let pos = piece.position.offset(dr, dc);
                if !board.is_within_bounds(pos) {
                    continue;
                }
                let ally = board.piece_at(pos).map_or(false, |p| p.color == piece.color);
                prop_assert_eq!(moves.contains(&pos), !ally, "{} -> {}", piece, pos);
            }
        }
    }

    #[test]
    fn double_step_needs_first_move_and_clear_path(board in arb_board(10)) {
        for pawn in board.pieces().filter(|p| p.kind == PieceKind::Pawn) {
            let one = pawn.position.offset(pawn.direction, 0);
            let two = pawn.position.offset(2 * pawn.direction, 0);
            let offered = possible_moves(pawn, &board).contains(&two);
            let expected = pawn.first_move && board.is_empty_at(one) && board.is_empty_at(two);
            prop_assert_eq!(offered, expected, "{}", pawn);
        }
    }

    #[test]
    fn material_difference_is_antisymmetric(board in arb_board(10)) {
        let white = material(&board, Color::White);
        let black = material(&board, Color::Black);
        prop_assert_eq!(white - black, -(black - white));
    }

    #[test]
    fn make_unmake_restores_and_matches_copy(board in arb_board(8), color in color_strategy()) {
        let mut working = board.copy();
        for m in generate_moves(&board, color) {
            let mut copied = board.copy();
            copied.apply_move(&m).unwrap();

            let undo = working.make_move(&m).unwrap();
            prop_assert_eq!(&working, &copied, "{}", m);
            working.unmake_move(undo);
            prop_assert_eq!(&working, &board, "{}", m);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn pruning_does_not_change_result(
        board in arb_board(5),
        color in color_strategy(),
        depth in 1u32..=2,
    ) {
        let pruned = Searcher::new(depth).search(&board, color);
        let full = Searcher::new(depth).with_alpha_beta(false).search(&board, color);
        prop_assert_eq!(pruned.best, full.best);
        prop_assert_eq!(pruned.score, full.score);
        prop_assert!(pruned.nodes <= full.nodes);
    }

    #[test]
    fn branch_modes_agree(board in arb_board(5), color in color_strategy()) {
        let a = Searcher::new(2).search(&board, color);
        let b = Searcher::new(2).with_branching(BranchMode::Copy).search(&board, color);
        prop_assert_eq!(a, b);
    }
}
