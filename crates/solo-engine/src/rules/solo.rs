//! Solo rules: clear the board down to the White king.
//!
//! The player wins once the king is the only piece left. The match is lost
//! as soon as more than one Black piece stands on the board, or every piece
//! left is Black. Black never moves in Solo mode; it gains pieces because a
//! White piece changes sides after its second move.

use super::{GameResult, RuleSet};
use crate::Board;
use solo_core::{Color, PieceKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct SoloRules;

impl RuleSet for SoloRules {
    fn game_result(&self, board: &Board, _side_to_move: Color) -> Option<GameResult> {
        let mut total = 0;
        let mut black = 0;
        let mut has_king = false;
        for piece in board.pieces() {
            total += 1;
            if piece.color == Color::Black {
                black += 1;
            }
            if piece.kind == PieceKind::King {
                has_king = true;
            }
        }

        if total == 1 && has_king {
            Some(GameResult::Won)
        } else if black == total || black > 1 {
            Some(GameResult::Lost)
        } else {
            None
        }
    }
}
