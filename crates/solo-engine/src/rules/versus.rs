//! Head-to-head rules: White against the engine's Black.

use super::{
    has_any_move, is_color_in_check, is_insufficient_material, DrawReason, GameResult, RuleSet,
};
use crate::Board;
use solo_core::Color;

/// Ends the match on checkmate, stalemate, or bare kings.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersusRules;

impl RuleSet for VersusRules {
    fn game_result(&self, board: &Board, side_to_move: Color) -> Option<GameResult> {
        if is_insufficient_material(board) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }

        if has_any_move(board, side_to_move) {
            return None;
        }

        if is_color_in_check(board, side_to_move) {
            // Checkmate: the side to move loses
            Some(match side_to_move {
                Color::White => GameResult::Lost,
                Color::Black => GameResult::Won,
            })
        } else {
            Some(GameResult::Draw(DrawReason::Stalemate))
        }
    }
}
