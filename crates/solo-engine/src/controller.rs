//! Turn handling for a single match.
//!
//! The [`Controller`] turns square picks into moves, asks the [`Searcher`]
//! for the engine's replies, keeps the [`GameState`] up to date, and decides
//! when the match is over according to its [`MatchMode`].
//!
//! White is always the player. In Solo mode White moves every turn; in
//! Versus mode the engine answers as Black.

use crate::game::{Difficulty, GameState, MatchMode};
use crate::movegen;
use crate::rules::{self, GameResult, RuleSet};
use crate::search::{SearchConfig, Searcher};
use crate::{Board, BoardObserver};
use solo_core::{Color, Move, Position};

/// Moves after which a White piece changes sides in Solo mode.
pub const SOLO_HANDOVER_AFTER: u32 = 2;

/// What a square pick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The match is over or the square is off the board.
    Ignored,
    /// A piece of the side to move is now selected.
    Selected(Position),
    /// The selection was cleared.
    Deselected,
    /// The selected piece moved.
    Moved(Move),
    /// The pick was neither a selectable piece nor a legal destination.
    Rejected,
}

/// Drives one match on one board.
#[derive(Debug)]
pub struct Controller {
    board: Board,
    initial: Board,
    state: GameState,
    search_config: SearchConfig,
    searcher: Searcher,
    selected: Option<Position>,
    side_to_move: Color,
    result: Option<GameResult>,
}

impl Controller {
    pub fn new(board: Board, state: GameState, search_config: SearchConfig) -> Self {
        let searcher = Searcher::from_config(&search_config, state.difficulty());
        Controller {
            initial: board.copy(),
            board,
            state,
            search_config,
            searcher,
            selected: None,
            side_to_move: Color::White,
            result: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> MatchMode {
        self.state.mode()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Registers a board observer, e.g. a renderer.
    pub fn add_observer<O: BoardObserver + 'static>(&mut self, observer: O) {
        self.board.add_observer(observer);
    }

    /// Changes the engine strength. An explicitly configured depth still wins.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.set_difficulty(difficulty);
        self.searcher.set_depth(self.search_config.depth_for(difficulty));
    }

    /// Handles a square pick: the first pick selects a piece, the second
    /// moves it.
    pub fn handle_input(&mut self, pos: Position) -> InputOutcome {
        if self.is_finished() || !self.board.is_within_bounds(pos) {
            return InputOutcome::Ignored;
        }

        let Some(from) = self.selected else {
            return self.select(pos);
        };

        if from == pos {
            self.selected = None;
            return InputOutcome::Deselected;
        }

        if let Some(m) = self.play_move(from, pos) {
            return InputOutcome::Moved(m);
        }

        let own = self
            .board
            .piece_at(pos)
            .map_or(false, |p| p.color == self.side_to_move);
        if own {
            self.select(pos)
        } else {
            InputOutcome::Rejected
        }
    }

    fn select(&mut self, pos: Position) -> InputOutcome {
        match self.board.piece_at(pos) {
            Some(p) if p.color == self.side_to_move => {
                tracing::debug!(piece = %p, "selected");
                self.selected = Some(pos);
                InputOutcome::Selected(pos)
            }
            _ => {
                self.selected = None;
                InputOutcome::Rejected
            }
        }
    }

    /// Moves the side to move's piece from `start` to `end` if that is legal,
    /// returning the move played.
    pub fn play_move(&mut self, start: Position, end: Position) -> Option<Move> {
        if self.is_finished() {
            return None;
        }
        let Some(m) = self.find_move(start, end) else {
            tracing::warn!(%start, %end, side = %self.side_to_move, "rejected move");
            return None;
        };
        if let Err(err) = self.board.apply_move(&m) {
            tracing::warn!(%err, "move could not be applied");
            return None;
        }

        self.selected = None;
        self.state.increment_score();
        self.finish_turn(m);
        Some(m)
    }

    /// Same as [`play_move`](Self::play_move), reporting only success.
    pub fn try_move(&mut self, start: Position, end: Position) -> bool {
        self.play_move(start, end).is_some()
    }

    fn find_move(&self, start: Position, end: Position) -> Option<Move> {
        let piece = self.board.piece_at(start)?;
        if piece.color != self.side_to_move {
            return None;
        }
        let candidates = movegen::moves_for(piece, &self.board);
        candidates.into_iter().find(|m| {
            m.end == end
                && (self.mode() == MatchMode::Solo || rules::leaves_king_safe(&self.board, m))
        })
    }

    /// Lets the engine move for the side to move. Only Black is played by the
    /// engine, and only in Versus mode.
    pub fn play_engine_turn(&mut self) -> Option<Move> {
        if self.is_finished()
            || self.mode() != MatchMode::Versus
            || self.side_to_move != Color::Black
        {
            return None;
        }

        self.searcher.set_game_over(self.state.is_game_over());
        let side = self.side_to_move;
        let m = match self.searcher.get_best_move(&self.board, side) {
            Some(m) if rules::leaves_king_safe(&self.board, &m) => m,
            Some(m) => {
                tracing::warn!(mv = %m, "engine move leaves king in check, falling back");
                rules::legal_moves(&self.board, side).into_iter().next()?
            }
            None => {
                self.check_finished();
                return None;
            }
        };

        if let Err(err) = self.board.apply_move(&m) {
            tracing::warn!(%err, "engine move could not be applied");
            return None;
        }
        self.finish_turn(m);
        Some(m)
    }

    fn finish_turn(&mut self, m: Move) {
        if self.mode() == MatchMode::Solo {
            self.hand_over_worn_piece(m.end);
        }
        self.state.record_move(m);
        tracing::info!(mv = %m, score = self.state.score(), "move played");
        if self.mode() == MatchMode::Versus {
            self.side_to_move = self.side_to_move.opposite();
        }
        self.check_finished();
    }

    /// Solo mode: a White piece that has moved twice now belongs to Black.
    fn hand_over_worn_piece(&mut self, pos: Position) {
        let worn = self
            .board
            .piece_at(pos)
            .map_or(false, |p| p.color == Color::White && p.move_count >= SOLO_HANDOVER_AFTER);
        if worn && self.board.recolor(pos, Color::Black).unwrap_or(false) {
            tracing::debug!(%pos, "piece handed to Black");
        }
    }

    fn check_finished(&mut self) {
        self.result = self.mode().game_result(&self.board, self.side_to_move);
        if let Some(result) = self.result {
            tracing::info!(?result, round = self.state.round(), "match finished");
        }
    }

    /// Advances the round timer; the match is lost when it runs out.
    pub fn update(&mut self, delta: f32) {
        if self.is_finished() {
            return;
        }
        self.state.update_timer(delta);
        if self.state.is_game_over() {
            tracing::info!(round = self.state.round(), "time is up");
            self.result = Some(GameResult::Lost);
        }
    }

    /// Restores the starting board and begins the next round with a zero
    /// score.
    pub fn reset(&mut self) {
        self.board.restore_from(&self.initial);
        self.state.set_score(0);
        self.state.advance_round();
        self.selected = None;
        self.side_to_move = Color::White;
        self.result = None;
        tracing::info!(round = self.state.round(), "board reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MatchConfig;
    use solo_core::{PieceKind, Placement};

    fn controller(placement: &str, mode: MatchMode) -> Controller {
        let board = Board::from_placement(&Placement::parse(placement).unwrap()).unwrap();
        let state = GameState::new(MatchConfig {
            mode,
            difficulty: Difficulty::Easy,
            ..MatchConfig::default()
        });
        Controller::new(board, state, SearchConfig::default())
    }

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn select_then_move() {
        let mut c = controller("8/8/8/8/8/8/3p4/4K3", MatchMode::Solo);
        assert_eq!(c.handle_input(pos(6, 3)), InputOutcome::Rejected);
        assert_eq!(c.handle_input(pos(7, 4)), InputOutcome::Selected(pos(7, 4)));
        match c.handle_input(pos(6, 3)) {
            InputOutcome::Moved(m) => {
                assert_eq!(m.kind, PieceKind::King);
                assert!(m.is_capture);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(c.result(), Some(GameResult::Won));
        assert_eq!(c.state().score(), 10);
        assert_eq!(c.handle_input(pos(6, 3)), InputOutcome::Ignored);
    }

    #[test]
    fn invalid_destination_keeps_selection() {
        let mut c = controller("8/8/8/8/8/8/3p4/R3K3", MatchMode::Solo);
        c.handle_input(pos(7, 0));
        assert_eq!(c.handle_input(pos(5, 5)), InputOutcome::Rejected);
        assert_eq!(c.selected(), Some(pos(7, 0)));
        assert_eq!(c.handle_input(pos(7, 4)), InputOutcome::Selected(pos(7, 4)));
        assert_eq!(c.handle_input(pos(7, 4)), InputOutcome::Deselected);
        assert_eq!(c.handle_input(pos(9, 9)), InputOutcome::Ignored);
        assert_eq!(c.state().score(), 0);
        assert!(c.state().history().is_empty());
    }

    #[test]
    fn queen_turning_black_loses_solo() {
        let mut c = controller("8/8/8/3p4/8/8/3Q4/4K3", MatchMode::Solo);
        assert!(c.play_move(pos(6, 3), pos(5, 3)).is_some());
        assert!(c.result().is_none());
        // Second queen move: it changes sides, leaving two black pieces.
        assert!(c.play_move(pos(5, 3), pos(4, 3)).is_some());
        assert_eq!(c.result(), Some(GameResult::Lost));
    }

    #[test]
    fn solo_piece_changes_sides_after_two_moves() {
        let mut c = controller("8/8/8/8/8/8/3p4/R3K3", MatchMode::Solo);
        assert!(c.try_move(pos(7, 0), pos(5, 0)));
        assert_eq!(c.board().piece_at(pos(5, 0)).unwrap().color, Color::White);
        assert!(c.result().is_none());

        assert!(c.try_move(pos(5, 0), pos(5, 1)));
        let rook = c.board().piece_at(pos(5, 1)).unwrap();
        assert_eq!(rook.color, Color::Black);
        assert_eq!(rook.move_count, 2);
        // The rook joins the black pawn: two black pieces.
        assert_eq!(c.result(), Some(GameResult::Lost));
        assert_eq!(c.state().last_move().unwrap().color, Color::White);
    }

    #[test]
    fn solo_two_handed_over_pieces_lose() {
        let mut c = controller("8/8/8/8/8/8/8/RN2K3", MatchMode::Solo);
        assert!(c.try_move(pos(7, 0), pos(4, 0)));
        assert!(c.try_move(pos(4, 0), pos(4, 3)));
        assert!(c.result().is_none());
        assert_eq!(c.board().piece_at(pos(4, 3)).unwrap().color, Color::Black);

        assert!(c.try_move(pos(7, 1), pos(5, 2)));
        assert!(c.try_move(pos(5, 2), pos(3, 1)));
        assert_eq!(c.result(), Some(GameResult::Lost));
    }

    #[test]
    fn versus_pieces_keep_their_color() {
        let mut c = controller("4k3/8/8/8/8/8/8/R3K3", MatchMode::Versus);
        assert!(c.try_move(pos(7, 0), pos(5, 0)));
        c.play_engine_turn().unwrap();
        assert!(c.try_move(pos(5, 0), pos(5, 1)));
        let rook = c.board().piece_at(pos(5, 1)).unwrap();
        assert_eq!(rook.color, Color::White);
        assert_eq!(rook.move_count, 2);
    }

    #[test]
    fn versus_checkmate_wins() {
        let mut c = controller("4k3/R7/1R6/8/8/8/8/4K3", MatchMode::Versus);
        let m = c.play_move(pos(2, 1), pos(0, 1)).unwrap();
        assert_eq!(m.kind, PieceKind::Rook);
        assert_eq!(c.result(), Some(GameResult::Won));
        assert_eq!(c.play_engine_turn(), None);
    }

    #[test]
    fn versus_alternates_with_engine() {
        let mut c = controller("4k3/8/8/3q4/8/8/8/3RK3", MatchMode::Versus);
        assert_eq!(c.play_engine_turn(), None);
        assert!(c.try_move(pos(7, 3), pos(6, 3)));
        assert_eq!(c.side_to_move(), Color::Black);
        assert!(!c.try_move(pos(7, 4), pos(7, 5)));

        let reply = c.play_engine_turn().unwrap();
        assert_eq!(reply.color, Color::Black);
        assert_eq!(c.side_to_move(), Color::White);
        assert_eq!(c.state().history().len(), 2);
        assert_eq!(c.state().pgn().moves()[0], "1. Rd7");
        assert_eq!(c.state().score(), 10);
    }

    #[test]
    fn king_may_not_walk_into_check() {
        let mut c = controller("4k3/8/8/8/8/8/r7/4K3", MatchMode::Versus);
        assert!(!c.try_move(pos(7, 4), pos(6, 4)));
        assert!(c.try_move(pos(7, 4), pos(7, 5)));
    }

    #[test]
    fn timer_expiry_loses() {
        let mut c = controller("8/8/8/8/8/8/3p4/4K3", MatchMode::Solo);
        c.update(100.0);
        assert!(!c.is_finished());
        c.update(250.0);
        assert_eq!(c.result(), Some(GameResult::Lost));
        assert_eq!(c.state().timer(), 0.0);
    }

    #[test]
    fn reset_restores_board_and_advances_round() {
        let mut c = controller("8/8/8/8/8/8/3p4/R3K3", MatchMode::Solo);
        let initial = c.board().copy();
        c.play_move(pos(7, 0), pos(3, 0)).unwrap();
        c.update(50.0);
        c.reset();
        assert_eq!(c.board(), &initial);
        assert_eq!(c.state().round(), 2);
        assert_eq!(c.state().score(), 0);
        assert_eq!(c.state().timer(), 300.0);
        assert!(c.state().history().is_empty());
        assert!(!c.is_finished());
    }

    #[test]
    fn difficulty_sets_search_depth() {
        let mut c = controller("4k3/8/8/8/8/8/8/4K3", MatchMode::Versus);
        c.set_difficulty(Difficulty::Hard);
        assert_eq!(c.state().difficulty(), Difficulty::Hard);
        assert_eq!(c.searcher.depth(), 4);
    }
}
