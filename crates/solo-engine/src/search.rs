//! Minimax search with optional alpha-beta pruning.
//!
//! The search never touches the caller's board: [`Searcher::search`] works on
//! a private copy, branching either with make/unmake on that one copy or with
//! a fresh copy per child. Both modes visit moves in the same order and give
//! the same result.
//!
//! Moves are tried in generation order (pieces row-major, then each piece's
//! own destination order), and a later move replaces the current best only if
//! it scores strictly higher, so the first of several equal moves wins.

use crate::eval::evaluate;
use crate::game::Difficulty;
use crate::movegen::generate_moves;
use crate::rules::is_insufficient_material;
use crate::Board;
use serde::{Deserialize, Serialize};
use solo_core::{Color, Move};

/// How the search produces child positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchMode {
    /// Apply and revert moves on a single board.
    #[default]
    MakeUnmake,
    /// Copy the board for every child.
    Copy,
}

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fixed search depth in plies. When unset the difficulty decides.
    #[serde(default)]
    pub depth: Option<u32>,
    /// Prune with alpha-beta. Defaults to true.
    #[serde(default = "default_alpha_beta")]
    pub alpha_beta: bool,
    #[serde(default)]
    pub branching: BranchMode,
}

fn default_alpha_beta() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: None,
            alpha_beta: default_alpha_beta(),
            branching: BranchMode::default(),
        }
    }
}

impl SearchConfig {
    /// The configured depth, or the difficulty's depth if none is set.
    pub fn depth_for(&self, difficulty: Difficulty) -> u32 {
        self.depth.unwrap_or_else(|| difficulty.search_depth())
    }
}

/// Outcome of a root search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// The chosen move, or `None` when there is nothing to play.
    pub best: Option<Move>,
    /// Score of the chosen move for the searching color.
    pub score: i32,
    /// Positions visited.
    pub nodes: u64,
}

/// Search state
#[derive(Debug, Clone)]
pub struct Searcher {
    depth: u32,
    alpha_beta: bool,
    branching: BranchMode,
    game_over: bool,
    nodes: u64,
}

impl Searcher {
    /// Alpha-beta search to `depth` plies using make/unmake.
    pub fn new(depth: u32) -> Self {
        Searcher {
            depth: depth.max(1),
            alpha_beta: true,
            branching: BranchMode::MakeUnmake,
            game_over: false,
            nodes: 0,
        }
    }

    pub fn from_config(config: &SearchConfig, difficulty: Difficulty) -> Self {
        Self::new(config.depth_for(difficulty))
            .with_alpha_beta(config.alpha_beta)
            .with_branching(config.branching)
    }

    pub fn with_alpha_beta(mut self, enabled: bool) -> Self {
        self.alpha_beta = enabled;
        self
    }

    pub fn with_branching(mut self, mode: BranchMode) -> Self {
        self.branching = mode;
        self
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.depth = depth.max(1);
    }

    /// Signals that the match has ended outside the board (for example on
    /// time). Every node is then scored statically and no move is chosen.
    pub fn set_game_over(&mut self, over: bool) {
        self.game_over = over;
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Best move for `color`, or `None` if it has none or only kings remain.
    pub fn get_best_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        self.search(board, color).best
    }

    /// Searches the root position to the configured depth.
    pub fn search(&mut self, board: &Board, color: Color) -> SearchResult {
        self.nodes = 0;
        let mut root = board.copy();

        if self.game_over || is_insufficient_material(&root) {
            let score = evaluate(&root, color);
            tracing::debug!(%color, score, "no search: position is terminal");
            return SearchResult {
                best: None,
                score,
                nodes: 0,
            };
        }

        let mut best: Option<Move> = None;
        let mut best_score = i32::MIN;
        let mut alpha = i32::MIN;

        for m in generate_moves(&root, color) {
            let child = self.child(&mut root, &m, self.depth - 1, alpha, i32::MAX, false, color);
            let Some(score) = child else {
                continue;
            };
            tracing::trace!(mv = %m, score, "root move");

            if best.is_none() || score > best_score {
                best = Some(m);
                best_score = score;
            }
            if self.alpha_beta {
                alpha = alpha.max(score);
            }
        }

        let score = if best.is_some() {
            best_score
        } else {
            evaluate(&root, color)
        };
        tracing::debug!(
            %color,
            depth = self.depth,
            nodes = self.nodes,
            score,
            best = ?best,
            "search finished"
        );
        SearchResult {
            best,
            score,
            nodes: self.nodes,
        }
    }

    /// Scores `board` for `color` looking `depth` plies ahead.
    ///
    /// `maximizing` is true when `color` is to move. The result is fail-soft:
    /// outside the `(alpha, beta)` window it is a bound, not the exact value.
    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        color: Color,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 || self.game_over {
            return evaluate(board, color);
        }

        let side = if maximizing { color } else { color.opposite() };
        let moves = generate_moves(board, side);
        if moves.is_empty() {
            return evaluate(board, color);
        }

        if maximizing {
            let mut best = i32::MIN;
            for m in &moves {
                let Some(score) = self.child(board, m, depth - 1, alpha, beta, false, color) else {
                    continue;
                };
                best = best.max(score);
                if self.alpha_beta {
                    alpha = alpha.max(score);
                    if beta <= alpha {
                        break;
                    }
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for m in &moves {
                let Some(score) = self.child(board, m, depth - 1, alpha, beta, true, color) else {
                    continue;
                };
                best = best.min(score);
                if self.alpha_beta {
                    beta = beta.min(score);
                    if beta <= alpha {
                        break;
                    }
                }
            }
            best
        }
    }

    /// Plays `m`, searches the resulting position, and restores the board.
    #[allow(clippy::too_many_arguments)]
    fn child(
        &mut self,
        board: &mut Board,
        m: &Move,
        depth: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
        color: Color,
    ) -> Option<i32> {
        match self.branching {
            BranchMode::MakeUnmake => {
                let undo = board.make_move(m).ok()?;
                let score = self.minimax(board, depth, alpha, beta, maximizing, color);
                board.unmake_move(undo);
                Some(score)
            }
            BranchMode::Copy => {
                let mut next = board.copy();
                next.apply_move(m).ok()?;
                Some(self.minimax(&mut next, depth, alpha, beta, maximizing, color))
            }
        }
    }
}
