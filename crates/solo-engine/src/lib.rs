//! Solo chess engine on a tile-grid board.
//!
//! This crate provides:
//! - [`Board`] - rectangular grid of [`Tile`]s with observers and make/unmake
//! - [`Piece`] - a piece with its move count and pawn direction
//! - Move generation ([`movegen`]) and check detection ([`rules`])
//! - [`GameState`] - timer, score, round, and the move record of a match
//! - [`PgnRecorder`] - algebraic-style move notation
//! - [`eval`] and [`Searcher`] - static evaluation and minimax search
//! - [`Controller`] - turn handling and match outcome
//!
//! # Architecture
//!
//! Value types (positions, colors, moves) live in `solo_core`. The board owns
//! its pieces through its tiles; move generation reads the board and never
//! mutates it. The searcher works on a private copy of the board, so the live
//! match board is only ever changed by the controller.
//!
//! # Example
//!
//! ```
//! use solo_core::{Color, Placement};
//! use solo_engine::{movegen, Board, Searcher};
//!
//! let placement = Placement::parse("4k3/8/8/3q4/8/8/8/3RK3").unwrap();
//! let board = Board::from_placement(&placement).unwrap();
//! println!("{} moves for White", movegen::generate_moves(&board, Color::White).len());
//!
//! let best = Searcher::new(1).get_best_move(&board, Color::White).unwrap();
//! println!("engine plays {}", best);
//! ```

mod board;
mod controller;
pub mod eval;
mod game;
pub mod movegen;
mod pgn;
mod piece;
pub mod rules;
mod search;
mod tile;

pub use board::{Board, BoardError, BoardObserver, Undo};
pub use controller::{Controller, InputOutcome, SOLO_HANDOVER_AFTER};
pub use eval::{evaluate, Breakdown};
pub use game::{Difficulty, GameState, MatchConfig, MatchMode, ParseSettingError};
pub use movegen::{generate_moves, moves_for, possible_moves};
pub use pgn::{encode, PgnError, PgnRecorder};
pub use piece::Piece;
pub use rules::{is_checkmate, is_in_check, legal_moves, DrawReason, GameResult, RuleSet};
pub use search::{BranchMode, SearchConfig, SearchResult, Searcher};
pub use tile::Tile;
