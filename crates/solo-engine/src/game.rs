//! Match state shared between the controller and the engine.
//!
//! A [`GameState`] is created once per match and owned by whoever drives the
//! turns. It tracks the round timer, score, difficulty, the played moves, and
//! their notation record.

use crate::pgn::PgnRecorder;
use crate::rules::{GameResult, RuleSet, SoloRules, VersusRules};
use crate::Board;
use serde::{Deserialize, Serialize};
use solo_core::{Color, Move, MoveHistory};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a difficulty or mode name is not recognized.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseSettingError {
    #[error("unknown difficulty: {0}")]
    Difficulty(String),
    #[error("unknown match mode: {0}")]
    Mode(String),
}

/// Engine strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Search depth in plies used at this difficulty.
    pub const fn search_depth(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 3,
            Difficulty::Hard => 4,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseSettingError::Difficulty(s.to_string())),
        }
    }
}

/// Which rules end the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Clear the board down to the White king.
    Solo,
    /// White against the engine playing Black.
    #[default]
    Versus,
}

impl RuleSet for MatchMode {
    fn game_result(&self, board: &Board, side_to_move: Color) -> Option<GameResult> {
        match self {
            MatchMode::Solo => SoloRules.game_result(board, side_to_move),
            MatchMode::Versus => VersusRules.game_result(board, side_to_move),
        }
    }
}

impl FromStr for MatchMode {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solo" => Ok(MatchMode::Solo),
            "versus" => Ok(MatchMode::Versus),
            _ => Err(ParseSettingError::Mode(s.to_string())),
        }
    }
}

/// Match settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Length of one round in seconds. Defaults to 300.
    #[serde(default = "default_round_seconds")]
    pub round_seconds: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Points awarded per player move. Defaults to 10.
    #[serde(default = "default_score_increment")]
    pub score_increment: u32,
    #[serde(default)]
    pub mode: MatchMode,
}

fn default_round_seconds() -> u32 {
    300
}

fn default_score_increment() -> u32 {
    10
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            round_seconds: default_round_seconds(),
            difficulty: Difficulty::default(),
            score_increment: default_score_increment(),
            mode: MatchMode::default(),
        }
    }
}

/// Per-match context: timer, score, round, and move record.
#[derive(Debug, Clone)]
pub struct GameState {
    config: MatchConfig,
    timer: f32,
    score: u32,
    difficulty: Difficulty,
    round: u32,
    history: MoveHistory,
    pgn: PgnRecorder,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl GameState {
    /// Starts round 1 with a full timer.
    pub fn new(config: MatchConfig) -> Self {
        GameState {
            config,
            timer: config.round_seconds as f32,
            score: 0,
            difficulty: config.difficulty,
            round: 1,
            history: MoveHistory::new(),
            pgn: PgnRecorder::new(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn mode(&self) -> MatchMode {
        self.config.mode
    }

    /// Seconds left in the round.
    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn set_timer(&mut self, seconds: f32) {
        self.timer = seconds.max(0.0);
    }

    /// Counts the timer down by `delta` seconds, stopping at zero.
    pub fn update_timer(&mut self, delta: f32) {
        self.timer = (self.timer - delta).max(0.0);
    }

    /// Returns true once the round timer has run out.
    pub fn is_game_over(&self) -> bool {
        self.timer <= 0.0
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    pub fn increment_score(&mut self) {
        self.score += self.config.score_increment;
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Moves to the next round: the timer is refilled and the move record of
    /// the finished round is dropped.
    pub fn advance_round(&mut self) {
        self.round += 1;
        self.timer = self.config.round_seconds as f32;
        self.history.clear();
        self.pgn.clear();
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Appends a played move to the history and the notation record.
    pub fn record_move(&mut self, m: Move) {
        self.history.push(m);
        self.pgn.record(&m);
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn pgn(&self) -> &PgnRecorder {
        &self.pgn
    }
}
