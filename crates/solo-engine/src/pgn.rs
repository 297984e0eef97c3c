//! Move notation and the per-match move record.
//!
//! Notation is algebraic-style: a piece letter (none for pawns), an `x` on
//! captures, then the destination file (`'a' + col`, continuing with `aa`
//! past `z`) and rank (`row + 1`).
//! Pawn captures name the file they left, and en-passant captures carry an
//! ` e.p.` suffix. Examples: `"Rb4"`, `"Nxf6"`, `"exd6 e.p."`.

use solo_core::{Move, PieceKind, Position};
use thiserror::Error;

/// Error type for reading recorded move text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PgnError {
    /// A move number was not followed by a move.
    #[error("move number {0:?} has no move after it")]
    DanglingMoveNumber(String),
    /// An annotation appeared before any move.
    #[error("annotation {0:?} does not follow a move")]
    MisplacedAnnotation(String),
    /// A move number appeared before a Black move or out of sequence.
    #[error("move number {0:?} is out of place")]
    MisplacedMoveNumber(String),
    /// A White move was not preceded by its move number.
    #[error("move {0:?} has no move number")]
    MissingMoveNumber(String),
}

const EN_PASSANT_SUFFIX: &str = "e.p.";

/// Encodes one move, without a move number.
pub fn encode(
    kind: PieceKind,
    start: Position,
    end: Position,
    capture: bool,
    en_passant: bool,
) -> String {
    let mut text = String::with_capacity(8);
    match kind.letter() {
        None => {
            if capture {
                text.push_str(&start.file_name());
                text.push('x');
            }
            push_square(&mut text, end);
            if en_passant {
                text.push(' ');
                text.push_str(EN_PASSANT_SUFFIX);
            }
        }
        Some(letter) => {
            text.push(letter);
            if capture {
                text.push('x');
            }
            push_square(&mut text, end);
        }
    }
    text
}

fn push_square(text: &mut String, pos: Position) {
    text.push_str(&pos.file_name());
    text.push_str(&(pos.row + 1).to_string());
}

/// Ordered record of encoded moves for one match.
///
/// Owns the move counter: the first move recorded is move 1, and every odd
/// (White) move is prefixed with its full-move number, as in `"1. Rb4"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnRecorder {
    moves: Vec<String>,
    move_number: u32,
}

impl Default for PgnRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl PgnRecorder {
    pub fn new() -> Self {
        PgnRecorder {
            moves: Vec::new(),
            move_number: 1,
        }
    }

    /// Encodes and appends a move, returning the recorded text.
    pub fn add_move(
        &mut self,
        kind: PieceKind,
        start: Position,
        end: Position,
        capture: bool,
        en_passant: bool,
    ) -> &str {
        let mut text = encode(kind, start, end, capture, en_passant);
        if self.move_number % 2 != 0 {
            text.insert_str(0, &format!("{}. ", self.move_number / 2 + 1));
        }
        self.moves.push(text);
        self.move_number += 1;
        self.moves.last().map_or("", String::as_str)
    }

    /// Appends a played move.
    pub fn record(&mut self, m: &Move) -> &str {
        self.add_move(m.kind, m.start, m.end, m.is_capture, m.is_en_passant)
    }

    /// Recorded entries, oldest first.
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    /// The number the next recorded move will get.
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn clear(&mut self) {
        self.moves.clear();
        self.move_number = 1;
    }

    /// Renders the record as text, one full move per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.moves.iter().enumerate() {
            if i > 0 {
                out.push(if i % 2 == 0 { '\n' } else { ' ' });
            }
            out.push_str(entry);
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Rebuilds a record from text produced by [`to_text`](Self::to_text).
    ///
    /// Line breaks are not significant. Move numbers are rejoined with the
    /// move they precede and `e.p.` with the move it follows.
    pub fn parse_text(text: &str) -> Result<Self, PgnError> {
        let mut recorder = PgnRecorder::new();
        let mut pending_number: Option<&str> = None;

        for token in text.split_whitespace() {
            if token == EN_PASSANT_SUFFIX {
                if pending_number.is_some() {
                    return Err(PgnError::MisplacedAnnotation(token.to_string()));
                }
                let last = recorder
                    .moves
                    .last_mut()
                    .ok_or_else(|| PgnError::MisplacedAnnotation(token.to_string()))?;
                last.push(' ');
                last.push_str(token);
            } else if let Some(number) = move_number(token) {
                if let Some(number) = pending_number {
                    return Err(PgnError::DanglingMoveNumber(number.to_string()));
                }
                let white_to_move = recorder.moves.len() % 2 == 0;
                let expected = (recorder.moves.len() / 2 + 1) as u64;
                if !white_to_move || number != Some(expected) {
                    return Err(PgnError::MisplacedMoveNumber(token.to_string()));
                }
                pending_number = Some(token);
            } else {
                let entry = match pending_number.take() {
                    Some(number) => format!("{} {}", number, token),
                    None if recorder.moves.len() % 2 == 0 => {
                        return Err(PgnError::MissingMoveNumber(token.to_string()));
                    }
                    None => token.to_string(),
                };
                recorder.moves.push(entry);
                recorder.move_number += 1;
            }
        }

        match pending_number {
            Some(number) => Err(PgnError::DanglingMoveNumber(number.to_string())),
            None => Ok(recorder),
        }
    }
}

/// Recognizes a `"<digits>."` token. The inner value is `None` when the digits
/// do not fit a `u64`.
fn move_number(token: &str) -> Option<Option<u64>> {
    let digits = token.strip_suffix('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().ok())
}
