//! Pieces as they live on the board.

use solo_core::{Color, PieceError, PieceKind, Position};

/// A piece with its mutable game state.
///
/// The piece records where it stands and how often it has moved; the board
/// keeps this in sync with the tile that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Position,
    pub move_count: u32,
    /// Pawn only: whether the two-row advance is still available.
    pub first_move: bool,
    /// Pawn only: row delta of a forward step (+1 or -1).
    pub direction: i32,
}

impl Piece {
    /// Number of moves after which a Queen is handed over to Black.
    pub const QUEEN_RECOLOR_AFTER: u32 = 2;

    /// Creates an unmoved piece. Pawns advance in their color's default
    /// direction.
    pub const fn new(kind: PieceKind, color: Color, position: Position) -> Self {
        Piece {
            kind,
            color,
            position,
            move_count: 0,
            first_move: true,
            direction: color.pawn_direction(),
        }
    }

    /// Creates an unmoved pawn with an explicit forward direction.
    pub const fn pawn(color: Color, position: Position, direction: i32) -> Self {
        let mut pawn = Piece::new(PieceKind::Pawn, color, position);
        pawn.direction = if direction < 0 { -1 } else { 1 };
        pawn
    }

    /// Creates a piece from tile-property tags such as `("rook", "black")`.
    pub fn from_tags(kind: &str, color: &str, position: Position) -> Result<Self, PieceError> {
        Ok(Piece::new(kind.parse()?, color.parse()?, position))
    }

    /// Updates position and move count after the board relocated the piece.
    ///
    /// A Queen changes sides to Black once it has moved
    /// [`QUEEN_RECOLOR_AFTER`](Self::QUEEN_RECOLOR_AFTER) times.
    pub fn record_move(&mut self, to: Position) {
        self.position = to;
        self.move_count += 1;
        self.first_move = false;
        if self.kind == PieceKind::Queen && self.move_count >= Self::QUEEN_RECOLOR_AFTER {
            self.color = Color::Black;
        }
    }

    #[inline]
    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.color != other.color
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.move_count > 0
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) at {}", self.kind, self.color, self.position)
    }
}
