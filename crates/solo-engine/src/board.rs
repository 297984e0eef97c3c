//! Tile-grid board.
//!
//! The [`Board`] owns a rectangular grid of [`Tile`]s. Each occupied tile owns
//! exactly one [`Piece`]; the piece's own `position` is kept in sync by every
//! mutating call. The board does not judge legality: callers ask the move
//! generator first and then apply.
//!
//! Speculative play uses either [`Board::copy`] (an independent deep clone
//! without observers) or [`Board::make_move`] / [`Board::unmake_move`], which
//! mutate in place and restore the exact prior state from an [`Undo`] record.

use crate::movegen;
use crate::{Piece, Tile};
use solo_core::{Color, Extent, Move, PieceKind, Placement, Position};
use std::fmt;
use thiserror::Error;

/// Errors raised by board mutations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("invalid board dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
}

/// Receives a notification after every board mutation.
///
/// The notification carries no payload; observers re-read the board.
pub trait BoardObserver {
    fn board_changed(&mut self);
}

impl<F: FnMut()> BoardObserver for F {
    fn board_changed(&mut self) {
        self()
    }
}

/// Snapshot needed to revert a move applied with [`Board::make_move`].
#[derive(Debug, Clone)]
pub struct Undo {
    tiles: Vec<(Position, Tile)>,
    last_move: Option<Move>,
}

/// A rectangular board of tiles.
pub struct Board {
    extent: Extent,
    tiles: Vec<Tile>,
    last_move: Option<Move>,
    observers: Vec<Box<dyn BoardObserver>>,
}

impl Board {
    /// Creates an empty board. All tile ids are 0.
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 || rows > i32::MAX as usize || cols > i32::MAX as usize {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        Ok(Board {
            extent: Extent::new(rows, cols),
            tiles: vec![Tile::Empty { id: 0 }; rows * cols],
            last_move: None,
            observers: Vec::new(),
        })
    }

    /// Creates an empty square board.
    pub fn square(size: usize) -> Result<Self, BoardError> {
        Self::new(size, size)
    }

    /// Builds a board from an imported placement, keeping each cell's tile id.
    pub fn from_placement(placement: &Placement) -> Result<Self, BoardError> {
        let extent = placement.extent();
        let mut board = Self::new(extent.rows, extent.cols)?;
        for (tile, (pos, cell)) in board.tiles.iter_mut().zip(placement.iter()) {
            *tile = match cell.piece {
                Some((kind, color)) => Tile::Occupied {
                    id: cell.id,
                    piece: Piece::new(kind, color, pos),
                },
                None => Tile::Empty { id: cell.id },
            };
        }
        tracing::debug!(
            rows = extent.rows,
            cols = extent.cols,
            pieces = board.pieces().count(),
            "board imported"
        );
        Ok(board)
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.extent.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.extent.cols
    }

    #[inline]
    pub fn is_within_bounds(&self, pos: Position) -> bool {
        pos.is_within_bounds(self.extent)
    }

    fn index(&self, pos: Position) -> Result<usize, BoardError> {
        pos.index_in(self.extent).ok_or(BoardError::OutOfBounds(pos))
    }

    /// Returns the tile at `pos`, or `None` when off the board.
    #[inline]
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        pos.index_in(self.extent).map(|i| &self.tiles[i])
    }

    /// Returns the piece at `pos`, if any.
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.tile_at(pos).and_then(Tile::piece)
    }

    /// Returns true if `pos` is on the board and holds no piece.
    #[inline]
    pub fn is_empty_at(&self, pos: Position) -> bool {
        matches!(self.tile_at(pos), Some(Tile::Empty { .. }))
    }

    /// The most recent move applied with [`apply_move`](Self::apply_move).
    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    /// Places a piece, replacing any occupant. The piece's position is set to
    /// `pos`; the tile id is kept.
    pub fn place(&mut self, mut piece: Piece, pos: Position) -> Result<(), BoardError> {
        let i = self.index(pos)?;
        piece.position = pos;
        self.tiles[i].put(piece);
        self.notify_observers();
        Ok(())
    }

    /// Removes and returns the piece at `pos`.
    pub fn remove(&mut self, pos: Position) -> Result<Option<Piece>, BoardError> {
        let i = self.index(pos)?;
        let piece = self.tiles[i].take();
        self.notify_observers();
        Ok(piece)
    }

    /// Moves whatever stands on `start` to `end`, capturing any occupant of
    /// `end`, and updates the piece's position and move count.
    ///
    /// Does nothing (besides notifying) when `start` is empty. Legality is not
    /// checked.
    pub fn move_piece(&mut self, start: Position, end: Position) -> Result<(), BoardError> {
        self.relocate(start, end)?;
        self.notify_observers();
        Ok(())
    }

    fn relocate(&mut self, start: Position, end: Position) -> Result<(), BoardError> {
        let from = self.index(start)?;
        let to = self.index(end)?;
        if let Some(mut piece) = self.tiles[from].take() {
            piece.record_move(end);
            self.tiles[to].put(piece);
        }
        Ok(())
    }

    /// Hands the piece at `pos` to `color`. Returns false if `pos` is empty.
    pub fn recolor(&mut self, pos: Position, color: Color) -> Result<bool, BoardError> {
        let i = self.index(pos)?;
        let Some(piece) = self.tiles[i].piece_mut() else {
            return Ok(false);
        };
        piece.color = color;
        self.notify_observers();
        Ok(true)
    }

    /// Applies a generated move, including its side effects: the pawn taken
    /// en passant is removed, the rook follows a castling king, and a
    /// promoting pawn is replaced by a piece with no moves counted. The move
    /// becomes the board's last move. Observers are notified once, at the end.
    pub fn apply_move(&mut self, m: &Move) -> Result<(), BoardError> {
        self.index(m.start)?;
        self.index(m.end)?;

        if m.is_en_passant {
            let victim = Position::new(m.start.row, m.end.col);
            let i = self.index(victim)?;
            self.tiles[i].take();
        }

        if m.is_castle() {
            if let Some((rook_from, rook_to)) = self.castling_rook(m) {
                self.relocate(rook_from, rook_to)?;
            }
        }

        self.relocate(m.start, m.end)?;

        if let Some(kind) = m.promotion {
            let i = self.index(m.end)?;
            if let Some(piece) = self.tiles[i].piece_mut() {
                if piece.kind == PieceKind::Pawn {
                    piece.kind = kind;
                    piece.move_count = 0;
                }
            }
        }

        self.last_move = Some(*m);
        self.notify_observers();
        Ok(())
    }

    /// Locates the rook a castling king is paired with: the first piece
    /// outward from the king along its row, which must be an allied rook.
    fn castling_rook(&self, m: &Move) -> Option<(Position, Position)> {
        let step = (m.end.col - m.start.col).signum();
        let mut pos = m.start.offset(0, step);
        while self.is_within_bounds(pos) {
            if let Some(piece) = self.piece_at(pos) {
                let pairs = piece.kind == PieceKind::Rook && piece.color == m.color;
                return pairs.then(|| (pos, m.end.offset(0, -step)));
            }
            pos = pos.offset(0, step);
        }
        None
    }

    /// Applies a move and returns what is needed to revert it exactly.
    pub fn make_move(&mut self, m: &Move) -> Result<Undo, BoardError> {
        let mut touched = vec![m.start, m.end];
        if m.is_en_passant {
            touched.push(Position::new(m.start.row, m.end.col));
        }
        if m.is_castle() {
            if let Some((rook_from, rook_to)) = self.castling_rook(m) {
                touched.push(rook_from);
                touched.push(rook_to);
            }
        }

        let mut tiles = Vec::with_capacity(touched.len());
        for pos in touched {
            let i = self.index(pos)?;
            tiles.push((pos, self.tiles[i]));
        }
        let undo = Undo {
            tiles,
            last_move: self.last_move,
        };
        self.apply_move(m)?;
        Ok(undo)
    }

    /// Reverts a move applied with [`make_move`](Self::make_move).
    pub fn unmake_move(&mut self, undo: Undo) {
        // Restore in reverse so a square touched twice ends in its oldest state.
        for (pos, tile) in undo.tiles.into_iter().rev() {
            if let Some(i) = pos.index_in(self.extent) {
                self.tiles[i] = tile;
            }
        }
        self.last_move = undo.last_move;
        self.notify_observers();
    }

    /// Pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.tiles.iter().filter_map(Tile::piece)
    }

    /// Pieces of one color in row-major order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces().filter(move |p| p.color == color)
    }

    /// Snapshot of every piece on the board, row-major.
    pub fn remaining_pieces(&self) -> Vec<Piece> {
        self.pieces().copied().collect()
    }

    /// The first king of `color` in row-major order.
    pub fn find_king(&self, color: Color) -> Option<&Piece> {
        self.pieces_of(color).find(|p| p.kind == PieceKind::King)
    }

    /// Returns true if `end` is a legal destination for the piece on `start`.
    pub fn is_valid_move(&self, start: Position, end: Position) -> bool {
        if !self.is_within_bounds(start) || !self.is_within_bounds(end) {
            return false;
        }
        match self.piece_at(start) {
            Some(piece) => movegen::moves_for(piece, self)
                .iter()
                .any(|m| m.end == end),
            None => false,
        }
    }

    /// Deep copy of tiles, pieces, and the last-move record. Observers are not
    /// carried over.
    pub fn copy(&self) -> Board {
        Board {
            extent: self.extent,
            tiles: self.tiles.clone(),
            last_move: self.last_move,
            observers: Vec::new(),
        }
    }

    /// Replaces this board's contents with another board's, keeping this
    /// board's observers.
    pub fn restore_from(&mut self, other: &Board) {
        self.extent = other.extent;
        self.tiles = other.tiles.clone();
        self.last_move = other.last_move;
        self.notify_observers();
    }

    pub fn add_observer<O: BoardObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub fn notify_observers(&mut self) {
        for observer in &mut self.observers {
            observer.board_changed();
        }
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.extent == other.extent
            && self.tiles == other.tiles
            && self.last_move == other.last_move
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("extent", &self.extent)
            .field("last_move", &self.last_move)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(self.extent.cols) {
            for tile in row {
                let c = match tile.piece() {
                    Some(p) => p.kind.to_placement_char(p.color),
                    None => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn piece(kind: PieceKind, color: Color, row: i32, col: i32) -> Piece {
        Piece::new(kind, color, Position::new(row, col))
    }

    fn put(board: &mut Board, piece: Piece) {
        board.place(piece, piece.position).unwrap();
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            Board::new(0, 8).unwrap_err(),
            BoardError::InvalidDimensions { rows: 0, cols: 8 }
        );
    }

    #[test]
    fn place_and_remove() {
        let mut board = Board::new(6, 4).unwrap();
        let rook = piece(PieceKind::Rook, Color::White, 0, 0);
        board.place(rook, Position::new(5, 3)).unwrap();
        assert_eq!(board.piece_at(Position::new(5, 3)).unwrap().position, Position::new(5, 3));
        assert_eq!(
            board.place(rook, Position::new(6, 0)),
            Err(BoardError::OutOfBounds(Position::new(6, 0)))
        );
        let removed = board.remove(Position::new(5, 3)).unwrap();
        assert_eq!(removed.map(|p| p.kind), Some(PieceKind::Rook));
        assert!(board.is_empty_at(Position::new(5, 3)));
        assert!(board.remove(Position::new(-1, 0)).is_err());
    }

    #[test]
    fn tile_at_out_of_bounds_is_none() {
        let board = Board::square(8).unwrap();
        assert!(board.tile_at(Position::new(8, 0)).is_none());
        assert!(board.tile_at(Position::new(0, -1)).is_none());
        assert!(board.tile_at(Position::new(7, 7)).is_some());
    }

    #[test]
    fn move_piece_updates_piece_state() {
        let mut board = Board::square(8).unwrap();
        board.place(piece(PieceKind::Rook, Color::White, 0, 0), Position::new(0, 0)).unwrap();
        board.place(piece(PieceKind::Pawn, Color::Black, 4, 0), Position::new(4, 0)).unwrap();
        board.move_piece(Position::new(0, 0), Position::new(4, 0)).unwrap();

        assert!(board.is_empty_at(Position::new(0, 0)));
        let rook = board.piece_at(Position::new(4, 0)).unwrap();
        assert_eq!(rook.kind, PieceKind::Rook);
        assert_eq!(rook.position, Position::new(4, 0));
        assert_eq!(rook.move_count, 1);
        assert_eq!(board.remaining_pieces().len(), 1);
    }

    #[test]
    fn move_piece_bounds_and_empty_start() {
        let mut board = Board::square(8).unwrap();
        assert!(board.move_piece(Position::new(0, 0), Position::new(8, 8)).is_err());
        board.move_piece(Position::new(2, 2), Position::new(3, 3)).unwrap();
        assert_eq!(board.pieces().count(), 0);
    }

    #[test]
    fn tile_ids_survive_placement() {
        let placement = Placement::parse("R1/2").unwrap();
        let mut board = Board::from_placement(&placement).unwrap();
        assert_eq!(board.tile_at(Position::new(0, 1)).unwrap().id(), 1);
        board.move_piece(Position::new(0, 0), Position::new(0, 1)).unwrap();
        assert_eq!(board.tile_at(Position::new(0, 0)).unwrap().id(), 0);
        assert_eq!(board.tile_at(Position::new(0, 1)).unwrap().id(), 1);
    }

    #[test]
    fn remaining_pieces_row_major() {
        let placement = Placement::parse("2k/1p1/R2").unwrap();
        let board = Board::from_placement(&placement).unwrap();
        let kinds: Vec<_> = board.remaining_pieces().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PieceKind::King, PieceKind::Pawn, PieceKind::Rook]);
    }

    #[test]
    fn copy_is_independent() {
        let mut board = Board::square(8).unwrap();
        board.place(piece(PieceKind::Queen, Color::White, 3, 3), Position::new(3, 3)).unwrap();
        let mut copy = board.copy();
        copy.move_piece(Position::new(3, 3), Position::new(3, 7)).unwrap();
        assert!(board.piece_at(Position::new(3, 3)).is_some());
        assert!(copy.piece_at(Position::new(3, 3)).is_none());
        assert_eq!(board.piece_at(Position::new(3, 3)).unwrap().move_count, 0);
    }

    #[test]
    fn observers_fire_after_each_mutation() {
        let count = Rc::new(Cell::new(0));
        let mut board = Board::square(8).unwrap();
        let seen = count.clone();
        board.add_observer(move || seen.set(seen.get() + 1));

        board.place(piece(PieceKind::King, Color::White, 0, 4), Position::new(0, 4)).unwrap();
        board.move_piece(Position::new(0, 4), Position::new(1, 4)).unwrap();
        board.remove(Position::new(1, 4)).unwrap();
        assert_eq!(count.get(), 3);

        // A failed call notifies nobody.
        assert!(board.remove(Position::new(9, 9)).is_err());
        assert_eq!(count.get(), 3);

        // Copies do not share observers.
        let mut copy = board.copy();
        copy.notify_observers();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn make_unmake_restores_exactly() {
        let placement = Placement::parse("4k3/8/8/8/8/8/8/R3K2R").unwrap();
        let mut board = Board::from_placement(&placement).unwrap();
        let before = board.copy();

        let castle = Move::new(
            PieceKind::King,
            Color::White,
            Position::new(7, 4),
            Position::new(7, 6),
        );
        let undo = board.make_move(&castle).unwrap();
        assert_eq!(board.piece_at(Position::new(7, 5)).unwrap().kind, PieceKind::Rook);
        assert_eq!(board.piece_at(Position::new(7, 6)).unwrap().kind, PieceKind::King);
        assert!(board.is_empty_at(Position::new(7, 7)));
        board.unmake_move(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut board = Board::square(8).unwrap();
        put(&mut board, Piece::pawn(Color::White, Position::new(4, 4), 1));
        put(&mut board, Piece::pawn(Color::Black, Position::new(4, 5), -1));
        let ep = Move::new(
            PieceKind::Pawn,
            Color::White,
            Position::new(4, 4),
            Position::new(5, 5),
        )
        .with_en_passant();
        let before = board.copy();
        let undo = board.make_move(&ep).unwrap();
        assert!(board.is_empty_at(Position::new(4, 5)));
        assert_eq!(board.pieces().count(), 1);
        assert_eq!(board.last_move(), Some(&ep));
        board.unmake_move(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn promotion_replaces_pawn() {
        let mut board = Board::square(8).unwrap();
        put(&mut board, Piece::pawn(Color::White, Position::new(6, 0), 1));
        let promote = Move::new(
            PieceKind::Pawn,
            Color::White,
            Position::new(6, 0),
            Position::new(7, 0),
        )
        .with_promotion(PieceKind::Queen);
        board.apply_move(&promote).unwrap();
        assert_eq!(board.piece_at(Position::new(7, 0)).unwrap().kind, PieceKind::Queen);
    }

    #[test]
    fn promoted_queen_counts_its_own_moves() {
        let mut board = Board::square(8).unwrap();
        put(&mut board, Piece::pawn(Color::White, Position::new(6, 0), 1));
        let promote = Move::new(
            PieceKind::Pawn,
            Color::White,
            Position::new(6, 0),
            Position::new(7, 0),
        )
        .with_promotion(PieceKind::Queen);

        let before = board.copy();
        let undo = board.make_move(&promote).unwrap();
        assert_eq!(board.piece_at(Position::new(7, 0)).unwrap().move_count, 0);
        board.unmake_move(undo);
        assert_eq!(board, before);

        board.apply_move(&promote).unwrap();
        board.move_piece(Position::new(7, 0), Position::new(7, 3)).unwrap();
        let queen = board.piece_at(Position::new(7, 3)).unwrap();
        assert_eq!(queen.color, Color::White);
        assert_eq!(queen.move_count, 1);

        board.move_piece(Position::new(7, 3), Position::new(4, 3)).unwrap();
        assert_eq!(board.piece_at(Position::new(4, 3)).unwrap().color, Color::Black);
    }

    #[test]
    fn apply_move_notifies_once() {
        let placement = Placement::parse("4k3/8/8/8/8/8/8/R3K2R").unwrap();
        let mut board = Board::from_placement(&placement).unwrap();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        board.add_observer(move || seen.set(seen.get() + 1));

        let castle = Move::new(
            PieceKind::King,
            Color::White,
            Position::new(7, 4),
            Position::new(7, 6),
        );
        board.apply_move(&castle).unwrap();
        assert_eq!(count.get(), 1);
        assert_eq!(board.last_move(), Some(&castle));
    }

    #[test]
    fn recolor_hands_piece_over() {
        let mut board = Board::square(4).unwrap();
        board.place(piece(PieceKind::Rook, Color::White, 1, 1), Position::new(1, 1)).unwrap();
        assert_eq!(board.recolor(Position::new(1, 1), Color::Black), Ok(true));
        assert_eq!(board.piece_at(Position::new(1, 1)).unwrap().color, Color::Black);
        assert_eq!(board.recolor(Position::new(0, 0), Color::Black), Ok(false));
        assert!(board.recolor(Position::new(5, 0), Color::Black).is_err());
    }

    #[test]
    fn display_renders_grid() {
        let board = Board::from_placement(&Placement::parse("K1/1p").unwrap()).unwrap();
        assert_eq!(board.to_string(), "K.\n.p\n");
    }
}
