//! Board cells.

use crate::Piece;

/// A board cell.
///
/// The `id` is the tileset index a renderer draws for the cell; it belongs to
/// the cell, not to the piece, and survives placement and removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty { id: u32 },
    Occupied { id: u32, piece: Piece },
}

impl Tile {
    #[inline]
    pub const fn id(&self) -> u32 {
        match self {
            Tile::Empty { id } | Tile::Occupied { id, .. } => *id,
        }
    }

    #[inline]
    pub const fn is_occupied(&self) -> bool {
        matches!(self, Tile::Occupied { .. })
    }

    #[inline]
    pub const fn piece(&self) -> Option<&Piece> {
        match self {
            Tile::Empty { .. } => None,
            Tile::Occupied { piece, .. } => Some(piece),
        }
    }

    #[inline]
    pub fn piece_mut(&mut self) -> Option<&mut Piece> {
        match self {
            Tile::Empty { .. } => None,
            Tile::Occupied { piece, .. } => Some(piece),
        }
    }

    /// Takes the piece out, leaving an empty tile with the same id.
    pub fn take(&mut self) -> Option<Piece> {
        let id = self.id();
        match std::mem::replace(self, Tile::Empty { id }) {
            Tile::Occupied { piece, .. } => Some(piece),
            Tile::Empty { .. } => None,
        }
    }

    /// Puts a piece on the tile, returning whatever stood there.
    pub fn put(&mut self, piece: Piece) -> Option<Piece> {
        let id = self.id();
        match std::mem::replace(self, Tile::Occupied { id, piece }) {
            Tile::Occupied { piece, .. } => Some(piece),
            Tile::Empty { .. } => None,
        }
    }
}
