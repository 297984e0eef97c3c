//! Core types for Save-the-King chess.
//!
//! This crate provides the value types shared by the engine and its drivers:
//! - [`Color`] and [`PieceKind`] for piece identity
//! - [`Position`] and [`Extent`] for board coordinates
//! - [`Move`] and [`MoveHistory`] for recorded plies
//! - [`Placement`] for importing boards from external map data

mod color;
mod mov;
mod piece;
mod placement;
mod position;

pub use color::Color;
pub use mov::{Move, MoveHistory};
pub use piece::{PieceError, PieceKind};
pub use placement::{CellSpec, Placement, PlacementError, TileProperties, MAX_ROW_WIDTH};
pub use position::{Extent, Position, PositionError};
