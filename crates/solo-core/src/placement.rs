//! Board placement parsing: the import boundary between external map data
//! and the engine's board.
//!
//! A placement is a grid of [`CellSpec`]s, each carrying the cell's tile id
//! and an optional `(PieceKind, Color)` pair. It can be built from tile
//! properties (the `type`/`color` strings a tileset attaches to piece tiles)
//! or parsed from a FEN-like placement string:
//!
//! ```text
//! r3k2r/8/8/8/8/8/8/R3K2R
//! ```
//!
//! Rows are separated by `/`, row 0 first; digits give runs of empty cells.
//! Rows must all have the same width, but the board need not be square.

use crate::{Color, Extent, PieceError, PieceKind, Position};
use thiserror::Error;

/// Errors that can occur when building a placement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("empty placement")]
    Empty,

    #[error("invalid character '{character}' in row {row}")]
    InvalidCharacter { character: char, row: usize },

    #[error("row {row} has {width} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        width: usize,
        expected: usize,
    },

    #[error("row {row} is wider than {limit} cells")]
    RowTooWide { row: usize, limit: usize },

    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },

    #[error(transparent)]
    Piece(#[from] PieceError),
}

/// Widest row [`Placement::parse`] accepts.
pub const MAX_ROW_WIDTH: usize = 4096;

/// Raw per-tile properties as supplied by a map loader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileProperties {
    pub kind: Option<String>,
    pub color: Option<String>,
}

impl TileProperties {
    /// Resolves the properties into a piece.
    ///
    /// A tile with neither property is empty. A tile with exactly one of them
    /// is rejected with [`PieceError::MissingArgument`].
    pub fn to_piece(&self) -> Result<Option<(PieceKind, Color)>, PieceError> {
        match (&self.kind, &self.color) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(PieceError::MissingArgument("color")),
            (None, Some(_)) => Err(PieceError::MissingArgument("type")),
            (Some(kind), Some(color)) => Ok(Some((kind.parse()?, color.parse()?))),
        }
    }
}

/// One cell of an imported board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpec {
    /// Tileset index used by renderers; preserved by the board.
    pub id: u32,
    pub piece: Option<(PieceKind, Color)>,
}

impl CellSpec {
    pub const fn empty(id: u32) -> Self {
        CellSpec { id, piece: None }
    }

    pub const fn occupied(id: u32, kind: PieceKind, color: Color) -> Self {
        CellSpec {
            id,
            piece: Some((kind, color)),
        }
    }
}

/// A rectangular grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    extent: Extent,
    cells: Vec<CellSpec>,
}

impl Placement {
    /// Builds a placement from explicit cells, validating the cell count.
    pub fn from_cells(extent: Extent, cells: Vec<CellSpec>) -> Result<Self, PlacementError> {
        if extent.area() == 0 {
            return Err(PlacementError::Empty);
        }
        if cells.len() != extent.area() {
            return Err(PlacementError::CellCount {
                expected: extent.area(),
                actual: cells.len(),
            });
        }
        Ok(Placement { extent, cells })
    }

    /// Builds a placement from per-tile ids and properties, row-major.
    pub fn from_properties<I>(extent: Extent, tiles: I) -> Result<Self, PlacementError>
    where
        I: IntoIterator<Item = (u32, TileProperties)>,
    {
        let cells = tiles
            .into_iter()
            .map(|(id, props)| -> Result<CellSpec, PlacementError> {
                Ok(CellSpec {
                    id,
                    piece: props.to_piece()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(extent, cells)
    }

    /// Parses a placement string. Tile ids alternate 0/1 in a checker
    /// pattern.
    pub fn parse(s: &str) -> Result<Self, PlacementError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PlacementError::Empty);
        }

        let mut rows: Vec<Vec<Option<(PieceKind, Color)>>> = Vec::new();
        for (row, text) in s.split('/').enumerate() {
            let mut cells = Vec::new();
            let mut run = 0usize;
            let too_wide = PlacementError::RowTooWide {
                row,
                limit: MAX_ROW_WIDTH,
            };
            for c in text.chars() {
                if let Some(d) = c.to_digit(10) {
                    run = run
                        .checked_mul(10)
                        .and_then(|r| r.checked_add(d as usize))
                        .filter(|&r| cells.len() + r <= MAX_ROW_WIDTH)
                        .ok_or_else(|| too_wide.clone())?;
                    continue;
                }
                cells.extend(std::iter::repeat(None).take(run));
                run = 0;
                if cells.len() >= MAX_ROW_WIDTH {
                    return Err(too_wide);
                }
                match PieceKind::from_placement_char(c) {
                    Some(piece) => cells.push(Some(piece)),
                    None => {
                        return Err(PlacementError::InvalidCharacter { character: c, row });
                    }
                }
            }
            cells.extend(std::iter::repeat(None).take(run));

            if let Some(first) = rows.first() {
                if cells.len() != first.len() {
                    return Err(PlacementError::RaggedRow {
                        row,
                        width: cells.len(),
                        expected: first.len(),
                    });
                }
            }
            rows.push(cells);
        }

        let extent = Extent::new(rows.len(), rows[0].len());
        let cells = rows
            .into_iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.into_iter().enumerate().map(move |(c, piece)| CellSpec {
                    id: ((r + c) % 2) as u32,
                    piece,
                })
            })
            .collect();
        Self::from_cells(extent, cells)
    }

    /// Renders the placement back into its string form.
    pub fn to_placement_string(&self) -> String {
        let mut out = String::new();
        for (r, row) in self.cells.chunks(self.extent.cols).enumerate() {
            if r > 0 {
                out.push('/');
            }
            let mut run = 0;
            for cell in row {
                match cell.piece {
                    Some((kind, color)) => {
                        if run > 0 {
                            out.push_str(&run.to_string());
                            run = 0;
                        }
                        out.push(kind.to_placement_char(color));
                    }
                    None => run += 1,
                }
            }
            if run > 0 {
                out.push_str(&run.to_string());
            }
        }
        out
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[CellSpec] {
        &self.cells
    }

    /// Cells paired with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &CellSpec)> + '_ {
        self.extent.positions().zip(self.cells.iter())
    }
}
