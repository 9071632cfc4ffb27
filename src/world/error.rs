use thiserror::Error;

use super::Position;

/// Errors raised while building a world grid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldError {
    #[error("Grid dimensions must be non-zero, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("Row {row} has {len} cells, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },

    #[error("Expected {expected} cells for the grid, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("Mineral position {0} lies outside the grid")]
    OutOfBounds(Position),

    #[error("Fill ratio must lie in [0, 1], got {0}")]
    InvalidFillRatio(f64),

    #[error("Cannot seed {blobs} blobs on a grid of {cells} cells")]
    TooManyBlobs { blobs: usize, cells: usize },
}
