//! Immutable ground-truth mineral map.

use super::error::WorldError;
use super::Position;

/// Fixed `rows × cols` grid recording which cells hold a mineral deposit.
///
/// Built once from a map generator (or an explicit layout) and never mutated
/// afterwards. Every other component only reads it.
///
/// # Examples
///
/// ```
/// use prospector::world::{Position, WorldGrid};
///
/// let world = WorldGrid::from_minerals(3, 4, [Position::new(1, 2)]).unwrap();
/// assert!(world.is_mineral(Position::new(1, 2)));
/// assert!(!world.is_mineral(Position::new(0, 0)));
/// assert!(!world.in_bounds(Position::new(3, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl WorldGrid {
    /// Creates a grid without any mineral.
    pub fn empty(rows: usize, cols: usize) -> Result<Self, WorldError> {
        Self::from_cells(rows, cols, vec![false; rows * cols])
    }

    /// Creates a grid from a row-major cell vector (`cells[x * cols + y]`).
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<bool>) -> Result<Self, WorldError> {
        if rows == 0 || cols == 0 {
            return Err(WorldError::EmptyGrid { rows, cols });
        }
        if cells.len() != rows * cols {
            return Err(WorldError::CellCountMismatch {
                expected: rows * cols,
                actual: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Creates a grid from nested rows, `grid[x][y]`.
    pub fn from_rows(grid: Vec<Vec<bool>>) -> Result<Self, WorldError> {
        let rows = grid.len();
        let cols = grid.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in grid.into_iter().enumerate() {
            if line.len() != cols {
                return Err(WorldError::RaggedRow {
                    row,
                    len: line.len(),
                    expected: cols,
                });
            }
            cells.extend(line);
        }
        Self::from_cells(rows, cols, cells)
    }

    /// Creates a grid whose only minerals are the given positions.
    pub fn from_minerals<I>(rows: usize, cols: usize, minerals: I) -> Result<Self, WorldError>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut world = Self::empty(rows, cols)?;
        for pos in minerals {
            let idx = world.index(pos).ok_or(WorldError::OutOfBounds(pos))?;
            world.cells[idx] = true;
        }
        Ok(world)
    }

    /// Number of rows (extent along `x`).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (extent along `y`).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if `pos` lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.rows && (pos.y as usize) < self.cols
    }

    /// Returns true if `pos` holds a mineral. Out-of-bounds positions are never minerals.
    pub fn is_mineral(&self, pos: Position) -> bool {
        self.index(pos).is_some_and(|idx| self.cells[idx])
    }

    /// Dense index of `pos`, or `None` when it lies off the grid.
    pub fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.x as usize * self.cols + pos.y as usize)
        } else {
            None
        }
    }

    /// Inverse of [`WorldGrid::index`].
    pub fn position_at(&self, idx: usize) -> Position {
        Position::new((idx / self.cols) as i32, (idx % self.cols) as i32)
    }

    /// Number of mineral cells.
    pub fn mineral_count(&self) -> usize {
        self.cells.iter().filter(|&&m| m).count()
    }

    /// Fraction of cells holding a mineral.
    pub fn fill_ratio(&self) -> f64 {
        self.mineral_count() as f64 / self.cell_count() as f64
    }

    /// Every position in raster order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |idx| self.position_at(idx))
    }
}
