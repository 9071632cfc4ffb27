//! Per-cell knowledge of the swarm ("fog of war").
//!
//! Every cell starts [`CellStatus::Undiscovered`]. The first observation
//! reveals its ground truth as `Just*`; the next observation decays it to
//! `Discovered*`, where it stays. The "just discovered" signal is therefore
//! visible for exactly one subsequent observation. Rewards use that signal to
//! credit the discovering agent more than agents that revisit known cells.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::world::{Position, WorldGrid};

/// Knowledge state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CellStatus {
    #[default]
    Undiscovered,
    JustEmpty,
    JustMineral,
    DiscoveredEmpty,
    DiscoveredMineral,
}

impl CellStatus {
    /// Returns true for both `Discovered*` states.
    pub fn is_settled(&self) -> bool {
        matches!(self, CellStatus::DiscoveredEmpty | CellStatus::DiscoveredMineral)
    }

    /// Returns true once the cell has been observed at least once.
    pub fn is_revealed(&self) -> bool {
        !matches!(self, CellStatus::Undiscovered)
    }

    /// Mineral branch of a revealed cell, `None` while undiscovered.
    pub fn is_mineral(&self) -> Option<bool> {
        match self {
            CellStatus::Undiscovered => None,
            CellStatus::JustEmpty | CellStatus::DiscoveredEmpty => Some(false),
            CellStatus::JustMineral | CellStatus::DiscoveredMineral => Some(true),
        }
    }
}

/// What an agent perceives in one cell of its field of view.
///
/// This is the vocabulary of observation keys. `Undiscovered` never shows up
/// here because looking at a cell reveals it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Wall,
    SelfCell,
    OtherAgent,
    DiscoveredEmpty,
    DiscoveredMineral,
    JustDiscoveredEmpty,
    JustDiscoveredMineral,
}

impl Category {
    /// Single-character code used in persisted keys and text output.
    pub fn code(&self) -> char {
        match self {
            Category::Wall => '#',
            Category::SelfCell => '@',
            Category::OtherAgent => 'A',
            Category::DiscoveredEmpty => '.',
            Category::DiscoveredMineral => '*',
            Category::JustDiscoveredEmpty => 'e',
            Category::JustDiscoveredMineral => 'm',
        }
    }

    /// Inverse of [`Category::code`].
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '#' => Some(Category::Wall),
            '@' => Some(Category::SelfCell),
            'A' => Some(Category::OtherAgent),
            '.' => Some(Category::DiscoveredEmpty),
            '*' => Some(Category::DiscoveredMineral),
            'e' => Some(Category::JustDiscoveredEmpty),
            'm' => Some(Category::JustDiscoveredMineral),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Dense per-cell status array sized to the world grid.
///
/// Only [`DiscoveryState::observe`] mutates it, and the sensor is its only
/// caller during a simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryState {
    rows: usize,
    cols: usize,
    cells: Vec<CellStatus>,
}

impl DiscoveryState {
    /// Creates an all-undiscovered state for a `rows × cols` grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellStatus::Undiscovered; rows * cols],
        }
    }

    /// Creates an all-undiscovered state matching `world`'s dimensions.
    pub fn for_world(world: &WorldGrid) -> Self {
        Self::new(world.rows(), world.cols())
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let inside =
            pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.rows && (pos.y as usize) < self.cols;
        inside.then(|| pos.x as usize * self.cols + pos.y as usize)
    }

    /// Observes `pos`, advancing its state machine by one step.
    ///
    /// Returns the category after the transition:
    ///
    /// | before          | after            | returned                |
    /// |-----------------|------------------|-------------------------|
    /// | `Undiscovered`  | `Just*`          | `JustDiscovered*`       |
    /// | `Just*`         | `Discovered*`    | `Discovered*`           |
    /// | `Discovered*`   | unchanged        | `Discovered*`           |
    ///
    /// The mineral branch is taken from `is_mineral` on the first
    /// observation only; later values are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside the grid.
    pub fn observe(&mut self, pos: Position, is_mineral: bool) -> Category {
        let idx = self
            .index(pos)
            .unwrap_or_else(|| panic!("observe called outside the grid at {}", pos));
        let (next, category) = match self.cells[idx] {
            CellStatus::Undiscovered if is_mineral => {
                (CellStatus::JustMineral, Category::JustDiscoveredMineral)
            }
            CellStatus::Undiscovered => (CellStatus::JustEmpty, Category::JustDiscoveredEmpty),
            CellStatus::JustEmpty | CellStatus::DiscoveredEmpty => {
                (CellStatus::DiscoveredEmpty, Category::DiscoveredEmpty)
            }
            CellStatus::JustMineral | CellStatus::DiscoveredMineral => {
                (CellStatus::DiscoveredMineral, Category::DiscoveredMineral)
            }
        };
        self.cells[idx] = next;
        category
    }

    /// Current status of `pos` without observing it. Off-grid cells read as undiscovered.
    pub fn status(&self, pos: Position) -> CellStatus {
        self.index(pos)
            .map(|idx| self.cells[idx])
            .unwrap_or_default()
    }

    /// Number of cells currently in `status`.
    pub fn count(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|&&s| s == status).count()
    }

    /// Number of cells observed at least once.
    pub fn discovered_cells(&self) -> usize {
        self.cells.iter().filter(|s| s.is_revealed()).count()
    }

    /// Number of revealed cells holding a mineral.
    pub fn minerals_found(&self) -> usize {
        self.cells
            .iter()
            .filter(|s| s.is_mineral() == Some(true))
            .count()
    }

    /// Fraction of the grid revealed so far.
    pub fn coverage(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.discovered_cells() as f64 / self.cells.len() as f64
    }

    /// Positions currently in `status`, in raster order.
    pub fn positions_with(&self, status: CellStatus) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == status)
            .map(|(idx, _)| Position::new((idx / self.cols) as i32, (idx % self.cols) as i32))
            .collect()
    }
}
