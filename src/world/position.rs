//! Grid coordinates and the four movement actions.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cell coordinate on the world grid.
///
/// `x` indexes rows and `y` indexes columns. Coordinates are signed so that
/// candidate moves and sensor offsets may step outside the grid; bounds are
/// checked by [`super::WorldGrid::in_bounds`].
///
/// Positions order lexicographically by `(x, y)`. That order is the
/// processing order used for every per-tick agent loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the cell reached by applying `action` from this position.
    pub fn step(&self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        self.offset(dx, dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four moves an agent can take each tick.
///
/// `Up`/`Down` move along the column axis (`y`), `Left`/`Right` along the
/// row axis (`x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Number of actions.
    pub const COUNT: usize = 4;

    /// Every action, in declaration order.
    pub const ALL: [Action; Action::COUNT] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Returns the index of this action (0=Up, 1=Down, 2=Left, 3=Right).
    pub fn index(&self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    /// Coordinate delta `(dx, dy)` applied by this action.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// The action that undoes this one.
    pub fn opposite(&self) -> Action {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => write!(f, "up"),
            Action::Down => write!(f, "down"),
            Action::Left => write!(f, "left"),
            Action::Right => write!(f, "right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_row_then_column() {
        let mut positions = vec![
            Position::new(1, 3),
            Position::new(0, 9),
            Position::new(1, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 9), Position::new(1, 1), Position::new(1, 3)]
        );
    }

    #[test]
    fn step_applies_action_delta() {
        let p = Position::new(2, 2);
        assert_eq!(p.step(Action::Up), Position::new(2, 1));
        assert_eq!(p.step(Action::Down), Position::new(2, 3));
        assert_eq!(p.step(Action::Left), Position::new(1, 2));
        assert_eq!(p.step(Action::Right), Position::new(3, 2));
    }

    #[test]
    fn opposite_actions_cancel() {
        let p = Position::new(4, -1);
        for action in Action::ALL {
            assert_eq!(p.step(action).step(action.opposite()), p);
        }
    }

    #[test]
    fn action_indices_match_declaration_order() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }
}
