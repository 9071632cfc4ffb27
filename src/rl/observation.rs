//! Local observation encoding ("sensor").
//!
//! The sensor is both the agent's view of the world and the mechanism that
//! lifts the fog of war: classifying a free in-bounds cell observes it, which
//! advances that cell's [`DiscoveryState`] machine.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::registry::AgentRegistry;
use crate::discovery::{Category, DiscoveryState};
use crate::world::{Position, WorldGrid};

/// Raised when parsing an observation key from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid observation code '{0}'")]
pub struct InvalidCode(pub char);

/// Encoded field of view, used as the Q-table state key.
///
/// Categories are stored in raster order over the `(2·fov+1)²` window: row
/// offsets outer, column offsets inner. The centre slot always holds
/// [`Category::SelfCell`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservationKey(Vec<Category>);

impl ObservationKey {
    /// Wraps a raster-ordered category vector.
    pub fn new(categories: Vec<Category>) -> Self {
        Self(categories)
    }

    /// Number of cells in the key.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the placeholder key of an agent that never sensed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Categories in raster order.
    pub fn as_slice(&self) -> &[Category] {
        &self.0
    }

    /// Category at window offset `(dx, dy)` for a key sensed with `fov`.
    pub fn at(&self, fov: u32, dx: i32, dy: i32) -> Option<Category> {
        let fov = fov as i32;
        if dx.abs() > fov || dy.abs() > fov {
            return None;
        }
        let side = 2 * fov + 1;
        let idx = ((dx + fov) * side + (dy + fov)) as usize;
        self.0.get(idx).copied()
    }

    /// Number of cells matching `category`.
    pub fn count(&self, category: Category) -> usize {
        self.0.iter().filter(|&&c| c == category).count()
    }
}

impl fmt::Display for ObservationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in &self.0 {
            write!(f, "{}", category.code())?;
        }
        Ok(())
    }
}

impl FromStr for ObservationKey {
    type Err = InvalidCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| Category::from_code(c).ok_or(InvalidCode(c)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

/// Everything an agent perceives in one sensing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    /// The encoded window.
    pub observation: ObservationKey,
    /// Category of the cell under the agent after observing it.
    pub underfoot: Category,
}

/// Builds observation keys from the world, the discovery state and the registry.
pub struct SensorEncoder;

impl SensorEncoder {
    /// Senses the square window of half-width `fov` around `center`.
    ///
    /// Each offset is classified with this precedence:
    ///
    /// 1. off the grid → [`Category::Wall`];
    /// 2. the centre → [`Category::SelfCell`];
    /// 3. occupied by another agent → [`Category::OtherAgent`];
    /// 4. otherwise → the result of [`DiscoveryState::observe`].
    ///
    /// The centre cell is observed as well; its category is reported in
    /// [`Reading::underfoot`] and kept out of the key.
    ///
    /// Observation is not idempotent. Call this exactly once per agent per
    /// tick, following the tick's agent order, so that overlapping windows
    /// resolve deterministically.
    pub fn encode(
        center: Position,
        fov: u32,
        world: &WorldGrid,
        discovery: &mut DiscoveryState,
        registry: &AgentRegistry,
    ) -> Reading {
        let fov = fov as i32;
        let side = (2 * fov + 1) as usize;
        let mut cells = Vec::with_capacity(side * side);
        let mut underfoot = Category::Wall;

        for dx in -fov..=fov {
            for dy in -fov..=fov {
                let target = center.offset(dx, dy);
                let category = if !world.in_bounds(target) {
                    Category::Wall
                } else if target == center {
                    underfoot = discovery.observe(target, world.is_mineral(target));
                    Category::SelfCell
                } else if registry.is_occupied(target) {
                    Category::OtherAgent
                } else {
                    discovery.observe(target, world.is_mineral(target))
                };
                cells.push(category);
            }
        }

        Reading {
            observation: ObservationKey(cells),
            underfoot,
        }
    }

    /// Length of a key sensed with `fov`, centre included.
    pub fn key_len(fov: u32) -> usize {
        let side = 2 * fov as usize + 1;
        side * side
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::CellStatus;
    use crate::rl::AgentId;

    fn setup(rows: usize, cols: usize, minerals: &[(i32, i32)]) -> (WorldGrid, DiscoveryState) {
        let world = WorldGrid::from_minerals(
            rows,
            cols,
            minerals.iter().map(|&(x, y)| Position::new(x, y)),
        )
        .unwrap();
        let discovery = DiscoveryState::for_world(&world);
        (world, discovery)
    }

    #[test]
    fn key_has_window_length() {
        let (world, mut discovery) = setup(9, 9, &[]);
        let registry = AgentRegistry::new();
        for fov in 1..=3 {
            let reading =
                SensorEncoder::encode(Position::new(4, 4), fov, &world, &mut discovery, &registry);
            assert_eq!(reading.observation.len(), SensorEncoder::key_len(fov));
            assert_eq!(reading.observation.at(fov, 0, 0), Some(Category::SelfCell));
        }
    }

    #[test]
    fn corner_sees_walls() {
        let (world, mut discovery) = setup(3, 3, &[]);
        let registry = AgentRegistry::new();
        let reading =
            SensorEncoder::encode(Position::new(0, 0), 1, &world, &mut discovery, &registry);
        let key = &reading.observation;
        assert_eq!(key.count(Category::Wall), 5);
        assert_eq!(key.count(Category::JustDiscoveredEmpty), 3);
        assert_eq!(key.at(1, -1, -1), Some(Category::Wall));
        assert_eq!(key.at(1, 1, 1), Some(Category::JustDiscoveredEmpty));
    }

    #[test]
    fn raster_order_is_rows_then_columns() {
        let (world, mut discovery) = setup(3, 3, &[(0, 1)]);
        let registry = AgentRegistry::new();
        let reading =
            SensorEncoder::encode(Position::new(1, 1), 1, &world, &mut discovery, &registry);
        // (0,1) is offset (-1, 0): second slot of the first row.
        assert_eq!(reading.observation.to_string(), "emee@eeee");
    }

    #[test]
    fn second_pass_sees_decayed_cells() {
        let (world, mut discovery) = setup(3, 3, &[(2, 2)]);
        let registry = AgentRegistry::new();
        let center = Position::new(1, 1);
        let first = SensorEncoder::encode(center, 1, &world, &mut discovery, &registry);
        let second = SensorEncoder::encode(center, 1, &world, &mut discovery, &registry);
        assert_eq!(first.observation.at(1, 1, 1), Some(Category::JustDiscoveredMineral));
        assert_eq!(second.observation.at(1, 1, 1), Some(Category::DiscoveredMineral));
        assert_eq!(first.underfoot, Category::JustDiscoveredEmpty);
        assert_eq!(second.underfoot, Category::DiscoveredEmpty);
    }

    #[test]
    fn occupied_cells_are_not_observed() {
        let (world, mut discovery) = setup(3, 3, &[]);
        let mut registry = AgentRegistry::new();
        registry.insert(Position::new(1, 1), AgentId(0)).unwrap();
        registry.insert(Position::new(1, 2), AgentId(1)).unwrap();

        let reading =
            SensorEncoder::encode(Position::new(1, 1), 1, &world, &mut discovery, &registry);
        assert_eq!(reading.observation.at(1, 0, 1), Some(Category::OtherAgent));
        assert_eq!(discovery.status(Position::new(1, 2)), CellStatus::Undiscovered);
        // The sensing agent's own cell is observed.
        assert_eq!(discovery.status(Position::new(1, 1)), CellStatus::JustEmpty);
    }

    #[test]
    fn key_parses_back_from_text() {
        let key: ObservationKey = "#A.*em@..".parse().unwrap();
        assert_eq!(key.to_string(), "#A.*em@..");
        assert_eq!("#x".parse::<ObservationKey>(), Err(InvalidCode('x')));
    }

    #[test]
    fn at_rejects_offsets_outside_window() {
        let key = ObservationKey::new(vec![Category::SelfCell]);
        assert_eq!(key.at(0, 0, 0), Some(Category::SelfCell));
        assert_eq!(key.at(0, 1, 0), None);
    }
}
