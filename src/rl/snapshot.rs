//! Immutable per-tick snapshots for rendering and export.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::registry::AgentRegistry;
use crate::discovery::{CellStatus, DiscoveryState};
use crate::world::{Position, WorldGrid};

/// Integer cell codes consumed by renderers.
pub mod codes {
    pub const EMPTY: u8 = 0;
    pub const MINERAL: u8 = 1;
    pub const DISCOVERED_EMPTY: u8 = 2;
    pub const JUST_DISCOVERED_EMPTY: u8 = 3;
    pub const DISCOVERED_MINERAL: u8 = 4;
    pub const JUST_DISCOVERED_MINERAL: u8 = 5;
    pub const AGENT: u8 = 6;
}

/// State of the swarm at a tick boundary.
///
/// Every list is sorted in ascending position order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    pub tick: u64,
    pub agents: Vec<Position>,
    pub discovered_empty: Vec<Position>,
    pub just_discovered_empty: Vec<Position>,
    pub discovered_mineral: Vec<Position>,
    pub just_discovered_mineral: Vec<Position>,
}

impl Snapshot {
    /// Captures the registry and discovery state after `tick` ticks.
    pub fn capture(tick: u64, registry: &AgentRegistry, discovery: &DiscoveryState) -> Self {
        Self {
            tick,
            agents: registry.positions(),
            discovered_empty: discovery.positions_with(CellStatus::DiscoveredEmpty),
            just_discovered_empty: discovery.positions_with(CellStatus::JustEmpty),
            discovered_mineral: discovery.positions_with(CellStatus::DiscoveredMineral),
            just_discovered_mineral: discovery.positions_with(CellStatus::JustMineral),
        }
    }

    /// Row-major grid of [`codes`], `grid[x][y]`.
    ///
    /// Ground truth fills the background, discovery states are painted on
    /// top and agents last.
    pub fn cell_codes(&self, world: &WorldGrid) -> Vec<Vec<u8>> {
        let mut grid: Vec<Vec<u8>> = (0..world.rows())
            .map(|x| {
                (0..world.cols())
                    .map(|y| {
                        if world.is_mineral(Position::new(x as i32, y as i32)) {
                            codes::MINERAL
                        } else {
                            codes::EMPTY
                        }
                    })
                    .collect()
            })
            .collect();

        let layers = [
            (&self.discovered_empty, codes::DISCOVERED_EMPTY),
            (&self.just_discovered_empty, codes::JUST_DISCOVERED_EMPTY),
            (&self.discovered_mineral, codes::DISCOVERED_MINERAL),
            (&self.just_discovered_mineral, codes::JUST_DISCOVERED_MINERAL),
            (&self.agents, codes::AGENT),
        ];
        for (positions, code) in layers {
            for &pos in positions.iter() {
                if world.in_bounds(pos) {
                    grid[pos.x as usize][pos.y as usize] = code;
                }
            }
        }
        grid
    }

    /// ASCII rendering of [`Snapshot::cell_codes`].
    pub fn frame<'a>(&'a self, world: &'a WorldGrid) -> Frame<'a> {
        Frame {
            snapshot: self,
            world,
        }
    }
}

/// Display adapter returned by [`Snapshot::frame`].
pub struct Frame<'a> {
    snapshot: &'a Snapshot,
    world: &'a WorldGrid,
}

fn glyph(code: u8) -> char {
    match code {
        codes::MINERAL => 'o',
        codes::DISCOVERED_EMPTY => '.',
        codes::JUST_DISCOVERED_EMPTY => 'e',
        codes::DISCOVERED_MINERAL => '*',
        codes::JUST_DISCOVERED_MINERAL => 'm',
        codes::AGENT => 'A',
        _ => ' ',
    }
}

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tick {}", self.snapshot.tick)?;
        for row in self.snapshot.cell_codes(self.world) {
            let line: String = row.into_iter().map(glyph).collect();
            writeln!(f, "|{}|", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::AgentId;

    fn fixture() -> (WorldGrid, Snapshot) {
        let world = WorldGrid::from_minerals(2, 3, [Position::new(0, 2), Position::new(1, 2)]).unwrap();
        let mut discovery = DiscoveryState::for_world(&world);
        discovery.observe(Position::new(0, 0), false);
        discovery.observe(Position::new(0, 1), false);
        discovery.observe(Position::new(0, 1), false);
        discovery.observe(Position::new(0, 2), true);
        let mut registry = AgentRegistry::new();
        registry.insert(Position::new(1, 0), AgentId(0)).unwrap();
        (world, Snapshot::capture(4, &registry, &discovery))
    }

    #[test]
    fn capture_sorts_by_status() {
        let (_, snap) = fixture();
        assert_eq!(snap.tick, 4);
        assert_eq!(snap.agents, vec![Position::new(1, 0)]);
        assert_eq!(snap.just_discovered_empty, vec![Position::new(0, 0)]);
        assert_eq!(snap.discovered_empty, vec![Position::new(0, 1)]);
        assert_eq!(snap.just_discovered_mineral, vec![Position::new(0, 2)]);
        assert!(snap.discovered_mineral.is_empty());
    }

    #[test]
    fn cell_codes_layer_agents_over_discovery() {
        let (world, snap) = fixture();
        assert_eq!(snap.cell_codes(&world), vec![vec![3, 2, 5], vec![6, 0, 1]]);
    }

    #[test]
    fn frame_renders_one_line_per_row() {
        let (world, snap) = fixture();
        assert_eq!(snap.frame(&world).to_string(), "tick 4\n|e.m|\n|A o|\n");
    }
}
