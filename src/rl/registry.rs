//! Position ↔ agent bookkeeping and simultaneous-move resolution.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::agent::AgentId;
use super::error::RegistryError;
use crate::world::{Position, WorldGrid};

/// Result of one agent's move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MoveOutcome {
    /// The agent claimed its candidate cell.
    Moved,
    /// The candidate equalled the current cell.
    Stayed,
    /// The candidate lies off the grid; the agent stays put.
    OutOfBounds,
    /// The candidate was held or already claimed by another agent; the agent stays put.
    Blocked,
}

impl MoveOutcome {
    /// Returns true if the agent ended the tick on a new cell.
    pub fn relocated(&self) -> bool {
        matches!(self, MoveOutcome::Moved)
    }
}

/// Outcome of resolving one tick of candidate moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The registry after all moves, ready to be committed.
    pub registry: AgentRegistry,
    /// Per-agent outcomes, indexed by [`AgentId::index`].
    pub outcomes: Vec<MoveOutcome>,
}

/// Bijective mapping between occupied positions and agents.
///
/// No two agents can share a position: every mutation either rejects the
/// collision or builds a fresh registry that is swapped in whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentRegistry {
    by_position: BTreeMap<Position, AgentId>,
    by_agent: BTreeMap<AgentId, Position>,
}

impl AgentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `agent` at `pos`.
    pub fn insert(&mut self, pos: Position, agent: AgentId) -> Result<(), RegistryError> {
        if self.by_position.contains_key(&pos) {
            return Err(RegistryError::Occupied(pos));
        }
        if self.by_agent.contains_key(&agent) {
            return Err(RegistryError::AlreadyPlaced(agent));
        }
        self.by_position.insert(pos, agent);
        self.by_agent.insert(agent, pos);
        Ok(())
    }

    /// Agent standing on `pos`, if any.
    pub fn agent_at(&self, pos: Position) -> Option<AgentId> {
        self.by_position.get(&pos).copied()
    }

    /// Current position of `agent`, if placed.
    pub fn position_of(&self, agent: AgentId) -> Option<Position> {
        self.by_agent.get(&agent).copied()
    }

    /// Returns true if some agent stands on `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.by_position.contains_key(&pos)
    }

    /// Number of placed agents.
    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    /// Returns true if no agent is placed.
    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// `(position, agent)` pairs in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, AgentId)> + '_ {
        self.by_position.iter().map(|(&pos, &id)| (pos, id))
    }

    /// Occupied positions in ascending order.
    pub fn positions(&self) -> Vec<Position> {
        self.by_position.keys().copied().collect()
    }

    /// Returns true if both directions of the mapping agree.
    pub fn is_bijective(&self) -> bool {
        self.by_position.len() == self.by_agent.len()
            && self
                .by_position
                .iter()
                .all(|(pos, id)| self.by_agent.get(id) == Some(pos))
    }

    /// Resolves one tick of simultaneous moves.
    ///
    /// `candidates[i]` is the cell agent `i` wants to enter, computed from the
    /// pre-tick positions. Agents are processed in ascending pre-tick position:
    ///
    /// - a candidate off the grid is rejected with [`MoveOutcome::OutOfBounds`];
    /// - a candidate that any agent occupies in the pre-tick snapshot, or that
    ///   an earlier agent already claimed this tick, is rejected with
    ///   [`MoveOutcome::Blocked`];
    /// - otherwise the agent claims the cell.
    ///
    /// Cells vacated during the tick are not re-claimable until the next one,
    /// so rejected agents always find their original cell free and moves never
    /// cascade. This blocks more than a rule that only protects the cells of
    /// agents staying put: a follower cannot step into the cell its leader
    /// leaves in the same tick. `self` is left untouched; apply the result with
    /// [`AgentRegistry::commit`].
    ///
    /// # Panics
    ///
    /// Panics if `candidates.len()` differs from the number of placed agents.
    pub fn resolve(&self, candidates: &[Position], world: &WorldGrid) -> Resolution {
        assert_eq!(
            candidates.len(),
            self.len(),
            "Number of candidates must match number of agents"
        );

        let mut next = AgentRegistry::new();
        let mut outcomes = vec![MoveOutcome::Stayed; candidates.len()];

        for (from, id) in self.iter() {
            let to = candidates[id.index()];
            let outcome = if to == from {
                MoveOutcome::Stayed
            } else if !world.in_bounds(to) {
                MoveOutcome::OutOfBounds
            } else if self.is_occupied(to) || next.is_occupied(to) {
                MoveOutcome::Blocked
            } else {
                MoveOutcome::Moved
            };

            let landing = if outcome.relocated() { to } else { from };
            next.by_position.insert(landing, id);
            next.by_agent.insert(id, landing);
            outcomes[id.index()] = outcome;
        }

        Resolution {
            registry: next,
            outcomes,
        }
    }

    /// Atomically replaces this registry with a resolved one.
    pub fn commit(&mut self, resolution: Resolution) -> Vec<MoveOutcome> {
        debug_assert!(resolution.registry.is_bijective());
        self.by_position = resolution.registry.by_position;
        self.by_agent = resolution.registry.by_agent;
        resolution.outcomes
    }
}
