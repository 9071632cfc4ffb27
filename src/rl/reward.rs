//! Reward model for one agent transition.
//!
//! ```text
//! reward = step_cost
//!        + movement(outcome)
//!        + Σ cell_reward(category)   over the new window, SelfCell excluded
//! ```
//!
//! First sightings pay the `just_discovered_*` bonus to the agent whose
//! sensor revealed the cell. Later sightings pay only the `discovered_*`
//! value, so revisiting known ground is worth strictly less.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::observation::ObservationKey;
use super::registry::MoveOutcome;
use crate::discovery::Category;

/// Reward constants.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardTable {
    // --- Per tick ---
    /// Cost paid by every agent every tick.
    pub step_cost: f64,
    /// Added when the agent tried to leave the grid.
    pub out_of_bounds: f64,
    /// Added when another agent held or claimed the target cell.
    pub blocked: f64,

    // --- Per cell in the new window ---
    pub wall: f64,
    pub other_agent: f64,
    pub discovered_empty: f64,
    pub discovered_mineral: f64,
    pub just_discovered_empty: f64,
    pub just_discovered_mineral: f64,
}

impl RewardTable {
    /// Value of one window cell of the given category.
    pub fn cell(&self, category: Category) -> f64 {
        match category {
            Category::SelfCell => 0.0,
            Category::Wall => self.wall,
            Category::OtherAgent => self.other_agent,
            Category::DiscoveredEmpty => self.discovered_empty,
            Category::DiscoveredMineral => self.discovered_mineral,
            Category::JustDiscoveredEmpty => self.just_discovered_empty,
            Category::JustDiscoveredMineral => self.just_discovered_mineral,
        }
    }

    /// Penalty (or bonus) for a move outcome.
    pub fn movement(&self, outcome: MoveOutcome) -> f64 {
        match outcome {
            MoveOutcome::Moved | MoveOutcome::Stayed => 0.0,
            MoveOutcome::OutOfBounds => self.out_of_bounds,
            MoveOutcome::Blocked => self.blocked,
        }
    }

    /// Rejects NaN and infinite entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let terms = [
            ("step_cost", self.step_cost),
            ("out_of_bounds", self.out_of_bounds),
            ("blocked", self.blocked),
            ("wall", self.wall),
            ("other_agent", self.other_agent),
            ("discovered_empty", self.discovered_empty),
            ("discovered_mineral", self.discovered_mineral),
            ("just_discovered_empty", self.just_discovered_empty),
            ("just_discovered_mineral", self.just_discovered_mineral),
        ];
        match terms.iter().find(|(_, v)| !v.is_finite()) {
            Some(&(name, _)) => Err(ConfigError::NonFiniteReward(name)),
            None => Ok(()),
        }
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        Self {
            step_cost: -1.0,
            out_of_bounds: -10.0,
            blocked: -1.0,
            wall: 0.0,
            other_agent: 0.0,
            discovered_empty: -1.0,
            discovered_mineral: 2.0,
            just_discovered_empty: 5.0,
            just_discovered_mineral: 30.0,
        }
    }
}

/// Components of a single transition reward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardBreakdown {
    pub step_cost: f64,
    pub movement: f64,
    pub cells: f64,
    pub total: f64,
}

/// Scores agent transitions.
pub struct RewardComputer;

impl RewardComputer {
    /// Computes the reward for an agent that ended the tick with `outcome`
    /// and sensed `observation` at its committed position.
    pub fn compute(
        outcome: MoveOutcome,
        observation: &ObservationKey,
        table: &RewardTable,
    ) -> RewardBreakdown {
        let step_cost = table.step_cost;
        let movement = table.movement(outcome);
        let cells: f64 = observation
            .as_slice()
            .iter()
            .map(|&category| table.cell(category))
            .sum();

        RewardBreakdown {
            step_cost,
            movement,
            cells,
            total: step_cost + movement + cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(codes: &str) -> ObservationKey {
        codes.parse().unwrap()
    }

    #[test]
    fn self_cell_is_never_rewarded() {
        let table = RewardTable {
            discovered_empty: 100.0,
            ..RewardTable::default()
        };
        assert_eq!(table.cell(Category::SelfCell), 0.0);
        let r = RewardComputer::compute(MoveOutcome::Moved, &key("@"), &table);
        assert_eq!(r.cells, 0.0);
        assert_eq!(r.total, -1.0);
    }

    #[test]
    fn window_cells_are_summed() {
        let table = RewardTable::default();
        // 3 just-empty, 5 discovered-empty, centre.
        let r = RewardComputer::compute(MoveOutcome::Moved, &key("eee.@...."), &table);
        assert_eq!(r.cells, 15.0 - 5.0);
        assert_eq!(r.total, 9.0);
    }

    #[test]
    fn bounds_violation_costs_more_than_blocking() {
        let table = RewardTable::default();
        let k = key("###.@.###");
        let oob = RewardComputer::compute(MoveOutcome::OutOfBounds, &k, &table);
        let blocked = RewardComputer::compute(MoveOutcome::Blocked, &k, &table);
        assert_eq!(oob.movement, -10.0);
        assert_eq!(blocked.movement, -1.0);
        assert!(oob.total < blocked.total);
    }

    #[test]
    fn first_sighting_beats_revisit() {
        let table = RewardTable::default();
        assert!(table.cell(Category::JustDiscoveredMineral) > table.cell(Category::DiscoveredMineral));
        assert!(table.cell(Category::JustDiscoveredEmpty) > table.cell(Category::DiscoveredEmpty));
    }

    #[test]
    fn non_finite_terms_rejected() {
        let table = RewardTable {
            blocked: f64::NAN,
            ..RewardTable::default()
        };
        assert_eq!(table.validate(), Err(ConfigError::NonFiniteReward("blocked")));
        assert!(RewardTable::default().validate().is_ok());
    }
}
