//! Episode-level statistics.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::environment::{StepResult, SwarmEnvironment};
use super::registry::MoveOutcome;

/// Aggregated statistics for one episode.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpisodeSummary {
    /// Number of ticks run.
    pub ticks: u64,
    /// Sum of every agent's reward over the episode.
    pub total_reward: f64,
    /// Mean reward per agent per tick.
    pub mean_reward: f64,
    /// Cells revealed during the episode.
    pub cells_discovered: usize,
    /// Fraction of the grid revealed at the end of the episode.
    pub coverage: f64,
    /// Mineral cells revealed at the end of the episode.
    pub minerals_found: usize,
    /// Mineral cells in the world.
    pub minerals_total: usize,
    /// Move outcome counts.
    pub moved: usize,
    pub stayed: usize,
    pub out_of_bounds: usize,
    pub blocked: usize,
}

impl EpisodeSummary {
    /// Adds one tick's result to the running totals.
    pub fn record(&mut self, result: &StepResult) {
        self.ticks += 1;
        self.total_reward += result.reward;
        self.cells_discovered += result.discoveries;
        for transition in &result.transitions {
            match transition.outcome {
                MoveOutcome::Moved => self.moved += 1,
                MoveOutcome::Stayed => self.stayed += 1,
                MoveOutcome::OutOfBounds => self.out_of_bounds += 1,
                MoveOutcome::Blocked => self.blocked += 1,
            }
        }
    }

    /// Fills in the end-of-episode fields from the environment.
    pub fn finish(mut self, env: &SwarmEnvironment) -> Self {
        let agent_ticks = self.ticks as f64 * env.agents().len() as f64;
        self.mean_reward = if agent_ticks > 0.0 {
            self.total_reward / agent_ticks
        } else {
            0.0
        };
        self.coverage = env.discovery().coverage();
        self.minerals_found = env.discovery().minerals_found();
        self.minerals_total = env.world().mineral_count();
        self
    }

    /// Fraction of the world's minerals revealed, `1.0` for a barren world.
    pub fn mineral_recall(&self) -> f64 {
        if self.minerals_total == 0 {
            1.0
        } else {
            self.minerals_found as f64 / self.minerals_total as f64
        }
    }
}

impl fmt::Display for EpisodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Episode Summary ({} ticks)", self.ticks)?;
        writeln!(f, "  Total reward:        {:.2}", self.total_reward)?;
        writeln!(f, "  Mean reward:         {:.3}", self.mean_reward)?;
        writeln!(f, "  Cells discovered:    {}", self.cells_discovered)?;
        writeln!(f, "  Coverage:            {:.1}%", self.coverage * 100.0)?;
        writeln!(
            f,
            "  Minerals found:      {}/{} ({:.1}%)",
            self.minerals_found,
            self.minerals_total,
            self.mineral_recall() * 100.0
        )?;
        write!(
            f,
            "  Moves:               {} moved, {} stayed, {} out of bounds, {} blocked",
            self.moved, self.stayed, self.out_of_bounds, self.blocked
        )
    }
}
