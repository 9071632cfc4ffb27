//! Configuration for a swarm run.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::reward::RewardTable;
use crate::world::WorldGrid;

/// Per-agent learning and sensing parameters.
///
/// Agents share one Q-table but each applies its own α, γ and ε when it
/// acts and learns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentParams {
    /// Half-width of the square sensing window.
    pub field_of_view: u32,
    /// Learning rate α, in `(0, 1]`.
    pub learning_rate: f64,
    /// Discount factor γ, in `[0, 1]`.
    pub discount_factor: f64,
    /// Exploration rate ε, in `[0, 1]`.
    pub exploration_rate: f64,
}

impl AgentParams {
    /// Number of cells in the sensing window, centre included.
    pub fn window_len(&self) -> usize {
        let side = 2 * self.field_of_view as usize + 1;
        side * side
    }

    /// Checks every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.field_of_view == 0 {
            return Err(ConfigError::ZeroFieldOfView);
        }
        check_rate("learning_rate", "(0, 1]", self.learning_rate, |v| v > 0.0 && v <= 1.0)?;
        check_rate("discount_factor", "[0, 1]", self.discount_factor, |v| {
            (0.0..=1.0).contains(&v)
        })?;
        check_rate("exploration_rate", "[0, 1]", self.exploration_rate, |v| {
            (0.0..=1.0).contains(&v)
        })?;
        Ok(())
    }
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            field_of_view: 2,
            learning_rate: 0.9,
            discount_factor: 0.99,
            exploration_rate: 0.2,
        }
    }
}

fn check_rate(
    name: &'static str,
    range: &'static str,
    value: f64,
    ok: impl Fn(f64) -> bool,
) -> Result<(), ConfigError> {
    if ok(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, range, value })
    }
}

/// Configuration for a swarm run.
///
/// Validated once when the environment is built; there is no runtime
/// reconfiguration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwarmConfig {
    // --- World geometry ---
    /// Number of grid rows.
    pub rows: usize,
    /// Number of grid columns.
    pub cols: usize,

    // --- Swarm ---
    /// Number of agents spawned at random free cells.
    pub num_agents: usize,
    /// Parameters given to every spawned agent.
    pub agent: AgentParams,

    // --- Episode ---
    /// Ticks run by [`super::SwarmEnvironment::run`].
    pub num_ticks: u32,
    /// Reward shaping.
    pub rewards: RewardTable,
    /// Append a snapshot after construction and after every tick.
    pub record_history: bool,
}

impl SwarmConfig {
    /// A square `grid_size × grid_size` configuration with default settings.
    pub fn square(grid_size: usize) -> Self {
        Self {
            rows: grid_size,
            cols: grid_size,
            ..Self::default()
        }
    }

    /// Number of cells in the configured grid.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Validates grid size, swarm size, agent parameters and rewards.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.num_agents > self.cell_count() {
            return Err(ConfigError::TooManyAgents {
                agents: self.num_agents,
                cells: self.cell_count(),
            });
        }
        self.agent.validate()?;
        self.rewards.validate()
    }

    /// Checks that `world` has the configured dimensions.
    pub fn check_world(&self, world: &WorldGrid) -> Result<(), ConfigError> {
        if world.rows() != self.rows || world.cols() != self.cols {
            return Err(ConfigError::WorldMismatch {
                rows: self.rows,
                cols: self.cols,
                actual_rows: world.rows(),
                actual_cols: world.cols(),
            });
        }
        Ok(())
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            rows: 50,
            cols: 50,
            num_agents: 10,
            agent: AgentParams::default(),
            num_ticks: 50,
            rewards: RewardTable::default(),
            record_history: true,
        }
    }
}
