use thiserror::Error;

use super::agent::AgentId;
use crate::world::{Position, WorldError};

/// Errors detected while validating a run configuration.
///
/// All of them are fatal: the environment refuses to start.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Grid size must be non-zero, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("Field of view must be at least 1")]
    ZeroFieldOfView,

    #[error("Cannot place {agents} agents on a grid of {cells} cells")]
    TooManyAgents { agents: usize, cells: usize },

    #[error("{name} must lie in {range}, got {value}")]
    InvalidRate {
        name: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("Reward term '{0}' must be finite")]
    NonFiniteReward(&'static str),

    #[error("World is {actual_rows}x{actual_cols} but the configuration expects {rows}x{cols}")]
    WorldMismatch {
        rows: usize,
        cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Agent placement {0} lies outside the grid")]
    PlacementOutOfBounds(Position),

    #[error("Two agents are placed on {0}")]
    DuplicatePlacement(Position),

    #[error("World generation failed: {0}")]
    World(#[from] WorldError),
}

/// Errors raised by direct registry manipulation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Position {0} is already occupied")]
    Occupied(Position),

    #[error("Agent {0} is already placed")]
    AlreadyPlaced(AgentId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_agents_display() {
        let e = ConfigError::TooManyAgents {
            agents: 30,
            cells: 25,
        };
        assert_eq!(e.to_string(), "Cannot place 30 agents on a grid of 25 cells");
    }

    #[test]
    fn invalid_rate_display() {
        let e = ConfigError::InvalidRate {
            name: "learning_rate",
            range: "(0, 1]",
            value: 1.5,
        };
        assert_eq!(e.to_string(), "learning_rate must lie in (0, 1], got 1.5");
    }

    #[test]
    fn world_error_converts() {
        let e: ConfigError = WorldError::InvalidFillRatio(2.0).into();
        assert!(e.to_string().starts_with("World generation failed"));
    }

    #[test]
    fn occupied_display() {
        let e = RegistryError::Occupied(Position::new(1, 2));
        assert_eq!(e.to_string(), "Position (1, 2) is already occupied");
    }
}
