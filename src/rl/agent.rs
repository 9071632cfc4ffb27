//! Agent identity and per-agent learning state.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::AgentParams;
use super::observation::ObservationKey;

/// Stable identifier of an agent, equal to its index in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentId(pub usize);

impl AgentId {
    /// Index of this agent in the environment's agent list.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent_{}", self.0)
    }
}

/// One member of the swarm.
///
/// An agent carries its parameters and the observation it sensed at the end
/// of the previous tick. It does not know where it is: positions belong to
/// the [`super::AgentRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Identifier.
    pub id: AgentId,
    /// Sensing and learning parameters.
    pub params: AgentParams,
    /// Observation used as the Q-table key on the next decision.
    pub observation: ObservationKey,
}

impl Agent {
    /// Creates an agent with an empty cached observation.
    pub fn new(id: AgentId, params: AgentParams) -> Self {
        Self {
            id,
            params,
            observation: ObservationKey::default(),
        }
    }

    /// Replaces the cached observation and returns the previous one.
    pub fn remember(&mut self, observation: ObservationKey) -> ObservationKey {
        std::mem::replace(&mut self.observation, observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Category;

    #[test]
    fn new_agent_has_empty_observation() {
        let agent = Agent::new(AgentId(3), AgentParams::default());
        assert!(agent.observation.is_empty());
        assert_eq!(agent.id.to_string(), "agent_3");
    }

    #[test]
    fn remember_returns_previous_observation() {
        let mut agent = Agent::new(AgentId(0), AgentParams::default());
        let first = ObservationKey::new(vec![Category::Wall]);
        let second = ObservationKey::new(vec![Category::SelfCell]);
        assert!(agent.remember(first.clone()).is_empty());
        assert_eq!(agent.remember(second.clone()), first);
        assert_eq!(agent.observation, second);
    }
}
