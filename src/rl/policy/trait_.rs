//! Policy trait for the swarm environment.

use rand::RngCore;

use crate::rl::config::AgentParams;
use crate::rl::observation::ObservationKey;
use crate::world::Action;

/// Chooses and learns actions from observation keys.
///
/// One instance drives the whole swarm: every agent reads from and writes to
/// it, each with its own [`AgentParams`].
pub trait Policy {
    /// Picks an action for an agent that currently perceives `key`.
    ///
    /// Every random draw must come from `rng` so that runs stay reproducible.
    fn choose_action(&self, key: &ObservationKey, exploration_rate: f64, rng: &mut dyn RngCore)
        -> Action;

    /// Learns from one transition and returns the updated value of
    /// `(key, action)`.
    fn update(
        &mut self,
        key: &ObservationKey,
        action: Action,
        reward: f64,
        next: Option<&ObservationKey>,
        params: &AgentParams,
    ) -> f64;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
