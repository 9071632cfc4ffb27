//! Multi-agent exploration environment.
//!
//! One tick runs: select → resolve → commit → sense → reward → learn →
//! cache → snapshot. Agents are always visited in ascending pre-tick
//! position, and every random draw comes from the environment's single
//! seeded RNG, so a fixed seed replays a run exactly.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

use super::agent::{Agent, AgentId};
use super::config::{AgentParams, SwarmConfig};
use super::error::ConfigError;
use super::metrics::EpisodeSummary;
use super::observation::{Reading, SensorEncoder};
use super::policy::Policy;
use super::registry::{AgentRegistry, MoveOutcome};
use super::reward::{RewardBreakdown, RewardComputer};
use super::snapshot::Snapshot;
use crate::discovery::DiscoveryState;
use crate::world::{Action, BlobGenerator, Position, WorldGrid};

/// What happened to one agent during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentTransition {
    pub agent: AgentId,
    /// Position before the tick.
    pub from: Position,
    /// Committed position after the tick.
    pub to: Position,
    pub action: Action,
    pub outcome: MoveOutcome,
    pub reward: RewardBreakdown,
}

/// Result of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Tick number just completed, starting at 1.
    pub tick: u64,
    /// Per-agent transitions in processing order.
    pub transitions: Vec<AgentTransition>,
    /// Sum of this tick's agent rewards.
    pub reward: f64,
    /// Cells revealed for the first time this tick.
    pub discoveries: usize,
}

impl StepResult {
    /// Transition of `agent`, if it took part in the tick.
    pub fn transition(&self, agent: AgentId) -> Option<&AgentTransition> {
        self.transitions.iter().find(|t| t.agent == agent)
    }
}

/// The swarm exploration environment.
///
/// Owns the world, the fog of war, the agents, the position registry and the
/// RNG. The shared policy is owned by the caller and lent to every step,
/// so one table can outlive several environments.
///
/// # Lifecycle
///
/// 1. Build with [`SwarmEnvironment::new`], [`SwarmEnvironment::generate`] or
///    [`SwarmEnvironment::with_placements`]. Agents start with an empty
///    observation key and the whole grid undiscovered; the first sensing
///    pass happens inside the first tick.
/// 2. Call [`SwarmEnvironment::step`] (or [`SwarmEnvironment::run`]) with the
///    shared policy.
/// 3. Read [`SwarmEnvironment::history`] for rendering.
#[derive(Debug)]
pub struct SwarmEnvironment {
    config: SwarmConfig,
    world: WorldGrid,
    discovery: DiscoveryState,
    agents: Vec<Agent>,
    registry: AgentRegistry,
    rng: StdRng,
    tick: u64,
    history: Vec<Snapshot>,
    cumulative_reward: f64,
}

impl SwarmEnvironment {
    /// Creates an environment on `world` with `config.num_agents` agents
    /// spawned on distinct random cells.
    pub fn new(config: SwarmConfig, world: WorldGrid, seed: u64) -> Result<Self, ConfigError> {
        Self::spawn(config, world, StdRng::seed_from_u64(seed))
    }

    /// Generates a world with `generator` and spawns agents on it, both from
    /// the same seeded RNG.
    pub fn generate(
        config: SwarmConfig,
        generator: &BlobGenerator,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let world = generator.generate(config.rows, config.cols, &mut rng)?;
        Self::spawn(config, world, rng)
    }

    /// Creates an environment with explicit agent placements.
    ///
    /// Agent `i` gets `placements[i]`. `config.num_agents` is overridden by
    /// the number of placements.
    pub fn with_placements(
        mut config: SwarmConfig,
        world: WorldGrid,
        placements: Vec<(Position, AgentParams)>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.num_agents = placements.len();
        config.validate()?;
        config.check_world(&world)?;
        for (_, params) in &placements {
            params.validate()?;
        }
        Self::assemble(config, world, placements, StdRng::seed_from_u64(seed))
    }

    fn spawn(config: SwarmConfig, world: WorldGrid, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        config.check_world(&world)?;
        let placements = index::sample(&mut rng, world.cell_count(), config.num_agents)
            .into_iter()
            .map(|idx| (world.position_at(idx), config.agent))
            .collect();
        Self::assemble(config, world, placements, rng)
    }

    fn assemble(
        config: SwarmConfig,
        world: WorldGrid,
        placements: Vec<(Position, AgentParams)>,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        let mut registry = AgentRegistry::new();
        let mut agents = Vec::with_capacity(placements.len());
        for (i, (pos, params)) in placements.into_iter().enumerate() {
            if !world.in_bounds(pos) {
                return Err(ConfigError::PlacementOutOfBounds(pos));
            }
            let id = AgentId(i);
            registry
                .insert(pos, id)
                .map_err(|_| ConfigError::DuplicatePlacement(pos))?;
            agents.push(Agent::new(id, params));
        }

        let mut env = Self {
            discovery: DiscoveryState::for_world(&world),
            config,
            world,
            agents,
            registry,
            rng,
            tick: 0,
            history: Vec::new(),
            cumulative_reward: 0.0,
        };

        // Nothing is observed before the first tick.
        if env.config.record_history {
            env.history.push(env.snapshot());
        }

        log::info!(
            "Environment ready: {}x{} grid, {} minerals, {} agents",
            env.world.rows(),
            env.world.cols(),
            env.world.mineral_count(),
            env.agents.len()
        );
        Ok(env)
    }

    /// Agent ids in ascending current position.
    fn processing_order(&self) -> Vec<AgentId> {
        self.registry.iter().map(|(_, id)| id).collect()
    }

    /// Senses every agent in `order` at its registered position.
    ///
    /// This is the only place that observes cells.
    fn sense(&mut self, order: &[AgentId]) -> Vec<Reading> {
        let mut readings = Vec::with_capacity(order.len());
        for &id in order {
            let Some(center) = self.registry.position_of(id) else {
                continue;
            };
            let fov = self.agents[id.index()].params.field_of_view;
            readings.push(SensorEncoder::encode(
                center,
                fov,
                &self.world,
                &mut self.discovery,
                &self.registry,
            ));
        }
        readings
    }

    /// Chooses one action per agent from its cached observation.
    ///
    /// Agents draw from the RNG in ascending position order. The result is
    /// indexed by [`AgentId::index`].
    pub fn select_actions<P: Policy + ?Sized>(&mut self, policy: &P) -> Vec<Action> {
        let mut actions = vec![Action::Up; self.agents.len()];
        for (_, id) in self.registry.iter() {
            let agent = &self.agents[id.index()];
            actions[id.index()] = policy.choose_action(
                &agent.observation,
                agent.params.exploration_rate,
                &mut self.rng,
            );
        }
        actions
    }

    /// Applies one action per agent and learns from the outcome.
    ///
    /// # Arguments
    ///
    /// * `actions` - One action per agent, indexed by [`AgentId::index`].
    /// * `policy` - Shared policy updated with every agent's transition.
    ///
    /// # Panics
    ///
    /// Panics if `actions.len()` differs from the number of agents.
    pub fn apply<P: Policy + ?Sized>(&mut self, actions: &[Action], policy: &mut P) -> StepResult {
        assert_eq!(
            actions.len(),
            self.agents.len(),
            "Number of actions must match number of agents"
        );

        // 1. Resolve and commit moves from the pre-tick snapshot.
        let order = self.processing_order();
        let before: Vec<Position> = self
            .agents
            .iter()
            .map(|a| self.registry.position_of(a.id).unwrap_or_default())
            .collect();
        let candidates: Vec<Position> = before
            .iter()
            .zip(actions)
            .map(|(pos, &action)| pos.step(action))
            .collect();
        let resolution = self.registry.resolve(&candidates, &self.world);
        let outcomes = self.registry.commit(resolution);

        // 2. Sense at the committed positions.
        let seen_before = self.discovery.discovered_cells();
        let readings = self.sense(&order);
        let discoveries = self.discovery.discovered_cells() - seen_before;

        // 3. Reward, learn and cache.
        self.tick += 1;
        let mut transitions = Vec::with_capacity(order.len());
        let mut total = 0.0;
        for (&id, reading) in order.iter().zip(readings) {
            let i = id.index();
            let outcome = outcomes[i];
            let reward =
                RewardComputer::compute(outcome, &reading.observation, &self.config.rewards);

            let agent = &mut self.agents[i];
            let q = policy.update(
                &agent.observation,
                actions[i],
                reward.total,
                Some(&reading.observation),
                &agent.params,
            );
            let to = self.registry.position_of(id).unwrap_or(before[i]);
            log::trace!(
                "tick {} {}: {} {} -> {} {:?}, underfoot '{}', reward {:.2}, q {:.3}",
                self.tick,
                id,
                actions[i],
                before[i],
                to,
                outcome,
                reading.underfoot,
                reward.total,
                q
            );
            agent.remember(reading.observation);

            total += reward.total;
            transitions.push(AgentTransition {
                agent: id,
                from: before[i],
                to,
                action: actions[i],
                outcome,
                reward,
            });
        }
        self.cumulative_reward += total;

        if self.config.record_history {
            self.history.push(self.snapshot());
        }

        log::debug!(
            "tick {}: reward {:.2}, {} new cells, coverage {:.1}%",
            self.tick,
            total,
            discoveries,
            self.discovery.coverage() * 100.0
        );

        StepResult {
            tick: self.tick,
            transitions,
            reward: total,
            discoveries,
        }
    }

    /// Runs one full tick: [`SwarmEnvironment::select_actions`] then
    /// [`SwarmEnvironment::apply`].
    pub fn step<P: Policy + ?Sized>(&mut self, policy: &mut P) -> StepResult {
        let actions = self.select_actions(&*policy);
        self.apply(&actions, policy)
    }

    /// Runs `ticks` steps. Reaching the tick count is the only terminal condition.
    pub fn run_episode<P: Policy + ?Sized>(&mut self, policy: &mut P, ticks: u32) -> EpisodeSummary {
        let mut summary = EpisodeSummary::default();
        for _ in 0..ticks {
            let result = self.step(policy);
            summary.record(&result);
        }
        let summary = summary.finish(self);
        log::info!(
            "Episode finished after {} ticks with {}: reward {:.2}, coverage {:.1}%, minerals {}/{}",
            summary.ticks,
            policy.name(),
            summary.total_reward,
            summary.coverage * 100.0,
            summary.minerals_found,
            summary.minerals_total
        );
        summary
    }

    /// Runs `config.num_ticks` steps.
    pub fn run<P: Policy + ?Sized>(&mut self, policy: &mut P) -> EpisodeSummary {
        let ticks = self.config.num_ticks;
        self.run_episode(policy, ticks)
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.tick, &self.registry, &self.discovery)
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// Returns the ground-truth world.
    pub fn world(&self) -> &WorldGrid {
        &self.world
    }

    /// Returns the swarm's discovery state.
    pub fn discovery(&self) -> &DiscoveryState {
        &self.discovery
    }

    /// Returns the agents, indexed by [`AgentId::index`].
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Returns the position registry.
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Current position of `agent`.
    pub fn position_of(&self, agent: AgentId) -> Option<Position> {
        self.registry.position_of(agent)
    }

    /// Number of ticks run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Recorded snapshots, oldest first. Empty when recording is disabled.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Sum of every reward paid so far.
    pub fn cumulative_reward(&self) -> f64 {
        self.cumulative_reward
    }
}
