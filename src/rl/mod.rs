//! Swarm learning: agents, sensing, move resolution, rewards and the shared
//! Q-table.
//!
//! Policy persistence is behind the `serde` feature flag (on by default),
//! which brings in `serde_json`.

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod observation;
pub mod policy;
pub mod registry;
pub mod reward;
pub mod snapshot;


pub use agent::{Agent, AgentId};
pub use config::{AgentParams, SwarmConfig};
pub use environment::{AgentTransition, StepResult, SwarmEnvironment};
pub use error::{ConfigError, RegistryError};
pub use metrics::EpisodeSummary;
pub use observation::{InvalidCode, ObservationKey, Reading, SensorEncoder};
pub use policy::{Policy, SharedPolicy};
pub use registry::{AgentRegistry, MoveOutcome, Resolution};
pub use reward::{RewardBreakdown, RewardComputer, RewardTable};
pub use snapshot::Snapshot;

#[cfg(feature = "serde")]
pub use policy::{load_policy, read_policy, save_policy, write_policy, PolicyError};
